//! State module for tracking harvest progress
//!
//! # Components
//!
//! - `PaginationState`: the state machine driven by the pagination controller
//! - `Termination`: why a run reached its `Done` state

mod pagination_state;

pub use pagination_state::{PaginationState, Termination};
