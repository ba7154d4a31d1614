//! Output module for presenting harvest results
//!
//! This module handles:
//! - Reading the stored snapshot through the query surface
//! - Rendering listings as a text table or as JSON
//! - Printing the summary of a finished harvest run

mod listing;
mod report;

pub use listing::{list_vacancies, print_listings, render_json, ListingResponse};
pub use report::print_report;

use crate::storage::StorageError;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to format output: {0}")]
    Format(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
