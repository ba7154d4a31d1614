//! Vacancy-Harvester: a job-listing snapshot collector
//!
//! This crate pages through a job-search site, extracts typed listing records
//! from every result page and replaces a local SQLite snapshot with the
//! freshly collected set. The stored snapshot can then be filtered by company,
//! salary and location.

pub mod config;
pub mod harvester;
pub mod output;
pub mod query;
pub mod state;
pub mod storage;

use thiserror::Error;

/// Main error type for Vacancy-Harvester operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid query: {0}")]
    InvalidQuery(#[from] QueryError),

    #[error("Fetch of page {page} failed: {cause}")]
    FetchFailed { page: u32, cause: FetchFailure },

    #[error("Extraction of page {page} failed: {fault}")]
    Extraction {
        page: u32,
        #[source]
        fault: harvester::ExtractionFault,
    },

    #[error("Harvest cancelled before fetching page {page}")]
    Cancelled { page: u32 },

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidTransition {
        from: state::PaginationState,
        to: state::PaginationState,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Cause carried by a failed page fetch
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    #[error("HTTP status {0}")]
    Status(u16),

    #[error("transport error: {0}")]
    Transport(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors raised while validating an inbound search request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("search text is required")]
    MissingText,

    #[error("{table} option index {index} is out of range (0..={max})")]
    OutOfRange {
        table: &'static str,
        index: usize,
        max: usize,
    },
}

/// Result type alias for Vacancy-Harvester operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for query validation
pub type QueryResult<T> = std::result::Result<T, QueryError>;

// Re-export commonly used types
pub use config::Config;
pub use harvester::{HarvestReport, Harvester, ListingRecord, NOT_SPECIFIED};
pub use query::{SearchQuery, SearchRequest};
pub use state::PaginationState;
pub use storage::{RecordFilter, SnapshotStore, SqliteSnapshotStore};
