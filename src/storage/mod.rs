//! Storage module for persisting listing snapshots
//!
//! This module handles all database operations, including:
//! - SQLite schema management for the snapshot table
//! - Atomic replacement of the whole snapshot
//! - Filtered reads for the query surface

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteSnapshotStore;
pub use traits::{SnapshotStore, StorageError, StorageResult};

/// Column names the query surface may filter on
pub(crate) const COMPANY_COLUMN: &str = "company";
pub(crate) const SALARY_COLUMN: &str = "salary";
pub(crate) const LOCATION_COLUMN: &str = "location";

/// Optional partial-match filters for reading the snapshot
///
/// Each set term must occur in its column, ignoring case. Blank terms are
/// treated as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub company: Option<String>,
    pub salary: Option<String>,
    pub location: Option<String>,
}

impl RecordFilter {
    /// Returns true if no filter is set
    pub fn is_empty(&self) -> bool {
        self.clauses().is_empty()
    }

    /// Active `(column, term)` pairs, terms trimmed
    pub(crate) fn clauses(&self) -> Vec<(&'static str, &str)> {
        [
            (COMPANY_COLUMN, &self.company),
            (SALARY_COLUMN, &self.salary),
            (LOCATION_COLUMN, &self.location),
        ]
        .into_iter()
        .filter_map(|(column, term)| {
            term.as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(|t| (column, t))
        })
        .collect()
    }
}
