//! Storage traits and error types
//!
//! This module defines the trait interface for snapshot backends and
//! associated error types.

use crate::harvester::ListingRecord;
use crate::storage::RecordFilter;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot write lock poisoned")]
    LockPoisoned,
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for snapshot store implementations
///
/// The store holds exactly one snapshot at a time. Implementations must make
/// `replace` atomic for readers and serialize concurrent writers.
pub trait SnapshotStore: Send + Sync {
    /// Discards the stored snapshot and persists `snapshot` in its place
    ///
    /// # Returns
    ///
    /// The number of records persisted
    fn replace(&self, snapshot: Vec<ListingRecord>) -> StorageResult<usize>;

    /// Reads the stored records matching `filter`, in fetch order
    fn list(&self, filter: &RecordFilter) -> StorageResult<Vec<ListingRecord>>;

    /// Counts the stored records
    fn count(&self) -> StorageResult<u64>;
}
