//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the SnapshotStore
//! trait. Every operation opens its own connection and drops it on return;
//! no connection outlives a call.

use crate::harvester::ListingRecord;
use crate::storage::schema::{create_table_sql, initialize_schema, SNAPSHOT_TABLE, STAGING_TABLE};
use crate::storage::traits::{SnapshotStore, StorageError, StorageResult};
use crate::storage::RecordFilter;
use rusqlite::functions::FunctionFlags;
use rusqlite::{params, params_from_iter, Connection, TransactionBehavior};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

/// How long a connection waits for another writer before failing
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite snapshot store
pub struct SqliteSnapshotStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl SqliteSnapshotStore {
    /// Opens (creating if needed) the snapshot database at `path`
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteSnapshotStore)` - Database exists and holds the snapshot table
    /// * `Err(StorageError)` - Failed to create or open the database
    pub fn new(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let store = Self {
            path: path.to_path_buf(),
            write_lock: Mutex::new(()),
        };

        let conn = store.connect()?;
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        initialize_schema(&conn)?;

        Ok(store)
    }

    /// Path of the underlying database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens a connection scoped to one operation
    fn connect(&self) -> StorageResult<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch("PRAGMA synchronous = NORMAL;")?;

        // SQLite's lower() and LIKE only fold ASCII; listings are mostly Cyrillic.
        conn.create_scalar_function(
            "casefold",
            1,
            FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
            |ctx| {
                let value = ctx.get::<Option<String>>(0)?;
                Ok(value.map(|v| v.to_lowercase()))
            },
        )?;

        Ok(conn)
    }
}

impl SnapshotStore for SqliteSnapshotStore {
    fn replace(&self, snapshot: Vec<ListingRecord>) -> StorageResult<usize> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StorageError::LockPoisoned)?;

        let mut conn = self.connect()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS {staging};
             {create};",
            staging = STAGING_TABLE,
            create = create_table_sql(STAGING_TABLE),
        ))?;

        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO {} (title, salary, company, location) VALUES (?1, ?2, ?3, ?4)",
                STAGING_TABLE
            ))?;
            for record in &snapshot {
                stmt.execute(params![
                    record.title,
                    record.salary,
                    record.company,
                    record.location
                ])?;
            }
        }

        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS {live};
             ALTER TABLE {staging} RENAME TO {live};",
            live = SNAPSHOT_TABLE,
            staging = STAGING_TABLE,
        ))?;

        tx.commit()?;

        tracing::debug!(
            "Replaced snapshot in {} with {} records",
            self.path.display(),
            snapshot.len()
        );

        Ok(snapshot.len())
    }

    fn list(&self, filter: &RecordFilter) -> StorageResult<Vec<ListingRecord>> {
        let conn = self.connect()?;

        let mut sql = format!(
            "SELECT title, salary, company, location FROM {} WHERE 1=1",
            SNAPSHOT_TABLE
        );
        let mut terms = Vec::new();

        for (column, term) in filter.clauses() {
            sql.push_str(&format!(" AND instr(casefold({}), ?) > 0", column));
            terms.push(term.to_lowercase());
        }
        sql.push_str(" ORDER BY id");

        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map(params_from_iter(terms.iter()), |row| {
                Ok(ListingRecord {
                    title: row.get(0)?,
                    salary: row.get(1)?,
                    company: row.get(2)?,
                    location: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    fn count(&self) -> StorageResult<u64> {
        let conn = self.connect()?;
        let count: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", SNAPSHOT_TABLE),
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}
