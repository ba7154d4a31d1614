//! Database schema definitions
//!
//! The snapshot lives in a single `vacancies` table. A replace builds the new
//! snapshot in a staging table and renames it over the live one.

/// Live table read by queries
pub const SNAPSHOT_TABLE: &str = "vacancies";

/// Table the next snapshot is built in
pub const STAGING_TABLE: &str = "vacancies_next";

/// Returns the `CREATE TABLE` statement for a snapshot table
pub fn create_table_sql(table: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {} (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            salary TEXT NOT NULL,
            company TEXT NOT NULL,
            location TEXT NOT NULL
        )",
        table
    )
}

/// Creates the live snapshot table if it does not exist yet
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(&create_table_sql(SNAPSHOT_TABLE))?;
    Ok(())
}
