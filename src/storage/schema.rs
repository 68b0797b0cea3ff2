//! Database schema definitions
//!
//! This module contains the SQL schema for the URL record table. The table
//! name comes from configuration and has already been validated as a plain
//! identifier.

/// Default name of the URL record table
pub const DEFAULT_TABLE: &str = "documents";

/// Builds the schema SQL for the given table name
pub fn schema_sql(table: &str) -> String {
    format!(
        r#"
-- One row per distinct normalized URL
CREATE TABLE IF NOT EXISTS {table} (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL UNIQUE,
    status TEXT NOT NULL CHECK (status IN ('new', 'processing', 'done', 'error')),
    source TEXT,
    attempts INTEGER NOT NULL DEFAULT 0,
    start_time TEXT,
    crawled_at TEXT,
    http_code INTEGER,
    raw_html TEXT,
    error_msg TEXT
);

CREATE INDEX IF NOT EXISTS idx_{table}_status ON {table}(status);
"#
    )
}

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `table` - Name of the URL record table
pub fn initialize_schema(conn: &rusqlite::Connection, table: &str) -> Result<(), rusqlite::Error> {
    conn.execute_batch(&schema_sql(table))?;
    Ok(())
}
