//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the FrontierStore trait.

use crate::state::CrawlStatus;
use crate::storage::schema::{initialize_schema, DEFAULT_TABLE};
use crate::storage::traits::{FrontierStore, StorageError, StorageResult};
use crate::storage::{UrlRecord, SEED_SOURCE};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::time::Duration;

/// Columns selected for every [`UrlRecord`] read, in `row_to_record` order
const RECORD_COLUMNS: &str =
    "id, url, status, source, attempts, start_time, crawled_at, http_code, raw_html, error_msg";

/// How long a connection waits on a lock held by another connection
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
    table: String,
}

impl SqliteStorage {
    /// Opens (or creates) a database file and ensures the schema exists
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    /// * `table` - Name of the URL record table
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn open(path: &Path, table: &str) -> StorageResult<Self> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn, table)?;

        Ok(Self {
            conn,
            table: table.to_string(),
        })
    }

    /// Creates an in-memory database (for testing and dry runs)
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn, DEFAULT_TABLE)?;
        Ok(Self {
            conn,
            table: DEFAULT_TABLE.to_string(),
        })
    }

    /// Inserts a `new` record, dropping the insert if the URL already exists
    fn insert_new(&mut self, url: &str, source: Option<&str>) -> StorageResult<bool> {
        let inserted = self.conn.execute(
            &format!(
                "INSERT INTO {} (url, status, source, attempts) VALUES (?1, ?2, ?3, 0)
                 ON CONFLICT(url) DO NOTHING",
                self.table
            ),
            params![url, CrawlStatus::New, source],
        )?;
        Ok(inserted > 0)
    }

    /// Explains why a transition out of `processing` matched no row
    fn transition_error(&self, id: i64, to: CrawlStatus) -> StorageError {
        let current: Result<Option<CrawlStatus>, rusqlite::Error> = self
            .conn
            .query_row(
                &format!("SELECT status FROM {} WHERE id = ?1", self.table),
                params![id],
                |row| row.get(0),
            )
            .optional();

        match current {
            Ok(Some(from)) => StorageError::InvalidTransition { id, from, to },
            Ok(None) => StorageError::RecordNotFound(id),
            Err(e) => StorageError::Sqlite(e),
        }
    }
}

/// Maps a row selected with [`RECORD_COLUMNS`] into a record
///
/// Unknown statuses and malformed timestamps surface as conversion errors.
fn row_to_record(row: &Row<'_>) -> rusqlite::Result<UrlRecord> {
    Ok(UrlRecord {
        id: row.get(0)?,
        url: row.get(1)?,
        status: row.get(2)?,
        source: row.get(3)?,
        attempts: row.get(4)?,
        start_time: row.get(5)?,
        crawled_at: row.get(6)?,
        http_code: row.get(7)?,
        raw_html: row.get(8)?,
        error_msg: row.get(9)?,
    })
}

impl FrontierStore for SqliteStorage {
    // ===== Insertion =====

    fn add_seed(&mut self, url: &str) -> StorageResult<bool> {
        self.insert_new(url, Some(SEED_SOURCE))
    }

    fn insert_discovered(&mut self, url: &str) -> StorageResult<bool> {
        self.insert_new(url, None)
    }

    // ===== Claiming =====

    fn claim_next(&mut self) -> StorageResult<Option<UrlRecord>> {
        // A single UPDATE ... RETURNING statement runs in one implicit
        // transaction holding the write lock, so the select and the
        // transition cannot interleave with another claimer.
        let record = self
            .conn
            .query_row(
                &format!(
                    "UPDATE {table} SET status = ?1, start_time = ?2
                     WHERE id = (SELECT id FROM {table} WHERE status = ?3 ORDER BY id LIMIT 1)
                       AND status = ?3
                     RETURNING {columns}",
                    table = self.table,
                    columns = RECORD_COLUMNS
                ),
                params![CrawlStatus::Processing, Utc::now(), CrawlStatus::New],
                row_to_record,
            )
            .optional()?;

        Ok(record)
    }

    // ===== Completion =====

    fn mark_done(
        &mut self,
        id: i64,
        raw_html: &str,
        source: &str,
        http_code: u16,
    ) -> StorageResult<()> {
        let updated = self.conn.execute(
            &format!(
                "UPDATE {} SET status = ?1, raw_html = ?2, source = ?3, http_code = ?4,
                 crawled_at = ?5
                 WHERE id = ?6 AND status = ?7",
                self.table
            ),
            params![
                CrawlStatus::Done,
                raw_html,
                source,
                http_code,
                Utc::now(),
                id,
                CrawlStatus::Processing
            ],
        )?;

        if updated == 0 {
            return Err(self.transition_error(id, CrawlStatus::Done));
        }
        Ok(())
    }

    fn mark_error(
        &mut self,
        id: i64,
        http_code: Option<u16>,
        message: Option<&str>,
    ) -> StorageResult<()> {
        let updated = self.conn.execute(
            &format!(
                "UPDATE {} SET status = ?1, http_code = ?2, error_msg = ?3
                 WHERE id = ?4 AND status = ?5",
                self.table
            ),
            params![
                CrawlStatus::Error,
                http_code,
                message,
                id,
                CrawlStatus::Processing
            ],
        )?;

        if updated == 0 {
            return Err(self.transition_error(id, CrawlStatus::Error));
        }
        Ok(())
    }

    // ===== Queries =====

    fn get_by_url(&self, url: &str) -> StorageResult<Option<UrlRecord>> {
        let record = self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM {} WHERE url = ?1",
                    RECORD_COLUMNS, self.table
                ),
                params![url],
                row_to_record,
            )
            .optional()?;

        Ok(record)
    }

    fn count_by_status(&self, status: CrawlStatus) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {} WHERE status = ?1", self.table),
            params![status],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn estimated_size(&self) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", self.table),
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}
