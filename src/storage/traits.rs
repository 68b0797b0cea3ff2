//! Storage traits and error types
//!
//! This module defines the trait interface for frontier store backends and
//! associated error types.

use crate::state::CrawlStatus;
use crate::storage::UrlRecord;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Record not found: {0}")]
    RecordNotFound(i64),

    #[error("Invalid state transition for record {id}: {from} -> {to}")]
    InvalidTransition {
        id: i64,
        from: CrawlStatus,
        to: CrawlStatus,
    },

    #[error("Database not found: {0}")]
    MissingDatabase(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// The persistent URL frontier
///
/// Every URL the crawler has ever admitted lives here as a [`UrlRecord`],
/// keyed by its normalized URL string. Records are never deleted; they only
/// move forward through `new -> processing -> {done | error}`.
pub trait FrontierStore {
    // ===== Insertion =====

    /// Inserts a seed URL with `source = "seed"`
    ///
    /// Returns `false` if the URL was already present (the insert is dropped).
    fn add_seed(&mut self, url: &str) -> StorageResult<bool>;

    /// Inserts a URL discovered by link extraction
    ///
    /// Returns `false` if the URL was already present (the insert is dropped).
    fn insert_discovered(&mut self, url: &str) -> StorageResult<bool>;

    // ===== Claiming =====

    /// Atomically claims the oldest `new` record
    ///
    /// The record is moved to `processing` with `start_time` stamped, and the
    /// post-transition record is returned. The find and the transition are a
    /// single indivisible operation, so two callers never receive the same
    /// record, even from separate connections.
    fn claim_next(&mut self) -> StorageResult<Option<UrlRecord>>;

    // ===== Completion =====

    /// Moves a `processing` record to `done`, storing the response body
    fn mark_done(
        &mut self,
        id: i64,
        raw_html: &str,
        source: &str,
        http_code: u16,
    ) -> StorageResult<()>;

    /// Moves a `processing` record to `error`
    ///
    /// `http_code` is set for non-200 responses, `message` for fetch-level failures.
    fn mark_error(
        &mut self,
        id: i64,
        http_code: Option<u16>,
        message: Option<&str>,
    ) -> StorageResult<()>;

    // ===== Queries =====

    /// Gets a record by its URL
    fn get_by_url(&self, url: &str) -> StorageResult<Option<UrlRecord>>;

    /// Counts records in the given status
    fn count_by_status(&self, status: CrawlStatus) -> StorageResult<u64>;

    /// Approximate total number of records
    ///
    /// Only used for the frontier growth cap; not a correctness input.
    fn estimated_size(&self) -> StorageResult<u64>;
}
