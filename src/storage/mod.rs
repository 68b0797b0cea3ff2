//! Storage module for the persistent URL frontier
//!
//! This module handles all database operations for the crawler, including:
//! - SQLite database initialization and schema management
//! - Idempotent insertion of seed and discovered URLs
//! - The atomic claim of the next URL to fetch
//! - Forward-only status transitions on completion

mod schema;
mod sqlite;
mod traits;

pub use schema::DEFAULT_TABLE;
pub use sqlite::SqliteStorage;
pub use traits::{FrontierStore, StorageError, StorageResult};

use crate::config::StoreConfig;
use crate::state::CrawlStatus;
use chrono::{DateTime, Utc};
use std::path::Path;

/// Provenance label for URLs supplied by configuration
pub const SEED_SOURCE: &str = "seed";

/// Opens the frontier store described by the configuration
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully opened storage
/// * `Err(StorageError)` - Failed to open or initialize the database
pub fn open_storage(config: &StoreConfig) -> StorageResult<SqliteStorage> {
    SqliteStorage::open(Path::new(&config.path), &config.table)
}

/// Opens an existing frontier store without creating one
///
/// Used by read-only views, where a mistyped path should fail instead of
/// producing a fresh, empty database.
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully opened storage
/// * `Err(StorageError::MissingDatabase)` - No database file at the configured path
pub fn open_existing_storage(config: &StoreConfig) -> StorageResult<SqliteStorage> {
    if !Path::new(&config.path).is_file() {
        return Err(StorageError::MissingDatabase(config.path.clone()));
    }
    open_storage(config)
}

/// A URL in the frontier, and the document fetched from it
///
/// Downstream exporters rely only on `url`, `status`, and `raw_html`.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlRecord {
    pub id: i64,
    pub url: String,
    pub status: CrawlStatus,
    pub source: Option<String>,
    pub attempts: u32,
    pub start_time: Option<DateTime<Utc>>,
    pub crawled_at: Option<DateTime<Utc>>,
    pub http_code: Option<u16>,
    pub raw_html: Option<String>,
    pub error_msg: Option<String>,
}
