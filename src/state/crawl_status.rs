/// Crawl status definitions for URL records
///
/// This module defines the four states a URL record moves through and the
/// forward-only transitions between them.
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use std::fmt;

/// Represents the crawl state of a URL record
///
/// ```text
/// new -> processing -> done
///                   \-> error
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CrawlStatus {
    /// Waiting in the frontier to be claimed
    New,

    /// Claimed by a worker and being fetched
    Processing,

    /// Fetched with HTTP 200; body stored
    Done,

    /// Fetch failed or returned a non-200 status
    Error,
}

impl CrawlStatus {
    /// Returns true if no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Error)
    }

    /// Returns true if the record still belongs to the frontier
    pub fn in_frontier(&self) -> bool {
        matches!(self, Self::New | Self::Processing)
    }

    /// Converts the status to its database string representation
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Processing => "processing",
            Self::Done => "done",
            Self::Error => "error",
        }
    }

    /// Parses a status from its database string representation
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "new" => Some(Self::New),
            "processing" => Some(Self::Processing),
            "done" => Some(Self::Done),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// Returns all statuses in lifecycle order
    pub fn all() -> [Self; 4] {
        [Self::New, Self::Processing, Self::Done, Self::Error]
    }
}

impl fmt::Display for CrawlStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}

impl ToSql for CrawlStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_db_string()))
    }
}

impl FromSql for CrawlStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        Self::from_db_string(s)
            .ok_or_else(|| FromSqlError::Other(format!("unknown crawl status '{}'", s).into()))
    }
}
