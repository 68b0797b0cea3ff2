//! Statistics generation from the frontier store
//!
//! This module provides functionality for extracting and displaying
//! crawl statistics from the storage layer.

use crate::state::CrawlStatus;
use crate::storage::{FrontierStore, StorageResult};
use std::collections::BTreeMap;

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Total number of records in the frontier
    pub total: u64,

    /// Count of records by status
    pub by_status: BTreeMap<CrawlStatus, u64>,
}

impl CrawlStatistics {
    /// Number of records with the given status
    pub fn count(&self, status: CrawlStatus) -> u64 {
        self.by_status.get(&status).copied().unwrap_or(0)
    }

    /// Number of records still in the frontier (`new` or `processing`)
    pub fn frontier(&self) -> u64 {
        self.by_status
            .iter()
            .filter(|(status, _)| status.in_frontier())
            .map(|(_, count)| count)
            .sum()
    }

    /// Share of `done` records against the document goal, as a percentage
    ///
    /// Capped at 100; an empty goal reads as complete.
    pub fn completion_rate(&self, max_docs: u64) -> f64 {
        if max_docs == 0 {
            return 100.0;
        }
        let done = self.count(CrawlStatus::Done) as f64;
        (done / max_docs as f64 * 100.0).min(100.0)
    }
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `store` - The frontier store to query
///
/// # Returns
///
/// * `Ok(CrawlStatistics)` - Successfully loaded statistics
/// * `Err(StorageError)` - Failed to query statistics
pub fn load_statistics<S: FrontierStore>(store: &S) -> StorageResult<CrawlStatistics> {
    let total = store.estimated_size()?;

    let mut by_status = BTreeMap::new();
    for status in CrawlStatus::all() {
        by_status.insert(status, store.count_by_status(status)?);
    }

    Ok(CrawlStatistics { total, by_status })
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
/// * `max_docs` - The configured document goal
pub fn print_statistics(stats: &CrawlStatistics, max_docs: u64) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Total records: {}", stats.total);
    println!("  In frontier: {}", stats.frontier());
    println!("  Document goal: {}", max_docs);
    println!();

    println!("Records by Status:");
    for (status, count) in &stats.by_status {
        let percentage = if stats.total > 0 {
            (*count as f64 / stats.total as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", status, count, percentage);
    }
    println!();

    println!(
        "Completion: {:.1}% ({} / {} documents)",
        stats.completion_rate(max_docs),
        stats.count(CrawlStatus::Done),
        max_docs
    );
}
