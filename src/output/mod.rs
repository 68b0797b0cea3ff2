//! Output module for reporting on the frontier
//!
//! This module handles:
//! - Collecting per-status record counts from the store
//! - Printing the statistics view

pub mod stats;

pub use stats::{load_statistics, print_statistics, CrawlStatistics};
