//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - Politeness-throttled HTTP fetching
//! - HTML parsing and link extraction
//! - The claim, fetch, record, discover loop

mod coordinator;
mod fetcher;
mod parser;

pub use coordinator::{run_crawl, Coordinator, CrawlSummary, StepOutcome, StopReason};
pub use fetcher::{build_http_client, FetchError, FetchResponse, HttpFetcher, PageFetcher};
pub use parser::extract_links;

use crate::config::Config;
use crate::CrawlError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Open the frontier store
/// 2. Build the HTTP client
/// 3. Seed the frontier
/// 4. Claim, fetch and record pages, following admissible links
/// 5. Stop at the document goal or when the frontier is exhausted
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - Crawl stopped normally
/// * `Err(CrawlError)` - Startup failed or the store became unusable
pub async fn crawl(config: &Config) -> Result<CrawlSummary, CrawlError> {
    run_crawl(config).await
}
