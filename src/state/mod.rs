//! State management for the crawler
//!
//! This module defines the per-URL crawl state machine.

mod crawl_status;

pub use crawl_status::CrawlStatus;
