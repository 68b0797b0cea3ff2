//! URL handling module for the crawler
//!
//! This module provides URL normalization, the domain allow-list check, and
//! derivation of a document's source name from its host.

mod domain;
mod normalize;

// Re-export main functions
pub use domain::{host_allowed, source_label};
pub use normalize::UrlNormalizer;
