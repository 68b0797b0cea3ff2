//! Configuration module for the crawler
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use corpus_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Crawler will stop after {} documents", config.logic.max_docs);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, LogicConfig, StoreConfig, DEFAULT_ALLOWED_DOMAINS};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
