use serde::Deserialize;

/// Domains admitted to the frontier when the configuration does not name any
pub const DEFAULT_ALLOWED_DOMAINS: &[&str] = &["en.wikipedia.org", "aviation.fandom.com"];

/// Main configuration structure for the crawler
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Initial URLs, in the order they are inserted into the frontier
    pub seeds: Vec<String>,
    pub db: StoreConfig,
    pub logic: LogicConfig,
}

/// Frontier store location
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Path to the SQLite database file
    pub path: String,

    /// Name of the table holding URL records
    #[serde(default = "default_table")]
    pub table: String,
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LogicConfig {
    /// Value of the User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Number of completed documents after which the crawl stops
    #[serde(rename = "max-docs")]
    pub max_docs: u64,

    /// Fixed delay before each fetch (seconds)
    pub delay: f64,

    /// Upper bound on a single request (seconds)
    #[serde(rename = "request-timeout", default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Host substrings a URL must contain to enter the frontier
    #[serde(rename = "allowed-domains", default = "default_allowed_domains")]
    pub allowed_domains: Vec<String>,
}

fn default_table() -> String {
    crate::storage::DEFAULT_TABLE.to_string()
}

fn default_request_timeout() -> u64 {
    10
}

fn default_allowed_domains() -> Vec<String> {
    DEFAULT_ALLOWED_DOMAINS
        .iter()
        .map(|d| d.to_string())
        .collect()
}
