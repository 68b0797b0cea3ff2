//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Seeding the frontier from configuration
//! - Claiming the next URL from the store
//! - Fetching pages and recording the outcome per URL
//! - Expanding the frontier with discovered links, subject to the growth cap

use crate::config::Config;
use crate::crawler::fetcher::{FetchResponse, HttpFetcher, PageFetcher};
use crate::crawler::parser::extract_links;
use crate::state::CrawlStatus;
use crate::storage::{open_storage, FrontierStore, SqliteStorage, StorageError, UrlRecord};
use crate::url::{source_label, UrlNormalizer};
use crate::CrawlError;
use url::Url;

/// The only status code that counts as a completed document
const HTTP_OK: u16 = 200;

/// Frontier size, as a multiple of the document goal, beyond which discovery stops
const GROWTH_CAP_FACTOR: u64 = 2;

/// What a single crawl step did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// No `new` record was left to claim
    FrontierExhausted,

    /// The page was stored as `done`
    Stored {
        url: String,
        /// Links newly inserted into the frontier from this page
        discovered: usize,
    },

    /// The server answered with a status other than 200
    HttpError { url: String, http_code: u16 },

    /// No response could be obtained or recorded
    Failed { url: String, message: String },
}

/// Why a crawl run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The number of `done` records reached the goal
    GoalReached,

    /// No `new` records were left
    FrontierExhausted,
}

/// Result of a complete crawl run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlSummary {
    /// Number of `done` records when the run stopped
    pub documents_done: u64,

    /// URLs claimed during this run
    pub pages_claimed: u64,

    /// Whether the goal was met or the frontier ran dry
    pub stop_reason: StopReason,
}

/// Main crawler coordinator structure
///
/// Owns every handle the crawl needs: the frontier store, the fetcher, and
/// the normalizer shared by seeding and link extraction.
pub struct Coordinator<S, F> {
    store: S,
    fetcher: F,
    normalizer: UrlNormalizer,
    seeds: Vec<String>,
    max_docs: u64,
    documents_done: u64,
}

impl Coordinator<SqliteStorage, HttpFetcher> {
    /// Creates a coordinator backed by SQLite and a live HTTP client
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(CrawlError)` - Failed to open storage or build the HTTP client
    pub fn new(config: &Config) -> Result<Self, CrawlError> {
        let store = open_storage(&config.db)?;
        let fetcher = HttpFetcher::new(&config.logic)?;
        Self::with_parts(config, store, fetcher)
    }
}

impl<S, F> Coordinator<S, F>
where
    S: FrontierStore,
    F: PageFetcher,
{
    /// Creates a coordinator from an explicit store and fetcher
    pub fn with_parts(config: &Config, store: S, fetcher: F) -> Result<Self, CrawlError> {
        let documents_done = store.count_by_status(CrawlStatus::Done)?;

        Ok(Self {
            store,
            fetcher,
            normalizer: UrlNormalizer::new(config.logic.allowed_domains.iter().cloned()),
            seeds: config.seeds.clone(),
            max_docs: config.logic.max_docs,
            documents_done,
        })
    }

    /// The frontier store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Number of `done` documents counted so far
    pub fn documents_done(&self) -> u64 {
        self.documents_done
    }

    /// Inserts the configured seeds into the frontier
    ///
    /// Seeds go through the same admission rules as discovered links; a seed
    /// the rules reject is logged and skipped. Already-present seeds are left
    /// untouched, so seeding a resumed frontier is harmless.
    ///
    /// Returns the number of seeds newly inserted.
    pub fn seed_frontier(&mut self) -> Result<usize, CrawlError> {
        let mut added = 0;

        for seed in &self.seeds {
            let Some(url) = self.normalizer.normalize_absolute(seed) else {
                tracing::warn!("Seed {} rejected by admission rules, skipping", seed);
                continue;
            };

            if self.store.add_seed(url.as_str())? {
                tracing::info!("Seed added: {}", url);
                added += 1;
            } else {
                tracing::debug!("Seed already in frontier: {}", url);
            }
        }

        Ok(added)
    }

    /// Runs the crawl until the goal is met or the frontier is exhausted
    ///
    /// 1. Seed the frontier
    /// 2. While fewer than `max_docs` records are `done`, run one [`step`](Self::step)
    /// 3. Stop when the goal is reached or nothing is left to claim
    pub async fn run(&mut self) -> Result<CrawlSummary, CrawlError> {
        self.seed_frontier()?;
        self.documents_done = self.store.count_by_status(CrawlStatus::Done)?;

        tracing::info!(
            "Starting crawler. Goal: {} documents ({} already done)",
            self.max_docs,
            self.documents_done
        );

        let mut pages_claimed = 0;
        let stop_reason = loop {
            if self.documents_done >= self.max_docs {
                break StopReason::GoalReached;
            }

            match self.step().await? {
                StepOutcome::FrontierExhausted => {
                    tracing::info!("Queue is empty");
                    break StopReason::FrontierExhausted;
                }
                _ => pages_claimed += 1,
            }
        };

        tracing::info!(
            "Crawling finished ({:?}): {} documents done, {} pages claimed this run",
            stop_reason,
            self.documents_done,
            pages_claimed
        );

        Ok(CrawlSummary {
            documents_done: self.documents_done,
            pages_claimed,
            stop_reason,
        })
    }

    /// Claims one URL, fetches it, and records the outcome
    ///
    /// Failures belonging to the claimed URL end up on its record; only store
    /// failures while claiming are returned as errors.
    pub async fn step(&mut self) -> Result<StepOutcome, CrawlError> {
        let record = match self.store.claim_next()? {
            Some(record) => record,
            None => return Ok(StepOutcome::FrontierExhausted),
        };

        tracing::info!(
            "[{}/{}] Crawling: {}",
            self.documents_done + 1,
            self.max_docs,
            record.url
        );

        let outcome = match self.fetcher.fetch(&record.url).await {
            Ok(response) if response.status_code == HTTP_OK => {
                self.complete(&record, response)
            }
            Ok(response) => {
                tracing::warn!("Error {} for {}", response.status_code, record.url);
                self.fail(&record, Some(response.status_code), None);
                StepOutcome::HttpError {
                    url: record.url.clone(),
                    http_code: response.status_code,
                }
            }
            Err(e) => {
                let message = e.to_string();
                tracing::warn!("Exception for {}: {}", record.url, message);
                self.fail(&record, None, Some(&message));
                StepOutcome::Failed {
                    url: record.url.clone(),
                    message,
                }
            }
        };

        Ok(outcome)
    }

    /// Stores a successfully fetched page and expands the frontier from it
    fn complete(&mut self, record: &UrlRecord, response: FetchResponse) -> StepOutcome {
        let base_url = match Url::parse(&record.url) {
            Ok(url) => url,
            Err(e) => {
                let message = format!("Stored URL is not absolute: {}", e);
                self.fail(record, None, Some(&message));
                return StepOutcome::Failed {
                    url: record.url.clone(),
                    message,
                };
            }
        };

        if response.final_url != record.url {
            tracing::debug!("{} redirected to {}", record.url, response.final_url);
        }

        let source = source_label(&base_url);
        if let Err(e) = self
            .store
            .mark_done(record.id, &response.body, &source, response.status_code)
        {
            let message = format!("Failed to store document: {}", e);
            tracing::warn!("{} ({})", message, record.url);
            self.fail(record, None, Some(&message));
            return StepOutcome::Failed {
                url: record.url.clone(),
                message,
            };
        }
        self.documents_done += 1;

        let discovered = self.discover(&base_url, &response.body);

        StepOutcome::Stored {
            url: record.url.clone(),
            discovered,
        }
    }

    /// Inserts links found on a page, unless the frontier is at its growth cap
    ///
    /// Returns the number of links that were new to the frontier.
    fn discover(&mut self, base_url: &Url, html: &str) -> usize {
        let cap = self.max_docs.saturating_mul(GROWTH_CAP_FACTOR);
        match self.store.estimated_size() {
            Ok(size) if size < cap => {}
            Ok(size) => {
                tracing::debug!(
                    "Frontier at {} records (cap {}), skipping discovery on {}",
                    size,
                    cap,
                    base_url
                );
                return 0;
            }
            Err(e) => {
                tracing::warn!("Could not size frontier, skipping discovery: {}", e);
                return 0;
            }
        }

        let mut inserted = 0;
        for link in extract_links(html, base_url, &self.normalizer) {
            match self.store.insert_discovered(link.as_str()) {
                Ok(true) => inserted += 1,
                Ok(false) => tracing::trace!("Already in frontier: {}", link),
                Err(e) => tracing::warn!("Failed to enqueue {}: {}", link, e),
            }
        }

        tracing::debug!("Discovered {} new links on {}", inserted, base_url);
        inserted
    }

    /// Records a terminal error on a claimed record
    ///
    /// A failure to record it is logged; the record then stays `processing`.
    fn fail(&mut self, record: &UrlRecord, http_code: Option<u16>, message: Option<&str>) {
        if let Err(e) = self.store.mark_error(record.id, http_code, message) {
            match e {
                StorageError::InvalidTransition { from, .. } if from.is_terminal() => tracing::warn!(
                    "Record {} is already {}, cannot mark it as error",
                    record.url,
                    from
                ),
                e => tracing::error!("Failed to record error for {}: {}", record.url, e),
            }
        }
    }
}

/// Runs the main crawl operation
///
/// # Example
///
/// ```no_run
/// use corpus_crawler::config::load_config;
/// use corpus_crawler::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("config.toml"))?;
/// let summary = run_crawl(&config).await?;
/// println!("{} documents", summary.documents_done);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config) -> Result<CrawlSummary, CrawlError> {
    let mut coordinator = Coordinator::new(config)?;
    coordinator.run().await
}
