//! Corpus Crawler main entry point
//!
//! This is the command-line interface for the corpus crawler.

use anyhow::Context;
use clap::Parser;
use corpus_crawler::config::{load_config_with_hash, Config};
use corpus_crawler::crawler::{crawl, StopReason};
use corpus_crawler::output::{load_statistics, print_statistics};
use corpus_crawler::storage::open_existing_storage;
use corpus_crawler::UrlNormalizer;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Corpus Crawler: a bounded, allow-listed document crawler
///
/// Crawls from a set of seed URLs, staying inside the allowed domains, and
/// stores every successfully fetched page until the document goal is met.
/// Progress lives in the frontier database, so an interrupted crawl picks up
/// where it stopped.
#[derive(Parser, Debug)]
#[command(name = "corpus-crawler")]
#[command(version = "1.0.0")]
#[command(about = "A bounded, allow-listed document crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config);
        Ok(())
    } else if cli.stats {
        handle_stats(&config)
    } else {
        handle_crawl(&config).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("corpus_crawler=info,warn"),
            1 => EnvFilter::new("corpus_crawler=debug,info"),
            2 => EnvFilter::new("corpus_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) {
    println!("=== Corpus Crawler Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  User agent: {}", config.logic.user_agent);
    println!("  Max documents: {}", config.logic.max_docs);
    println!("  Delay: {}s", config.logic.delay);
    println!("  Request timeout: {}s", config.logic.request_timeout);

    println!("\nStore:");
    println!("  Database: {}", config.db.path);
    println!("  Table: {}", config.db.table);

    println!(
        "\nAllowed Domains ({}):",
        config.logic.allowed_domains.len()
    );
    for domain in &config.logic.allowed_domains {
        println!("  - {}", domain);
    }

    let normalizer = UrlNormalizer::new(config.logic.allowed_domains.iter().cloned());
    let mut admitted = 0;
    println!("\nSeeds ({}):", config.seeds.len());
    for seed in &config.seeds {
        match normalizer.normalize_absolute(seed) {
            Some(url) => {
                admitted += 1;
                println!("  * {}", url);
            }
            None => println!("  x {} (rejected by admission rules)", seed),
        }
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would start crawling with {} seed URLs", admitted);
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Database: {} (table {})\n", config.db.path, config.db.table);

    let storage = open_existing_storage(&config.db)
        .with_context(|| format!("Failed to open database {}", config.db.path))?;
    let stats = load_statistics(&storage).context("Failed to load statistics")?;

    print_statistics(&stats, config.logic.max_docs);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config) -> anyhow::Result<()> {
    tracing::info!(
        "Seeds: {}, Allowed domains: {}",
        config.seeds.len(),
        config.logic.allowed_domains.join(", ")
    );

    let summary = crawl(config).await.context("Crawl failed")?;

    match summary.stop_reason {
        StopReason::GoalReached => tracing::info!(
            "Document goal reached: {} documents",
            summary.documents_done
        ),
        StopReason::FrontierExhausted => tracing::info!(
            "Frontier exhausted with {} of {} documents",
            summary.documents_done,
            config.logic.max_docs
        ),
    }

    Ok(())
}
