//! Integration tests for the crawler
//!
//! The scenario tests drive the coordinator through its public API with a
//! canned fetcher; the full-crawl tests use wiremock to serve pages over HTTP
//! and a SQLite database on disk.

use corpus_crawler::config::{Config, LogicConfig, StoreConfig};
use corpus_crawler::crawler::{
    run_crawl, Coordinator, FetchError, FetchResponse, PageFetcher, StepOutcome, StopReason,
};
use corpus_crawler::state::CrawlStatus;
use corpus_crawler::storage::{FrontierStore, SqliteStorage, DEFAULT_TABLE};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BOEING: &str = "https://en.wikipedia.org/wiki/Boeing_747";
const AIRBUS: &str = "https://en.wikipedia.org/wiki/Airbus";

/// Serves canned pages and records every URL requested
#[derive(Clone, Default)]
struct StubFetcher {
    pages: HashMap<String, (u16, String)>,
    requested: Arc<Mutex<Vec<String>>>,
}

impl StubFetcher {
    fn page(mut self, url: &str, status_code: u16, body: &str) -> Self {
        self.pages
            .insert(url.to_string(), (status_code, body.to_string()));
        self
    }

    fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

impl PageFetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, FetchError> {
        self.requested.lock().unwrap().push(url.to_string());
        match self.pages.get(url) {
            Some((status_code, body)) => Ok(FetchResponse {
                status_code: *status_code,
                final_url: url.to_string(),
                body: body.clone(),
            }),
            None => Err(FetchError::Timeout {
                url: url.to_string(),
            }),
        }
    }
}

/// Creates a test configuration with the given seeds and allowed domains
fn create_test_config(seeds: &[&str], domains: &[&str], db_path: &str, max_docs: u64) -> Config {
    Config {
        seeds: seeds.iter().map(|s| s.to_string()).collect(),
        db: StoreConfig {
            path: db_path.to_string(),
            table: "documents".to_string(),
        },
        logic: LogicConfig {
            user_agent: "TestCrawler/1.0".to_string(),
            max_docs,
            delay: 0.0,
            request_timeout: 5,
            allowed_domains: domains.iter().map(|d| d.to_string()).collect(),
        },
    }
}

fn wiki_config(max_docs: u64) -> Config {
    create_test_config(
        &[BOEING],
        &["en.wikipedia.org", "aviation.fandom.com"],
        ":memory:",
        max_docs,
    )
}

#[tokio::test]
async fn test_single_step_stores_seed_and_admits_one_link() {
    let fetcher = StubFetcher::default().page(
        BOEING,
        200,
        r#"<html><body>
            <a href="/wiki/Airbus">Airbus</a>
            <a href="/wiki/Talk:Boeing_747">Talk</a>
            <a href="https://example.com/x">Elsewhere</a>
        </body></html>"#,
    );
    let mut coordinator = Coordinator::with_parts(
        &wiki_config(10),
        SqliteStorage::new_in_memory().unwrap(),
        fetcher,
    )
    .unwrap();

    coordinator.seed_frontier().unwrap();
    let outcome = coordinator.step().await.unwrap();
    assert!(matches!(outcome, StepOutcome::Stored { discovered: 1, .. }));

    let store = coordinator.store();
    let seed = store.get_by_url(BOEING).unwrap().unwrap();
    assert_eq!(seed.status, CrawlStatus::Done);
    assert!(seed.raw_html.unwrap().contains("Airbus"));
    assert!(seed.crawled_at.is_some());

    assert_eq!(store.count_by_status(CrawlStatus::New).unwrap(), 1);
    let airbus = store.get_by_url(AIRBUS).unwrap().unwrap();
    assert_eq!(airbus.status, CrawlStatus::New);

    assert!(store
        .get_by_url("https://en.wikipedia.org/wiki/Talk:Boeing_747")
        .unwrap()
        .is_none());
    assert!(store.get_by_url("https://example.com/x").unwrap().is_none());
    assert_eq!(store.estimated_size().unwrap(), 2);
}

#[tokio::test]
async fn test_http_404_marks_error_and_loop_moves_on() {
    let fetcher = StubFetcher::default()
        .page(BOEING, 404, "<html>Not Found</html>")
        .page(AIRBUS, 200, "<html>Airbus</html>");
    let config = create_test_config(
        &[BOEING, AIRBUS],
        &["en.wikipedia.org"],
        ":memory:",
        10,
    );
    let mut coordinator = Coordinator::with_parts(
        &config,
        SqliteStorage::new_in_memory().unwrap(),
        fetcher.clone(),
    )
    .unwrap();

    let summary = coordinator.run().await.unwrap();
    assert_eq!(summary.stop_reason, StopReason::FrontierExhausted);
    assert_eq!(summary.documents_done, 1);

    let failed = coordinator.store().get_by_url(BOEING).unwrap().unwrap();
    assert_eq!(failed.status, CrawlStatus::Error);
    assert_eq!(failed.http_code, Some(404));
    assert!(failed.raw_html.is_none());

    let stored = coordinator.store().get_by_url(AIRBUS).unwrap().unwrap();
    assert_eq!(stored.status, CrawlStatus::Done);

    assert_eq!(fetcher.requested(), vec![BOEING, AIRBUS]);
}

#[tokio::test]
async fn test_growth_cap_on_prepopulated_store() {
    // max_docs = 3 caps discovery at 6 records
    let mut store = SqliteStorage::new_in_memory().unwrap();
    store.add_seed(BOEING).unwrap();
    for i in 0..5 {
        store
            .insert_discovered(&format!("https://en.wikipedia.org/wiki/Page_{}", i))
            .unwrap();
    }

    let fetcher = StubFetcher::default().page(
        BOEING,
        200,
        r#"<a href="/wiki/Airbus">Airbus</a><a href="/wiki/Concorde">Concorde</a>"#,
    );
    let mut coordinator =
        Coordinator::with_parts(&wiki_config(3), store, fetcher).unwrap();

    let outcome = coordinator.step().await.unwrap();
    assert!(matches!(outcome, StepOutcome::Stored { discovered: 0, .. }));

    let store = coordinator.store();
    assert_eq!(store.get_by_url(BOEING).unwrap().unwrap().status, CrawlStatus::Done);
    assert!(store.get_by_url(AIRBUS).unwrap().is_none());
    assert_eq!(store.estimated_size().unwrap(), 6);
}

#[tokio::test]
async fn test_goal_reached_leaves_rest_of_frontier() {
    let fetcher = StubFetcher::default()
        .page(
            BOEING,
            200,
            r#"<a href="/wiki/Airbus">A</a><a href="/wiki/Concorde">C</a>"#,
        )
        .page(AIRBUS, 200, "<html>Airbus</html>");
    let mut coordinator = Coordinator::with_parts(
        &wiki_config(2),
        SqliteStorage::new_in_memory().unwrap(),
        fetcher.clone(),
    )
    .unwrap();

    let summary = coordinator.run().await.unwrap();
    assert_eq!(summary.stop_reason, StopReason::GoalReached);
    assert_eq!(summary.documents_done, 2);

    let store = coordinator.store();
    assert_eq!(store.count_by_status(CrawlStatus::Done).unwrap(), 2);
    assert_eq!(store.count_by_status(CrawlStatus::New).unwrap(), 1);
    assert_eq!(
        store
            .get_by_url("https://en.wikipedia.org/wiki/Concorde")
            .unwrap()
            .unwrap()
            .status,
        CrawlStatus::New
    );
    assert_eq!(fetcher.requested().len(), 2);
}

#[tokio::test]
async fn test_full_crawl_over_http() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"<html><head><title>Home</title></head><body>
            <a href="/page1">Page 1</a>
            <a href="{}/page2#section">Page 2</a>
            <a href="/index.php?action=edit">Edit</a>
            <a href="https://example.com/outside">Outside</a>
            </body></html>"#,
            base_url
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<html><body><a href="/">Home</a></body></html>"#),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("crawl.db");
    let seed = format!("{}/", base_url);
    let config = create_test_config(
        &[&seed],
        &["127.0.0.1"],
        db_path.to_str().unwrap(),
        10,
    );

    let summary = run_crawl(&config).await.unwrap();
    assert_eq!(summary.stop_reason, StopReason::FrontierExhausted);
    assert_eq!(summary.documents_done, 2);
    assert_eq!(summary.pages_claimed, 3);

    let store = SqliteStorage::open(&db_path, DEFAULT_TABLE).unwrap();
    assert_eq!(store.estimated_size().unwrap(), 3);

    let home = store.get_by_url(&seed).unwrap().unwrap();
    assert_eq!(home.status, CrawlStatus::Done);
    assert_eq!(home.source.as_deref(), Some("Unknown"));
    assert_eq!(home.http_code, Some(200));

    let page2 = store
        .get_by_url(&format!("{}/page2", base_url))
        .unwrap()
        .unwrap();
    assert_eq!(page2.status, CrawlStatus::Error);
    assert_eq!(page2.http_code, Some(500));
}

#[tokio::test]
async fn test_crawl_resumes_from_existing_database() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<a href="/a">A</a><a href="/b">B</a><a href="/c">C</a>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>leaf</html>"))
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("crawl.db");
    let seed = format!("{}/", base_url);

    let first = create_test_config(&[&seed], &["127.0.0.1"], db_path.to_str().unwrap(), 2);
    let summary = run_crawl(&first).await.unwrap();
    assert_eq!(summary.stop_reason, StopReason::GoalReached);
    assert_eq!(summary.documents_done, 2);

    // Raising the goal continues with the remaining frontier; the seed is not refetched
    let second = create_test_config(&[&seed], &["127.0.0.1"], db_path.to_str().unwrap(), 4);
    let summary = run_crawl(&second).await.unwrap();
    assert_eq!(summary.stop_reason, StopReason::GoalReached);
    assert_eq!(summary.documents_done, 4);
    assert_eq!(summary.pages_claimed, 2);

    let store = SqliteStorage::open(&db_path, DEFAULT_TABLE).unwrap();
    assert_eq!(store.count_by_status(CrawlStatus::Done).unwrap(), 4);
    assert_eq!(store.count_by_status(CrawlStatus::New).unwrap(), 0);
}
