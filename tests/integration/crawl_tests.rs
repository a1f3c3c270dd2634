//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use std::time::{Duration, Instant};
use sumi_glean::config::{Config, CrawlerConfig, OutputConfig, TargetEntry, UserAgentConfig};
use sumi_glean::crawler::{run_crawl, Crawler};
use sumi_glean::output::{CsvSink, ExtractedRecord, MemorySink, RecordSink};
use sumi_glean::{GleanError, SinkError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration crawling `seed` with the given selectors
fn create_test_config(seed: &str, selectors: &[&str]) -> Config {
    Config {
        crawler: CrawlerConfig {
            default_delay_secs: 0, // No politeness wait unless robots.txt asks for one
            request_timeout_secs: 5,
            respect_disallow: false,
            max_pages: None,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: Some("https://example.com/contact".to_string()),
        },
        output: OutputConfig {
            csv_path: "./test_output.csv".to_string(),
        },
        targets: vec![TargetEntry {
            url: seed.to_string(),
            selectors: selectors.iter().map(|s| s.to_string()).collect(),
        }],
    }
}

/// Sink whose every write fails, as a full disk would
struct FailingSink;

impl RecordSink for FailingSink {
    fn append(&mut self, _record: &ExtractedRecord) -> Result<(), SinkError> {
        Err(SinkError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "disk full",
        )))
    }
}

/// Mounts a robots.txt with the given body
async fn mount_robots(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Mounts an HTML page, expecting exactly `hits` GET requests for it
async fn mount_page(server: &MockServer, page_path: &str, html: &str, hits: u64) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html)
                .insert_header("content-type", "text/html"),
        )
        .expect(hits)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_single_domain() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;

    // Each visited page is requested twice: once for content, once for links
    mount_page(
        &mock_server,
        "/",
        r#"<html><body><h1>Home</h1><a href="/page1">1</a><a href="/page2">2</a></body></html>"#,
        2,
    )
    .await;
    mount_page(
        &mock_server,
        "/page1",
        r#"<html><body><h1>Page One</h1></body></html>"#,
        2,
    )
    .await;
    mount_page(
        &mock_server,
        "/page2",
        r#"<html><body><h1>Page Two</h1></body></html>"#,
        2,
    )
    .await;

    let config = create_test_config(&format!("{}/", base_url), &["h1"]);
    let mut crawler = Crawler::new(config, MemorySink::new()).expect("Failed to build crawler");
    let stats = crawler.run().await.expect("Crawl failed");

    assert_eq!(stats.sites.len(), 1);
    assert_eq!(stats.sites[0].pages_visited, 3);
    assert_eq!(stats.sites[0].pages_blocked, 0);
    assert_eq!(stats.total_records(), 3);
    assert_eq!(crawler.scheduler().visited_count(), 3);

    let records = crawler.into_sink().into_records();
    assert_eq!(records[0].source_url, format!("{}/", base_url));
    assert_eq!(records[0].text, "Home");

    let mut texts: Vec<String> = records.iter().map(|r| r.text.clone()).collect();
    texts.sort();
    assert_eq!(texts, vec!["Home", "Page One", "Page Two"]);
}

#[tokio::test]
async fn test_content_capped_at_five_matches() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "User-agent: *\n").await;
    mount_page(
        &mock_server,
        "/",
        r#"<html><body>
            <h2>One</h2><h2>Two</h2><h2>Three</h2><h2>Four</h2>
            <h2>Five</h2><h2>Six</h2><h2>Seven</h2>
        </body></html>"#,
        2,
    )
    .await;

    let config = create_test_config(&format!("{}/", base_url), &["h2"]);
    let mut crawler = Crawler::new(config, MemorySink::new()).expect("Failed to build crawler");
    crawler.run().await.expect("Crawl failed");

    let texts: Vec<String> = crawler
        .into_sink()
        .into_records()
        .into_iter()
        .map(|r| r.text)
        .collect();
    assert_eq!(texts, vec!["One", "Two", "Three", "Four", "Five"]);
}

#[tokio::test]
async fn test_missing_robots_blocks_domain() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    // The seed must never be fetched
    mount_page(&mock_server, "/", "<h1>Secret</h1>", 0).await;

    let config = create_test_config(&format!("{}/", base_url), &["h1"]);
    let mut crawler = Crawler::new(config, MemorySink::new()).expect("Failed to build crawler");
    let stats = crawler.run().await.expect("Crawl failed");

    assert_eq!(stats.sites[0].pages_visited, 0);
    assert_eq!(stats.sites[0].pages_blocked, 1);
    assert!(crawler.sink().records().is_empty());
}

#[tokio::test]
async fn test_robots_fetched_once_per_domain() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\n"))
        .expect(1)
        .mount(&mock_server)
        .await;

    mount_page(&mock_server, "/", r#"<a href="/a">a</a><a href="/b">b</a>"#, 2).await;
    mount_page(&mock_server, "/a", "<p>a</p>", 2).await;
    mount_page(&mock_server, "/b", "<p>b</p>", 2).await;

    let config = create_test_config(&format!("{}/", base_url), &["p"]);
    let mut crawler = Crawler::new(config, MemorySink::new()).expect("Failed to build crawler");
    let stats = crawler.run().await.expect("Crawl failed");

    assert_eq!(stats.sites[0].pages_visited, 3);
}

#[tokio::test]
async fn test_each_url_visited_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "User-agent: *\n").await;

    // A cycle: every page links to every other page, some with fragments
    mount_page(
        &mock_server,
        "/",
        r#"<a href="/a">a</a><a href="/b">b</a><a href="/a#top">a again</a>"#,
        2,
    )
    .await;
    mount_page(&mock_server, "/a", r#"<a href="/">home</a><a href="/b">b</a>"#, 2).await;
    mount_page(&mock_server, "/b", r#"<a href="/">home</a><a href="/a">a</a>"#, 2).await;

    let config = create_test_config(&format!("{}/", base_url), &["h1"]);
    let mut crawler = Crawler::new(config, MemorySink::new()).expect("Failed to build crawler");
    let stats = crawler.run().await.expect("Crawl failed");

    assert_eq!(stats.sites[0].pages_visited, 3);
    assert_eq!(crawler.scheduler().visited_count(), 3);
}

#[tokio::test]
async fn test_external_links_not_followed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "User-agent: *\n").await;
    mount_page(
        &mock_server,
        "/",
        r#"<a href="http://other.invalid/page">External</a><a href="/local">Local</a>"#,
        2,
    )
    .await;
    mount_page(&mock_server, "/local", "<p>local</p>", 2).await;

    let config = create_test_config(&format!("{}/", base_url), &["p"]);
    let mut crawler = Crawler::new(config, MemorySink::new()).expect("Failed to build crawler");
    let stats = crawler.run().await.expect("Crawl failed");

    assert_eq!(stats.sites[0].pages_visited, 2);
    let external = url::Url::parse("http://other.invalid/page").unwrap();
    assert!(!crawler.scheduler().is_visited(&external));
}

#[tokio::test]
async fn test_crawl_delay_respected() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "User-agent: *\nCrawl-delay: 0.3\n").await;
    mount_page(&mock_server, "/", r#"<a href="/next">next</a>"#, 2).await;
    mount_page(&mock_server, "/next", "<p>done</p>", 2).await;

    let config = create_test_config(&format!("{}/", base_url), &["p"]);
    let mut crawler = Crawler::new(config, MemorySink::new()).expect("Failed to build crawler");

    let start = Instant::now();
    let stats = crawler.run().await.expect("Crawl failed");

    assert_eq!(stats.sites[0].pages_visited, 2);
    assert!(start.elapsed() >= Duration::from_millis(300));
}

#[tokio::test]
async fn test_disallow_ignored_by_default() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "User-agent: *\nDisallow: /private\n").await;
    mount_page(&mock_server, "/", r#"<a href="/private">p</a>"#, 2).await;
    mount_page(&mock_server, "/private", "<p>private</p>", 2).await;

    let config = create_test_config(&format!("{}/", base_url), &["p"]);
    let mut crawler = Crawler::new(config, MemorySink::new()).expect("Failed to build crawler");
    let stats = crawler.run().await.expect("Crawl failed");

    assert_eq!(stats.sites[0].pages_visited, 2);
    assert_eq!(stats.total_records(), 1);
}

#[tokio::test]
async fn test_disallow_honoured_in_strict_mode() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "User-agent: *\nDisallow: /private\n").await;
    mount_page(&mock_server, "/", r#"<a href="/private">p</a>"#, 2).await;
    mount_page(&mock_server, "/private", "<p>private</p>", 0).await;

    let mut config = create_test_config(&format!("{}/", base_url), &["p"]);
    config.crawler.respect_disallow = true;

    let mut crawler = Crawler::new(config, MemorySink::new()).expect("Failed to build crawler");
    let stats = crawler.run().await.expect("Crawl failed");

    assert_eq!(stats.sites[0].pages_visited, 1);
    assert_eq!(stats.sites[0].pages_blocked, 1);
    assert!(crawler.sink().records().is_empty());
}

#[tokio::test]
async fn test_max_pages_stops_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "User-agent: *\n").await;
    mount_page(&mock_server, "/", r#"<a href="/more">more</a>"#, 2).await;
    mount_page(&mock_server, "/more", "<p>more</p>", 0).await;

    let mut config = create_test_config(&format!("{}/", base_url), &["p"]);
    config.crawler.max_pages = Some(1);

    let mut crawler = Crawler::new(config, MemorySink::new()).expect("Failed to build crawler");
    let stats = crawler.run().await.expect("Crawl failed");

    assert_eq!(stats.sites[0].pages_visited, 1);
    assert!(stats.sites[0].page_limit_hit);
}

#[tokio::test]
async fn test_visited_set_shared_across_targets() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let seed = format!("{}/", base_url);

    mount_robots(&mock_server, "User-agent: *\n").await;
    mount_page(&mock_server, "/", "<p>once</p>", 2).await;

    let mut config = create_test_config(&seed, &["p"]);
    config.targets.push(TargetEntry {
        url: seed.clone(),
        selectors: vec!["p".to_string()],
    });

    let mut crawler = Crawler::new(config, MemorySink::new()).expect("Failed to build crawler");
    let stats = crawler.run().await.expect("Crawl failed");

    assert_eq!(stats.sites.len(), 2);
    assert_eq!(stats.sites[0].pages_visited, 1);
    assert_eq!(stats.sites[1].pages_visited, 0);
    assert_eq!(stats.sites[1].duplicates_skipped, 1);
    assert_eq!(stats.total_records(), 1);
}

#[tokio::test]
async fn test_failed_page_does_not_stop_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "User-agent: *\n").await;
    mount_page(&mock_server, "/", r#"<a href="/broken">b</a><a href="/ok">ok</a>"#, 2).await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<p>Server error</p>"))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/ok", "<p>fine</p>", 2).await;

    let config = create_test_config(&format!("{}/", base_url), &["p"]);
    let mut crawler = Crawler::new(config, MemorySink::new()).expect("Failed to build crawler");
    let stats = crawler.run().await.expect("Crawl failed");

    assert_eq!(stats.sites[0].pages_visited, 3);
    let texts: Vec<&str> = crawler
        .sink()
        .records()
        .iter()
        .map(|r| r.text.as_str())
        .collect();
    assert_eq!(texts, vec!["fine"]);
}

#[tokio::test]
async fn test_csv_output() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "User-agent: *\n").await;
    mount_page(
        &mock_server,
        "/",
        r#"<h2>Hello, world</h2><a class="button">Go</a>"#,
        2,
    )
    .await;

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let csv_path = temp_dir.path().join("out.csv");

    let mut config = create_test_config(&format!("{}/", base_url), &["h2", "a.button"]);
    config.output.csv_path = csv_path.to_str().unwrap().to_string();

    let stats = run_crawl(config).await.expect("Crawl failed");
    assert_eq!(stats.total_records(), 2);

    let contents = std::fs::read_to_string(&csv_path).expect("Failed to read CSV");
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines[0], "URL,Selector,Content");
    assert_eq!(lines[1], format!("{}/,h2,\"Hello, world\"", base_url));
    assert_eq!(lines[2], format!("{}/,a.button,Go", base_url));
    assert_eq!(lines.len(), 3);
}

#[tokio::test]
async fn test_csv_header_written_without_records() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let csv_path = temp_dir.path().join("empty.csv");
    let sink = CsvSink::create(&csv_path).expect("Failed to create sink");

    let config = create_test_config(&format!("{}/", base_url), &["p"]);
    let mut crawler = Crawler::new(config, sink).expect("Failed to build crawler");
    crawler.run().await.expect("Crawl failed");

    assert_eq!(crawler.sink().rows_written(), 0);
    let contents = std::fs::read_to_string(&csv_path).expect("Failed to read CSV");
    assert_eq!(contents.trim_end(), "URL,Selector,Content");
}

#[tokio::test]
async fn test_sink_failure_halts_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "User-agent: *\n").await;

    // The content fetch succeeds, the write fails, and the link fetch never happens
    mount_page(&mock_server, "/", r#"<p>record</p><a href="/next">next</a>"#, 1).await;
    mount_page(&mock_server, "/next", "<p>never</p>", 0).await;

    let config = create_test_config(&format!("{}/", base_url), &["p"]);
    let mut crawler = Crawler::new(config, FailingSink).expect("Failed to build crawler");
    let result = crawler.run().await;

    assert!(matches!(result, Err(GleanError::Sink(SinkError::Io(_)))));
}

#[tokio::test]
async fn test_robots_timeout_blocks_domain() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("User-agent: *\n")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/", "<p>unreachable policy</p>", 0).await;

    let mut config = create_test_config(&format!("{}/", base_url), &["p"]);
    config.crawler.request_timeout_secs = 1;

    let mut crawler = Crawler::new(config, MemorySink::new()).expect("Failed to build crawler");
    let stats = crawler.run().await.expect("Crawl failed");

    assert_eq!(stats.sites[0].pages_visited, 0);
    assert_eq!(stats.sites[0].pages_blocked, 1);
    assert!(crawler.sink().records().is_empty());
}
