//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end, from seed to sitemap file.

use std::collections::BTreeSet;
use sumi_sitemap::config::Config;
use sumi_sitemap::crawler::crawl;
use sumi_sitemap::output::{FailureKind, OutputHandler, SitemapFileOutput};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration seeded at the mock server root
fn create_test_config(base_url: &str) -> Config {
    let mut config = Config::default();
    config.crawler.seed = format!("{}/", base_url);
    config.crawler.max_concurrent_fetches = 4;
    config.crawler.request_timeout_secs = 5;
    config.user_agent.crawler_name = "TestBot".to_string();
    config
}

/// An HTML response; wiremock defaults string bodies to text/plain
fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/html")
}

async fn mount_page(server: &MockServer, page: &str, body: &str, expected_hits: u64) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(html(body))
        .expect(expected_hits)
        .mount(server)
        .await;
}

fn expected(base_url: &str, paths: &[&str]) -> BTreeSet<String> {
    paths.iter().map(|p| format!("{}{}", base_url, p)).collect()
}

#[tokio::test]
async fn test_full_crawl_single_site() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    mount_page(
        &server,
        "/",
        &format!(
            r##"<html><head><title>Home</title></head><body>
            <a href="/about">About</a>
            <a href="contact">Contact</a>
            <a href="{}/about#team">About again</a>
            <a href="https://elsewhere.example/">Elsewhere</a>
            <a href="mailto:someone@example.com">Mail</a>
            <a href="#top">Top</a>
            </body></html>"##,
            base_url
        ),
        1,
    )
    .await;
    mount_page(
        &server,
        "/about",
        r#"<html><body><a href="/">Home</a><a href="/team/">Team</a></body></html>"#,
        1,
    )
    .await;
    mount_page(&server, "/contact", "<html><body>Write to us</body></html>", 1).await;
    mount_page(
        &server,
        "/team",
        r#"<html><body><a href="/about">About</a></body></html>"#,
        1,
    )
    .await;

    let config = create_test_config(&base_url);
    let report = crawl(&config, CancellationToken::new())
        .await
        .expect("crawl should start");

    assert_eq!(
        report.visited,
        expected(&base_url, &["/", "/about", "/contact", "/team"])
    );
    assert!(report.failures.is_empty());
    assert_eq!(report.pages_fetched, 4);
    assert_eq!(report.max_depth, 2);
    assert!(report.is_complete());
}

#[tokio::test]
async fn test_missing_page_does_not_stop_crawl() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    mount_page(
        &server,
        "/",
        r#"<a href="/missing">Gone</a><a href="/ok">Fine</a>"#,
        1,
    )
    .await;
    mount_page(&server, "/ok", r#"<a href="/deeper">Deeper</a>"#, 1).await;
    mount_page(&server, "/deeper", "<p>end</p>", 1).await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let report = crawl(&create_test_config(&base_url), CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(
        report.visited,
        expected(&base_url, &["/", "/deeper", "/missing", "/ok"])
    );
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].kind, FailureKind::Fetch);
    assert_eq!(report.failures[0].url, format!("{}/missing", base_url));
    assert_eq!(report.pages_fetched, 3);
}

#[tokio::test]
async fn test_cycle_terminates_and_fetches_each_page_once() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    mount_page(&server, "/", r#"<a href="/a">A</a><a href="/">Self</a>"#, 1).await;
    mount_page(&server, "/a", r#"<a href="/b">B</a><a href="/">Home</a>"#, 1).await;
    mount_page(&server, "/b", r#"<a href="/a">A</a><a href="/b/">Self</a>"#, 1).await;

    let report = crawl(&create_test_config(&base_url), CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.visited, expected(&base_url, &["/", "/a", "/b"]));
    // MockServer verifies the expect(1) counts when dropped
}

#[tokio::test]
async fn test_non_html_resource_is_a_fetch_failure() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    mount_page(&server, "/", r#"<a href="/report.pdf">Report</a>"#, 1).await;
    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(b"%PDF-1.4".to_vec(), "application/pdf"),
        )
        .mount(&server)
        .await;

    let report = crawl(&create_test_config(&base_url), CancellationToken::new())
        .await
        .unwrap();

    assert!(report.visited.contains(&format!("{}/report.pdf", base_url)));
    assert_eq!(report.failures_of(FailureKind::Fetch), 1);
}

#[tokio::test]
async fn test_query_strings_kept_by_default() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    mount_page(
        &server,
        "/",
        r#"<a href="/list?page=1">1</a><a href="/list?page=2">2</a><a href="/list?page=1&utm_source=x">1 again</a>"#,
        1,
    )
    .await;
    mount_page(&server, "/list", "<p>list</p>", 2).await;

    let report = crawl(&create_test_config(&base_url), CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(
        report.visited,
        expected(&base_url, &["/", "/list?page=1", "/list?page=2"])
    );
}

#[tokio::test]
async fn test_query_strings_dropped_when_configured() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    mount_page(
        &server,
        "/",
        r#"<a href="/list?page=1">1</a><a href="/list?page=2">2</a>"#,
        1,
    )
    .await;
    mount_page(&server, "/list", "<p>list</p>", 1).await;

    let mut config = create_test_config(&base_url);
    config.url.keep_query = false;

    let report = crawl(&config, CancellationToken::new()).await.unwrap();

    assert_eq!(report.visited, expected(&base_url, &["/", "/list"]));
}

#[tokio::test]
async fn test_crawl_writes_sitemap_file() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    mount_page(
        &server,
        "/",
        r#"<a href="/b">B</a><a href="/a?x=1&y=2">A</a>"#,
        1,
    )
    .await;
    mount_page(&server, "/a", "<p>a</p>", 1).await;
    mount_page(&server, "/b", "<p>b</p>", 1).await;

    let dir = TempDir::new().unwrap();
    let sitemap_path = dir.path().join("sitemap.xml");

    let mut config = create_test_config(&base_url);
    config.output.sitemap_path = sitemap_path.display().to_string();

    let report = crawl(&config, CancellationToken::new()).await.unwrap();
    SitemapFileOutput::new(&config.output.sitemap_path)
        .write_report(&report)
        .unwrap();

    let xml = std::fs::read_to_string(&sitemap_path).unwrap();
    assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert!(xml.contains(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#));
    assert_eq!(xml.matches("<loc>").count(), report.visited.len());

    let root = xml.find(&format!("<loc>{}/</loc>", base_url)).unwrap();
    let a = xml
        .find(&format!("<loc>{}/a?x=1&amp;y=2</loc>", base_url))
        .unwrap();
    let b = xml.find(&format!("<loc>{}/b</loc>", base_url)).unwrap();
    assert!(root < a && a < b);
}

#[tokio::test]
async fn test_unreachable_seed_still_yields_sitemap_entry() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let report = crawl(&create_test_config(&base_url), CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.visited, expected(&base_url, &["/"]));
    assert_eq!(report.pages_fetched, 0);
    assert_eq!(report.failures_of(FailureKind::Fetch), 1);
}
