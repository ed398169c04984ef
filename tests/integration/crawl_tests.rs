//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl-to-index cycle end-to-end against an in-memory store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use webdex::backend::{BackendResult, DocumentStore};
use webdex::config::{parse_config, Config};
use webdex::crawler::Coordinator;
use webdex::document::{document_id, Document};
use webdex::StopReason;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Document store keeping everything in memory, in write order
#[derive(Default)]
struct MemoryStore {
    docs: Mutex<HashMap<String, Document>>,
    order: Mutex<Vec<String>>,
}

impl MemoryStore {
    fn urls(&self) -> Vec<String> {
        self.order.lock().unwrap().clone()
    }

    fn len(&self) -> usize {
        self.docs.lock().unwrap().len()
    }

    fn by_url(&self, url: &str) -> Option<Document> {
        self.docs.lock().unwrap().get(&document_id(url)).cloned()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn upsert(&self, id: &str, document: &Document) -> BackendResult<()> {
        self.order.lock().unwrap().push(document.url.clone());
        self.docs
            .lock()
            .unwrap()
            .insert(id.to_string(), document.clone());
        Ok(())
    }

    async fn get(&self, id: &str) -> BackendResult<Option<Document>> {
        Ok(self.docs.lock().unwrap().get(id).cloned())
    }
}

/// Creates a test configuration; `extra` lines go into `[crawler]`, `filter` into `[filter]`
fn create_test_config(seed: &str, extra: &str, filter: &str) -> Config {
    parse_config(&format!(
        r#"
        [crawler]
        seeds = ["{seed}"]
        delay = 0.0
        request-timeout = 5
        {extra}

        [filter]
        {filter}

        [index]
        name = "test-docs"
        description = "Integration test index"
        "#
    ))
    .expect("test config should be valid")
}

fn html_page(title: &str, body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><head><title>{title}</title></head><body>{body}</body></html>"),
        "text/html; charset=utf-8",
    )
}

async fn mount_page(server: &MockServer, route: &str, title: &str, body: &str, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html_page(title, body))
        .expect(times)
        .mount(server)
        .await;
}

async fn crawl(config: Config) -> (Arc<MemoryStore>, webdex::output::CrawlStats) {
    let store = Arc::new(MemoryStore::default());
    let stats = Coordinator::new(config, store.clone())
        .expect("coordinator should build")
        .run()
        .await
        .expect("crawl should succeed");
    (store, stats)
}

#[tokio::test]
async fn test_full_crawl_respects_max_depth() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        "Home",
        r#"<a href="/a">A</a> <a href="/b">B</a>"#,
        1,
    )
    .await;
    mount_page(&server, "/a", "Page A", r#"<a href="/deep">Deep</a>"#, 1).await;
    mount_page(&server, "/b", "Page B", r#"<a href="/deep#x">Deep</a>"#, 1).await;
    mount_page(&server, "/deep", "Too deep", "", 0).await;

    let config = create_test_config(&format!("{base}/"), "max-depth = 1", "");
    let (store, stats) = crawl(config).await;

    assert_eq!(stats.stop_reason, StopReason::Exhausted);
    assert_eq!(stats.documents_indexed, 3);
    assert_eq!(stats.pages_fetched, 3);
    assert_eq!(stats.depth_skipped, 1);
    assert_eq!(stats.urls_seen, 4);
    assert_eq!(store.len(), 3);

    let home = store.by_url(&format!("{base}/")).expect("home indexed");
    assert_eq!(home.title, "Home");
    assert_eq!(home.mime_type, "text/html");
    assert_eq!(home.content.as_deref(), Some("Home\nA B"));
    assert!(store.by_url(&format!("{base}/deep")).is_none());
}

#[tokio::test]
async fn test_breadth_first_order_with_single_worker() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        "Home",
        r#"<a href="/one">1</a><a href="/two">2</a>"#,
        1,
    )
    .await;
    mount_page(&server, "/one", "One", r#"<a href="/three">3</a>"#, 1).await;
    mount_page(&server, "/two", "Two", "", 1).await;
    mount_page(&server, "/three", "Three", "", 1).await;

    let config = create_test_config(&format!("{base}/"), "", "");
    let (store, _) = crawl(config).await;

    assert_eq!(
        store.urls(),
        vec![
            format!("{base}/"),
            format!("{base}/one"),
            format!("{base}/two"),
            format!("{base}/three"),
        ]
    );
}

#[tokio::test]
async fn test_shared_link_fetched_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        "Home",
        r#"<a href="/a">A</a><a href="/b">B</a><a href="/">Self</a>"#,
        1,
    )
    .await;
    mount_page(&server, "/a", "A", r#"<a href="/shared">S</a>"#, 1).await;
    mount_page(&server, "/b", "B", r#"<a href="/shared#top">S</a>"#, 1).await;
    mount_page(&server, "/shared", "Shared", "", 1).await;

    let config = create_test_config(&format!("{base}/"), "", "");
    let (store, stats) = crawl(config).await;

    assert_eq!(stats.documents_indexed, 4);
    assert_eq!(stats.urls_seen, 4);
    assert_eq!(store.len(), 4);
}

#[tokio::test]
async fn test_allowed_domains_keep_crawl_on_site() {
    let server = MockServer::start().await;
    let other = MockServer::start().await;
    let base = server.uri();
    let port = server.address().port();

    mount_page(
        &server,
        "/",
        "Home",
        &format!(r#"<a href="/inside">In</a><a href="{}/outside">Out</a>"#, other.uri()),
        1,
    )
    .await;
    mount_page(&server, "/inside", "Inside", "", 1).await;
    mount_page(&other, "/outside", "Outside", "", 0).await;

    let filter = format!(r#"allowed-domains = ["127.0.0.1:{port}"]"#);
    let config = create_test_config(&format!("{base}/"), "", &filter);
    let (store, stats) = crawl(config).await;

    assert_eq!(stats.documents_indexed, 2);
    assert_eq!(stats.links_enqueued, 1);
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn test_target_and_exclude_patterns() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        "Home",
        r#"<a href="/docs/intro">Intro</a><a href="/docs/private/x">Private</a><a href="/blog/post">Blog</a>"#,
        1,
    )
    .await;
    mount_page(&server, "/docs/intro", "Intro", "", 1).await;
    mount_page(&server, "/docs/private/x", "Private", "", 0).await;
    mount_page(&server, "/blog/post", "Blog", "", 0).await;

    let escaped = base.replace('.', r"\\.");
    let filter = format!(
        r#"target-patterns = ["{escaped}/docs/"]
        exclude-patterns = [".*/private/"]"#
    );
    let config = create_test_config(&format!("{base}/"), "", &filter);
    let (_, stats) = crawl(config).await;

    assert_eq!(stats.documents_indexed, 2);
}

#[tokio::test]
async fn test_document_cap_stops_crawl() {
    let server = MockServer::start().await;
    let base = server.uri();

    let links: String = (1..=5)
        .map(|i| format!(r#"<a href="/p{i}">{i}</a>"#))
        .collect();
    mount_page(&server, "/", "Home", &links, 1).await;
    for i in 1..=5 {
        Mock::given(method("GET"))
            .and(path(format!("/p{i}")))
            .respond_with(html_page(&format!("P{i}"), ""))
            .mount(&server)
            .await;
    }

    let mut config = create_test_config(&format!("{base}/"), "", "");
    config.crawler.delay = 0.2;
    config.crawler.max_documents = Some(2);
    let (store, stats) = crawl(config).await;

    assert_eq!(stats.stop_reason, StopReason::DocumentLimit);
    assert_eq!(stats.documents_indexed, 2);
    assert_eq!(store.len(), 2);
    assert!(stats.pages_fetched <= 3);
}

#[tokio::test]
async fn test_failed_fetch_does_not_stop_crawl() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        "Home",
        r#"<a href="/broken">Broken</a><a href="/ok">Ok</a>"#,
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/ok", "Ok", "", 1).await;

    let config = create_test_config(&format!("{base}/"), "", "");
    let (store, stats) = crawl(config).await;

    assert_eq!(stats.stop_reason, StopReason::Exhausted);
    assert_eq!(stats.fetch_failures, 1);
    assert_eq!(stats.documents_indexed, 2);
    assert!(store.by_url(&format!("{base}/broken")).is_none());
    assert!(store.by_url(&format!("{base}/ok")).is_some());
}

#[tokio::test]
async fn test_binary_content_is_indexed() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", "Home", r#"<a href="/report.pdf">Report</a>"#, 1).await;
    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/pdf")
                .set_body_bytes(vec![7u8; 64]),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&format!("{base}/"), "", "");
    let (store, _) = crawl(config).await;

    let url = format!("{base}/report.pdf");
    let doc = store.by_url(&url).expect("binary document indexed");
    assert_eq!(doc.title, format!("Binary Content: {url}"));
    assert_eq!(doc.mime_type, "application/pdf");
    assert_eq!(doc.content, None);
    assert_eq!(doc.content_length, 64);
}

#[tokio::test]
async fn test_multiple_workers_fetch_each_page_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    let links: String = (0..10)
        .map(|i| format!(r#"<a href="/item/{i}">{i}</a><a href="/item/{}">next</a>"#, (i + 1) % 10))
        .collect();
    mount_page(&server, "/", "Home", &links, 1).await;
    for i in 0..10 {
        mount_page(
            &server,
            &format!("/item/{i}"),
            &format!("Item {i}"),
            r#"<a href="/">Home</a>"#,
            1,
        )
        .await;
    }

    let config = create_test_config(&format!("{base}/"), "workers = 4", "");
    let (store, stats) = crawl(config).await;

    assert_eq!(stats.stop_reason, StopReason::Exhausted);
    assert_eq!(stats.documents_indexed, 11);
    assert_eq!(stats.pages_fetched, 11);
    assert_eq!(store.len(), 11);
}
