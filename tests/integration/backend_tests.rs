//! Integration tests for the Elasticsearch backend client
//!
//! A wiremock server stands in for the Elasticsearch REST API.

use serde_json::json;
use webdex::backend::{BackendError, DocumentStore, ElasticsearchClient, SearchRequest};
use webdex::document::{document_id, Document};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_root(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "node-1",
            "version": { "number": "8.11.0" }
        })))
        .mount(server)
        .await;
}

fn sample_document(url: &str) -> Document {
    Document {
        url: url.to_string(),
        title: "Sample".to_string(),
        content: Some("Hello world".to_string()),
        content_length: 11,
        mime_type: "text/html".to_string(),
        timestamp: "2024-01-01T00:00:00.000Z".to_string(),
    }
}

#[tokio::test]
async fn test_connect_creates_missing_index() {
    let server = MockServer::start().await;
    mount_root(&server).await;

    Mock::given(method("HEAD"))
        .and(path("/docs"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/docs"))
        .and(body_partial_json(json!({
            "mappings": { "_meta": { "description": "My docs" } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "acknowledged": true })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ElasticsearchClient::connect(&server.uri(), "docs", Some("My docs"))
        .await
        .unwrap();

    assert_eq!(client.index_name(), "docs");
}

#[tokio::test]
async fn test_connect_reuses_existing_index() {
    let server = MockServer::start().await;
    mount_root(&server).await;

    Mock::given(method("HEAD"))
        .and(path("/docs"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/docs"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let created = ElasticsearchClient::new(&server.uri(), "docs")
        .unwrap()
        .ensure_index(None)
        .await
        .unwrap();

    assert!(!created);
}

#[tokio::test]
async fn test_connect_fails_when_index_creation_rejected() {
    let server = MockServer::start().await;
    mount_root(&server).await;

    Mock::given(method("HEAD"))
        .and(path("/docs"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/docs"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad analyzer"))
        .mount(&server)
        .await;

    let err = ElasticsearchClient::connect(&server.uri(), "docs", None)
        .await
        .unwrap_err();

    match err {
        BackendError::Status { status, body, .. } => {
            assert_eq!(status, 400);
            assert_eq!(body, "bad analyzer");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_connect_to_unreachable_backend() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = ElasticsearchClient::connect(&format!("http://{addr}"), "docs", None)
        .await
        .unwrap_err();

    assert!(matches!(err, BackendError::Unreachable { .. }));
}

#[tokio::test]
async fn test_upsert_puts_under_document_id() {
    let server = MockServer::start().await;
    let url = "https://example.com/a?b=c";
    let id = document_id(url);

    Mock::given(method("PUT"))
        .and(path(format!("/docs/_doc/{id}")))
        .and(body_partial_json(json!({
            "url": url,
            "title": "Sample",
            "content_length": 11,
            "mime_type": "text/html"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "result": "created" })))
        .expect(2)
        .mount(&server)
        .await;

    let client = ElasticsearchClient::new(&server.uri(), "docs").unwrap();
    let document = sample_document(url);

    client.upsert(&id, &document).await.unwrap();
    client.upsert(&id, &document).await.unwrap();
}

#[tokio::test]
async fn test_upsert_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = ElasticsearchClient::new(&server.uri(), "docs").unwrap();
    let err = client
        .upsert("abc", &sample_document("http://x.test/"))
        .await
        .unwrap_err();

    assert!(matches!(err, BackendError::Status { status: 503, .. }));
}

#[tokio::test]
async fn test_get_existing_and_missing() {
    let server = MockServer::start().await;
    let url = "http://x.test/";
    let id = document_id(url);

    Mock::given(method("GET"))
        .and(path(format!("/docs/_doc/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_index": "docs",
            "_id": id,
            "found": true,
            "_source": sample_document(url)
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/docs/_doc/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "found": false })))
        .mount(&server)
        .await;

    let client = ElasticsearchClient::new(&server.uri(), "docs").unwrap();

    let found = client.get(&id).await.unwrap();
    assert_eq!(found, Some(sample_document(url)));

    let missing = client.get("missing").await.unwrap();
    assert_eq!(missing, None);
}

#[tokio::test]
async fn test_search_returns_hits_and_cursor() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/docs/_search"))
        .and(body_partial_json(json!({
            "query": { "multi_match": { "query": "rust", "fields": ["title^3", "content"] } },
            "from": 0,
            "size": 2
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hits": {
                "total": { "value": 5, "relation": "eq" },
                "hits": [
                    {
                        "_id": "aaa",
                        "_source": { "title": "Rust book" },
                        "highlight": { "content": ["learn <em>rust</em>"] }
                    },
                    {
                        "_id": "bbb",
                        "_source": { "title": "Rustonomicon" }
                    }
                ]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ElasticsearchClient::new(&server.uri(), "docs").unwrap();
    let page = client
        .search(&SearchRequest::new("rust").with_size(2))
        .await
        .unwrap();

    assert_eq!(page.total, 5);
    assert_eq!(page.hits.len(), 2);
    assert_eq!(page.hits[0].id, "aaa");
    assert_eq!(page.hits[0].title, "Rust book");
    assert_eq!(
        page.hits[0].highlight.get("content"),
        Some(&vec!["learn <em>rust</em>".to_string()])
    );
    assert!(page.hits[1].highlight.is_empty());
    assert_eq!(page.next_cursor.as_deref(), Some("2"));
}

#[tokio::test]
async fn test_search_last_page_has_no_cursor() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/docs/_search"))
        .and(body_partial_json(json!({ "from": 4 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hits": {
                "total": { "value": 5, "relation": "eq" },
                "hits": [ { "_id": "eee", "_source": { "title": "Last" } } ]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ElasticsearchClient::new(&server.uri(), "docs").unwrap();
    let page = client
        .search(&SearchRequest::new("rust").with_cursor(Some("4".to_string())))
        .await
        .unwrap();

    assert_eq!(page.hits.len(), 1);
    assert_eq!(page.next_cursor, None);
}

#[tokio::test]
async fn test_search_rejects_invalid_cursor() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = ElasticsearchClient::new(&server.uri(), "docs").unwrap();
    let err = client
        .search(&SearchRequest::new("rust").with_cursor(Some("page-two".to_string())))
        .await
        .unwrap_err();

    assert!(matches!(err, BackendError::InvalidCursor(_)));
}
