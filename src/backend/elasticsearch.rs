//! Elasticsearch implementation of the document store
//!
//! Talks to the REST API directly with reqwest: connectivity probe, index
//! creation, upsert and lookup by id, and multi-field search.

use crate::backend::schema::index_definition;
use crate::backend::search::{decode_cursor, next_cursor, SearchHit, SearchPage, SearchRequest};
use crate::backend::{BackendError, BackendResult, DocumentStore};
use crate::document::Document;
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;

/// Timeout for every backend request
const BACKEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Elasticsearch client bound to a single index
#[derive(Debug, Clone)]
pub struct ElasticsearchClient {
    client: Client,
    base_url: String,
    index: String,
}

#[derive(Debug, Deserialize)]
struct GetResponse {
    #[serde(rename = "_source")]
    source: Option<Document>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
struct HitsEnvelope {
    total: Option<TotalHits>,
    #[serde(default)]
    hits: Vec<RawHit>,
}

#[derive(Debug, Deserialize)]
struct TotalHits {
    value: u64,
}

#[derive(Debug, Deserialize)]
struct RawHit {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_source", default)]
    source: Option<HitSource>,
    #[serde(default)]
    highlight: HashMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct HitSource {
    title: Option<String>,
}

impl ElasticsearchClient {
    /// Creates a client without touching the network
    pub fn new(base_url: &str, index: &str) -> BackendResult<Self> {
        let client = Client::builder()
            .timeout(BACKEND_TIMEOUT)
            .build()
            .map_err(|source| BackendError::Http {
                operation: "build client".to_string(),
                source,
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            index: index.to_string(),
        })
    }

    /// Creates a client, verifies the node answers and makes sure the index exists
    ///
    /// Any failure here means no crawl should start.
    pub async fn connect(
        base_url: &str,
        index: &str,
        description: Option<&str>,
    ) -> BackendResult<Self> {
        let client = Self::new(base_url, index)?;
        client.check_connection().await?;
        client.ensure_index(description).await?;
        Ok(client)
    }

    /// Name of the index this client reads and writes
    pub fn index_name(&self) -> &str {
        &self.index
    }

    /// Verifies the node is reachable
    pub async fn check_connection(&self) -> BackendResult<()> {
        let response = self
            .client
            .get(&self.base_url)
            .send()
            .await
            .map_err(|source| BackendError::Unreachable {
                url: self.base_url.clone(),
                source,
            })?;
        ensure_success(response, "connection check").await?;

        tracing::info!("Connected to Elasticsearch at {}", self.base_url);
        Ok(())
    }

    /// Creates the index with its schema if it does not exist yet
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The index was created
    /// * `Ok(false)` - The index already existed
    pub async fn ensure_index(&self, description: Option<&str>) -> BackendResult<bool> {
        let index_url = self.index_url();
        let response = self
            .client
            .head(&index_url)
            .send()
            .await
            .map_err(|source| http_error("index probe", source))?;

        match response.status() {
            StatusCode::OK => {
                tracing::info!("Index '{}' already exists", self.index);
                Ok(false)
            }
            StatusCode::NOT_FOUND => {
                let body = index_definition(&self.index, description);
                let response = self
                    .client
                    .put(&index_url)
                    .json(&body)
                    .send()
                    .await
                    .map_err(|source| http_error("index creation", source))?;
                ensure_success(response, "index creation").await?;

                tracing::info!("Index '{}' created", self.index);
                Ok(true)
            }
            _ => {
                ensure_success(response, "index probe").await?;
                Ok(false)
            }
        }
    }

    /// Searches title and content, returning one page of highlighted hits
    pub async fn search(&self, request: &SearchRequest) -> BackendResult<SearchPage> {
        let offset = decode_cursor(request.cursor.as_deref())?;

        let body = json!({
            "query": {
                "multi_match": {
                    "query": request.query,
                    "fields": ["title^3", "content"]
                }
            },
            "highlight": {
                "fields": {
                    "content": {},
                    "title": {}
                },
                "pre_tags": ["<em>"],
                "post_tags": ["</em>"]
            },
            "_source": ["title"],
            "from": offset,
            "size": request.size
        });

        let response = self
            .client
            .post(format!("{}/_search", self.index_url()))
            .json(&body)
            .send()
            .await
            .map_err(|source| http_error("search", source))?;
        let response = ensure_success(response, "search").await?;

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))?;

        let total = parsed
            .hits
            .total
            .map_or(parsed.hits.hits.len() as u64, |t| t.value);

        let hits: Vec<SearchHit> = parsed
            .hits
            .hits
            .into_iter()
            .map(|hit| SearchHit {
                title: hit.source.and_then(|s| s.title).unwrap_or_default(),
                id: hit.id,
                highlight: hit.highlight,
            })
            .collect();

        Ok(SearchPage {
            next_cursor: next_cursor(offset, hits.len(), total),
            total,
            hits,
        })
    }

    fn index_url(&self) -> String {
        format!("{}/{}", self.base_url, self.index)
    }

    fn doc_url(&self, id: &str) -> String {
        format!("{}/_doc/{}", self.index_url(), id)
    }
}

#[async_trait]
impl DocumentStore for ElasticsearchClient {
    async fn upsert(&self, id: &str, document: &Document) -> BackendResult<()> {
        let response = self
            .client
            .put(self.doc_url(id))
            .json(document)
            .send()
            .await
            .map_err(|source| http_error("upsert", source))?;
        ensure_success(response, "upsert").await?;
        Ok(())
    }

    async fn get(&self, id: &str) -> BackendResult<Option<Document>> {
        let response = self
            .client
            .get(self.doc_url(id))
            .send()
            .await
            .map_err(|source| http_error("get", source))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = ensure_success(response, "get").await?;
        let parsed: GetResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))?;

        Ok(parsed.source)
    }
}

fn http_error(operation: &str, source: reqwest::Error) -> BackendError {
    BackendError::Http {
        operation: operation.to_string(),
        source,
    }
}

/// Turns a non-2xx response into `BackendError::Status`, keeping the body for the log
async fn ensure_success(response: Response, operation: &str) -> BackendResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(BackendError::Status {
        operation: operation.to_string(),
        status: status.as_u16(),
        body,
    })
}
