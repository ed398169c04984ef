use serde::Deserialize;

/// Default maximum crawl depth
pub const DEFAULT_MAX_DEPTH: u32 = 5;

/// Default delay between requests (seconds)
pub const DEFAULT_DELAY_SECS: f64 = 1.0;

/// Default per-request timeout (seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Default user agent sent with every fetch
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; webdex/1.0)";

/// Default Elasticsearch endpoint
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:9200";

/// Main configuration structure for Webdex
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    pub index: IndexConfig,
    #[serde(default)]
    pub backend: BackendConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// URLs the crawl starts from (depth 0)
    pub seeds: Vec<String>,

    /// Maximum depth to crawl from seed URLs
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Politeness delay after every processed entry (seconds)
    #[serde(default = "default_delay")]
    pub delay: f64,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum number of documents to index; unbounded when absent
    #[serde(rename = "max-documents", default)]
    pub max_documents: Option<u64>,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout", default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Number of fetch workers sharing the frontier
    #[serde(default = "default_workers")]
    pub workers: usize,
}

/// Link filter configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterConfig {
    /// Hosts a discovered link may point to; empty allows every host
    #[serde(rename = "allowed-domains", default)]
    pub allowed_domains: Vec<String>,

    /// Regexes a discovered link must match (at least one); empty allows all
    #[serde(rename = "target-patterns", default)]
    pub target_patterns: Vec<String>,

    /// Regexes that reject a discovered link, even when a target pattern matched
    #[serde(rename = "exclude-patterns", default)]
    pub exclude_patterns: Vec<String>,
}

/// Target index configuration
#[derive(Debug, Clone, Deserialize)]
pub struct IndexConfig {
    /// Name of the Elasticsearch index
    pub name: String,

    /// Human-readable description stored in the index metadata
    pub description: String,
}

/// Search backend connection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the Elasticsearch node
    #[serde(default = "default_backend_url")]
    pub url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
        }
    }
}

fn default_max_depth() -> u32 {
    DEFAULT_MAX_DEPTH
}

fn default_delay() -> f64 {
    DEFAULT_DELAY_SECS
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_workers() -> usize {
    1
}

fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}
