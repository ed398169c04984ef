use crate::config::types::{Config, CrawlerConfig, FilterConfig, IndexConfig};
use crate::url::compile_patterns;
use crate::ConfigError;
use std::time::Duration;
use url::Url;

/// Upper bound on fetch workers sharing one frontier
const MAX_WORKERS: usize = 16;

/// Characters Elasticsearch refuses in index names
const INVALID_INDEX_CHARS: &[char] = &['\\', '/', '*', '?', '"', '<', '>', '|', ',', '#', ':'];

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_filter_config(&config.filter)?;
    validate_index_config(&config.index)?;
    validate_backend_url(&config.backend.url)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.seeds.is_empty() {
        return Err(ConfigError::Validation(
            "at least one seed URL is required".to_string(),
        ));
    }

    for seed in &config.seeds {
        let url = Url::parse(seed)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Validation(format!(
                "Seed URL '{}' must use HTTP or HTTPS",
                seed
            )));
        }
    }

    if Duration::try_from_secs_f64(config.delay).is_err() {
        return Err(ConfigError::Validation(format!(
            "delay must be a non-negative, representable number of seconds, got {}",
            config.delay
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.max_documents == Some(0) {
        return Err(ConfigError::Validation(
            "max-documents must be >= 1 when set".to_string(),
        ));
    }

    if config.request_timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "request-timeout must be >= 1 second, got {}",
            config.request_timeout
        )));
    }

    if config.workers < 1 || config.workers > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and {}, got {}",
            MAX_WORKERS, config.workers
        )));
    }

    Ok(())
}

/// Validates the link filter: every pattern must compile
fn validate_filter_config(config: &FilterConfig) -> Result<(), ConfigError> {
    for domain in &config.allowed_domains {
        if domain.trim().is_empty() || domain.contains('/') {
            return Err(ConfigError::Validation(format!(
                "allowed domain '{}' must be a bare host",
                domain
            )));
        }
    }

    compile_patterns(&config.target_patterns)?;
    compile_patterns(&config.exclude_patterns)?;
    Ok(())
}

/// Validates the target index settings
fn validate_index_config(config: &IndexConfig) -> Result<(), ConfigError> {
    let name = &config.name;

    if name.is_empty() {
        return Err(ConfigError::Validation(
            "index name cannot be empty".to_string(),
        ));
    }

    if name.chars().any(|c| c.is_uppercase() || c.is_whitespace()) {
        return Err(ConfigError::Validation(format!(
            "index name '{}' must be lowercase without whitespace",
            name
        )));
    }

    if name.contains(INVALID_INDEX_CHARS) || name.starts_with(['-', '_', '+']) {
        return Err(ConfigError::Validation(format!(
            "index name '{}' contains characters Elasticsearch does not accept",
            name
        )));
    }

    if config.description.trim().is_empty() {
        return Err(ConfigError::Validation(
            "index description cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the backend base URL
fn validate_backend_url(url: &str) -> Result<(), ConfigError> {
    let parsed = Url::parse(url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid backend url '{}': {}", url, e)))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "backend url '{}' must use HTTP or HTTPS",
            url
        )));
    }

    Ok(())
}
