use crate::config::FilterConfig;
use crate::ConfigError;
use regex::Regex;
use url::Url;

/// Compiles URL patterns so that each one matches from the start of the URL
///
/// A pattern like `.*\.html$` must account for the whole prefix of the URL,
/// the same way an anchored regex match would.
pub fn compile_patterns(patterns: &[String]) -> Result<Vec<Regex>, ConfigError> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(&format!("^(?:{})", pattern)).map_err(|e| {
                ConfigError::InvalidPattern(format!("'{}': {}", pattern, e))
            })
        })
        .collect()
}

/// Decides whether a discovered link may enter the frontier
///
/// Checks run in a fixed order and the first failure rejects:
///
/// 1. Domain allow-list (skipped when empty): the host must equal an entry.
///    An entry with a port (`host:port`) must match host and port.
/// 2. Target patterns (skipped when empty): at least one must match.
/// 3. Exclude patterns: any match rejects, even after a target match.
#[derive(Debug, Clone, Default)]
pub struct LinkFilter {
    allowed_domains: Vec<String>,
    target_patterns: Vec<Regex>,
    exclude_patterns: Vec<Regex>,
}

impl LinkFilter {
    /// Builds a filter from configuration, compiling every pattern
    pub fn from_config(config: &FilterConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            allowed_domains: config
                .allowed_domains
                .iter()
                .map(|d| d.trim().to_lowercase())
                .collect(),
            target_patterns: compile_patterns(&config.target_patterns)?,
            exclude_patterns: compile_patterns(&config.exclude_patterns)?,
        })
    }

    /// Returns true if the link passes every configured check
    pub fn is_valid(&self, url: &Url) -> bool {
        if !self.allowed_domains.is_empty() && !self.domain_allowed(url) {
            tracing::trace!("Rejected {}: host not in allow-list", url);
            return false;
        }

        let link = url.as_str();

        if !self.target_patterns.is_empty()
            && !self.target_patterns.iter().any(|re| re.is_match(link))
        {
            tracing::trace!("Rejected {}: no target pattern matched", url);
            return false;
        }

        if self.exclude_patterns.iter().any(|re| re.is_match(link)) {
            tracing::trace!("Rejected {}: exclude pattern matched", url);
            return false;
        }

        true
    }

    fn domain_allowed(&self, url: &Url) -> bool {
        let Some(host) = url.host_str() else {
            return false;
        };

        let with_port = url.port().map(|port| format!("{}:{}", host, port));

        self.allowed_domains
            .iter()
            .any(|allowed| allowed == host || with_port.as_deref() == Some(allowed.as_str()))
    }
}
