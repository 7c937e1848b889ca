//! Runtime configuration for lookups
//!
//! Upstream base URL, cache TTL, fetch timeout and default request headers.
//! Every value can be overridden from the command line.

use std::time::Duration;

/// Base URL of the record search pages; the registration number is appended
pub const DEFAULT_BASE_URL: &str = "https://vahanx.in/rc-search";

/// Default headers sent with every upstream request
pub const DEFAULT_HEADERS: [(&str, &str); 3] = [
    (
        "User-Agent",
        "Mozilla/5.0 (Linux; Android 10; Mobile) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/130.0.0.0 Mobile Safari/537.36",
    ),
    (
        "Accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
    ),
    ("Accept-Language", "en-US,en;q=0.9"),
];

/// Configuration for the lookup pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupConfig {
    /// Upstream base URL, without trailing registration number
    pub base_url: String,
    /// How long a completed lookup is served from cache
    pub cache_ttl: Duration,
    /// Upper bound on a single upstream request
    pub fetch_timeout: Duration,
    /// Headers sent with every upstream request
    pub headers: Vec<(String, String)>,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            cache_ttl: Duration::from_secs(600),     // 10 minutes
            fetch_timeout: Duration::from_secs(12),
            headers: DEFAULT_HEADERS
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        }
    }
}

impl LookupConfig {
    /// Sets a header, replacing any existing header with the same name
    ///
    /// Header names compare case-insensitively.
    pub fn set_header(&mut self, name: &str, value: &str) {
        self.headers
            .retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.to_string()));
    }
}
