//! Vehicle detail lookups
//!
//! Ties together normalization, the TTL cache, the upstream fetcher and the
//! label extractor. Only completed lookups are cached; fetch and parse errors
//! are returned to the caller and the next request tries upstream again.

use scraper::Html;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::fetch::{ConfigError, Fetcher, HttpFetcher};
use super::{FieldMap, LookupError, ResultPayload, LABELS};
use crate::cache::TtlCache;
use crate::config::LookupConfig;
use crate::extract::extract_fields;
use crate::normalize::normalize_rc;

/// A completed lookup, fresh or served from cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleLookup {
    /// Normalized registration number
    pub rc: String,
    /// Extracted details
    pub payload: ResultPayload,
    /// Whether the payload came from the cache
    pub from_cache: bool,
}

/// Client for looking up vehicle details by registration number
///
/// Construct once at startup and share; the cache inside is the only mutable
/// state and is safe to use from concurrent lookups. Two simultaneous misses
/// for the same number both fetch, and the later write wins.
pub struct VehicleClient {
    /// Source of record pages
    fetcher: Arc<dyn Fetcher>,
    /// Completed lookups by normalized registration number
    cache: Arc<TtlCache<ResultPayload>>,
    /// Base URL for record pages
    base_url: String,
}

impl VehicleClient {
    /// Creates a client from its collaborators
    pub fn new(
        base_url: impl Into<String>,
        fetcher: Arc<dyn Fetcher>,
        cache: Arc<TtlCache<ResultPayload>>,
    ) -> Self {
        Self {
            fetcher,
            cache,
            base_url: base_url.into(),
        }
    }

    /// Creates a client with an HTTP fetcher and a fresh cache from `config`
    pub fn from_config(config: &LookupConfig) -> Result<Self, ConfigError> {
        let fetcher = HttpFetcher::new(config)?;
        Ok(Self::new(
            config.base_url.clone(),
            Arc::new(fetcher),
            Arc::new(TtlCache::new(config.cache_ttl)),
        ))
    }

    /// The cache backing this client
    pub fn cache(&self) -> &TtlCache<ResultPayload> {
        &self.cache
    }

    /// Record page URL for an already-normalized registration number
    pub fn record_url(&self, rc: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), rc)
    }

    /// Looks up details for a registration number
    ///
    /// # Arguments
    /// * `raw_rc` - Registration number as typed; case and whitespace are ignored
    ///
    /// # Returns
    /// * `Ok(VehicleLookup)` - Completed lookup; `payload.found` is false when
    ///   the page had none of the labels
    /// * `Err(LookupError)` - Upstream could not be fetched or parsed
    ///
    /// # Behavior
    /// - Fresh cache entries are returned without touching upstream
    /// - On a miss the record page is fetched once, with no retry
    /// - Every completed lookup is cached, including ones that found nothing
    pub async fn lookup(&self, raw_rc: &str) -> Result<VehicleLookup, LookupError> {
        let rc = normalize_rc(raw_rc);

        if let Some(payload) = self.cache.get(&rc) {
            return Ok(VehicleLookup {
                rc,
                payload,
                from_cache: true,
            });
        }
        debug!(rc = %rc, "cache miss");

        let url = self.record_url(&rc);
        let body = self.fetcher.fetch(&url).await.inspect_err(|e| {
            warn!(rc = %rc, error = %e, "upstream fetch failed");
        })?;

        let fields = parse_fields(&body).inspect_err(|e| {
            warn!(rc = %rc, error = %e, "record page could not be parsed");
        })?;
        let payload = ResultPayload::from_fields(fields);
        info!(rc = %rc, found = payload.found, "lookup completed");

        self.cache.put(&rc, payload.clone());
        Ok(VehicleLookup {
            rc,
            payload,
            from_cache: false,
        })
    }
}

/// Parses a record page body and extracts every known label
///
/// Fails only when the body is not valid UTF-8; any markup is recovered into a
/// document tree.
pub fn parse_fields(body: &[u8]) -> Result<FieldMap, LookupError> {
    let html = std::str::from_utf8(body).map_err(|e| LookupError::Parse(e.to_string()))?;
    let document = Html::parse_document(html);
    Ok(extract_fields(&document, &LABELS))
}
