//! Caching layer for geocoding responses.
//!
//! Users retype the same prefixes and re-resolve the same itinerary every
//! time a place is added or removed, so successful responses are cached
//! per (mode, normalized query). Failures are never cached.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::trace;

use crate::geocode::{Feature, GeocodeError, Geocoder, QueryMode};

/// Cache key: request mode plus trimmed, lowercased query text.
type QueryKey = (QueryMode, String);

/// Cached response entry.
type QueryEntry = Arc<Vec<Feature>>;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(10 * 60),
            max_capacity: 1000,
        }
    }
}

/// Geocoder with response caching.
///
/// Wraps any [`Geocoder`] and answers repeated queries from memory.
pub struct CachedGeocoder<G> {
    inner: G,
    cache: MokaCache<QueryKey, QueryEntry>,
}

impl<G: Geocoder> CachedGeocoder<G> {
    /// Create a new cached geocoder.
    pub fn new(inner: G, config: &CacheConfig) -> Self {
        let cache = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { inner, cache }
    }

    /// Access the underlying geocoder for operations that bypass cache.
    pub fn inner(&self) -> &G {
        &self.inner
    }

    /// Get cache statistics.
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    fn key(query: &str, mode: QueryMode) -> QueryKey {
        (mode, query.trim().to_lowercase())
    }
}

impl<G: Geocoder> Geocoder for CachedGeocoder<G> {
    async fn forward(&self, query: &str, mode: QueryMode) -> Result<Vec<Feature>, GeocodeError> {
        let key = Self::key(query, mode);

        // Try cache first
        if let Some(cached) = self.cache.get(&key).await {
            trace!(query, ?mode, "Geocode cache hit");
            return Ok(cached.as_ref().clone());
        }

        let features = self.inner.forward(query, mode).await?;
        self.cache.insert(key, Arc::new(features.clone())).await;

        Ok(features)
    }

    fn is_configured(&self) -> bool {
        self.inner.is_configured()
    }
}
