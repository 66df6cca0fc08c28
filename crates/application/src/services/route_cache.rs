//! Memoization of leg estimates
//!
//! Backed by moka's async cache. Concurrent lookups for the same key share a
//! single initialization, so a leg is computed (and a provider called) at
//! most once while its entry is live.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use domain::{RouteEstimate, StopId, TransportMode};
use moka::future::Cache;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Default number of memoized legs
const DEFAULT_MAX_ENTRIES: u64 = 1000;

/// Identity of a memoized leg
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Departure stop
    pub origin: StopId,
    /// Arrival stop
    pub destination: StopId,
    /// Resolved mode of the leg
    pub mode: TransportMode,
}

impl CacheKey {
    /// Create a key
    #[must_use]
    pub const fn new(origin: StopId, destination: StopId, mode: TransportMode) -> Self {
        Self {
            origin,
            destination,
            mode,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}:{}", self.origin, self.destination, self.mode)
    }
}

/// Route cache settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteCacheConfig {
    /// Maximum number of memoized legs
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,

    /// Entry lifetime in seconds; `None` keeps entries until cleared
    #[serde(default)]
    pub ttl_secs: Option<u64>,
}

const fn default_max_entries() -> u64 {
    DEFAULT_MAX_ENTRIES
}

impl Default for RouteCacheConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            ttl_secs: None,
        }
    }
}

/// Counters describing cache effectiveness
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RouteCacheStats {
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that had to compute (or wait for a computation)
    pub misses: u64,
    /// Live entries (approximate until pending maintenance runs)
    pub entries: u64,
}

/// Memoizes [`RouteEstimate`]s per (origin, destination, mode)
pub struct RouteCache {
    cache: Cache<CacheKey, RouteEstimate>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl fmt::Debug for RouteCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteCache")
            .field("entries", &self.cache.entry_count())
            .field("hits", &self.hits.load(Ordering::Relaxed))
            .field("misses", &self.misses.load(Ordering::Relaxed))
            .finish()
    }
}

impl RouteCache {
    /// Create a cache with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&RouteCacheConfig::default())
    }

    /// Create a cache from settings
    #[must_use]
    pub fn with_config(config: &RouteCacheConfig) -> Self {
        let mut builder = Cache::builder().max_capacity(config.max_entries);
        if let Some(ttl) = config.ttl_secs {
            builder = builder.time_to_live(Duration::from_secs(ttl));
        }

        Self {
            cache: builder.build(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Return the memoized estimate for `key`, computing it on a miss
    ///
    /// Concurrent callers with the same key await one shared computation.
    /// A computation that fails stores nothing.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `compute`, shared between all callers
    /// that were waiting on it.
    #[instrument(skip(self, key, compute), fields(key = %key), level = "debug")]
    pub async fn get_or_compute<F, E>(
        &self,
        key: CacheKey,
        compute: F,
    ) -> Result<RouteEstimate, Arc<E>>
    where
        F: Future<Output = Result<RouteEstimate, E>>,
        E: Send + Sync + 'static,
    {
        if let Some(estimate) = self.cache.get(&key).await {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!("Route cache hit");
            return Ok(estimate);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!("Route cache miss");
        self.cache.try_get_with(key, compute).await
    }

    /// Look up an entry without computing
    pub async fn get(&self, key: &CacheKey) -> Option<RouteEstimate> {
        self.cache.get(key).await
    }

    /// Discard the memoized estimate for `key`
    pub async fn invalidate(&self, key: &CacheKey) {
        self.cache.invalidate(key).await;
    }

    /// Discard every memoized estimate
    pub fn clear(&self) {
        self.cache.invalidate_all();
        debug!("Route cache cleared");
    }

    /// Snapshot of the hit/miss/entry counters
    pub async fn stats(&self) -> RouteCacheStats {
        self.cache.run_pending_tasks().await;
        RouteCacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.cache.entry_count(),
        }
    }
}

impl Default for RouteCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::EstimateSource;
    use std::sync::atomic::AtomicUsize;

    fn key(origin: &str, destination: &str) -> CacheKey {
        CacheKey::new(origin.into(), destination.into(), TransportMode::Driving)
    }

    fn estimate(km: f64) -> RouteEstimate {
        RouteEstimate::new(km, 10, EstimateSource::Fallback)
    }

    #[tokio::test]
    async fn computes_once_then_hits() {
        let cache = RouteCache::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let result = cache
                .get_or_compute(key("a", "b"), async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, ()>(estimate(12.0))
                })
                .await
                .unwrap();
            assert!((result.distance_km - 12.0).abs() < f64::EPSILON);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let stats = cache.stats().await;
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
    }

    #[tokio::test]
    async fn mode_is_part_of_the_key() {
        let cache = RouteCache::new();
        let walking = CacheKey::new("a".into(), "b".into(), TransportMode::Walking);

        cache
            .get_or_compute(key("a", "b"), async { Ok::<_, ()>(estimate(1.0)) })
            .await
            .unwrap();
        let result = cache
            .get_or_compute(walking, async { Ok::<_, ()>(estimate(2.0)) })
            .await
            .unwrap();

        assert!((result.distance_km - 2.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn direction_is_part_of_the_key() {
        let cache = RouteCache::new();
        cache
            .get_or_compute(key("a", "b"), async { Ok::<_, ()>(estimate(1.0)) })
            .await
            .unwrap();
        assert!(cache.get(&key("b", "a")).await.is_none());
    }

    #[tokio::test]
    async fn failed_computation_is_not_stored() {
        let cache = RouteCache::new();

        let err = cache
            .get_or_compute(key("a", "b"), async { Err::<RouteEstimate, _>("boom") })
            .await
            .unwrap_err();
        assert_eq!(*err, "boom");
        assert!(cache.get(&key("a", "b")).await.is_none());

        let ok = cache
            .get_or_compute(key("a", "b"), async { Ok::<_, &str>(estimate(3.0)) })
            .await
            .unwrap();
        assert!((ok.distance_km - 3.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn concurrent_lookups_share_one_computation() {
        let cache = Arc::new(RouteCache::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let calls = Arc::clone(&calls);
                tokio::spawn(async move {
                    cache
                        .get_or_compute(key("a", "b"), async {
                            calls.fetch_add(1, Ordering::SeqCst);
                            tokio::time::sleep(Duration::from_millis(20)).await;
                            Ok::<_, ()>(estimate(5.0))
                        })
                        .await
                })
            })
            .collect();

        for task in tasks {
            assert!(task.await.unwrap().is_ok());
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn clear_discards_entries() {
        let cache = RouteCache::new();
        cache
            .get_or_compute(key("a", "b"), async { Ok::<_, ()>(estimate(1.0)) })
            .await
            .unwrap();

        cache.clear();

        assert!(cache.get(&key("a", "b")).await.is_none());
    }

    #[tokio::test]
    async fn invalidate_discards_one_entry() {
        let cache = RouteCache::new();
        for destination in ["b", "c"] {
            cache
                .get_or_compute(key("a", destination), async { Ok::<_, ()>(estimate(1.0)) })
                .await
                .unwrap();
        }

        cache.invalidate(&key("a", "b")).await;

        assert!(cache.get(&key("a", "b")).await.is_none());
        assert!(cache.get(&key("a", "c")).await.is_some());
        assert_eq!(cache.stats().await.entries, 1);
    }

    #[test]
    fn config_defaults() {
        let config = RouteCacheConfig::default();
        assert_eq!(config.max_entries, 1000);
        assert!(config.ttl_secs.is_none());
    }

    #[test]
    fn key_display() {
        assert_eq!(key("a", "b").to_string(), "a->b:DRIVING");
    }
}
