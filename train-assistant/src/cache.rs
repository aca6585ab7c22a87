//! Caching layer for rail-status API responses.
//!
//! Live "trains between" answers change slowly within a day, so each
//! `(source, destination, date)` triple is cached for a bounded TTL. Errors
//! are never cached.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::domain::StationCode;
use crate::railstatus::{LiveTrain, RailStatus, RailStatusClient, RailStatusError};

/// Cache key for live trains: (source, destination, journey date).
type TrainsKey = (StationCode, StationCode, NaiveDate);

/// Cached list of live trains.
type TrainsEntry = Arc<Vec<LiveTrain>>;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl CacheConfig {
    /// Set the TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the maximum number of entries.
    pub fn with_max_capacity(mut self, n: u64) -> Self {
        self.max_capacity = n;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            max_capacity: 1000,
        }
    }
}

/// Rail-status client with caching.
///
/// Wraps any [`RailStatus`] source and caches successful answers.
pub struct CachedRailStatusClient<R = RailStatusClient> {
    client: R,
    trains: MokaCache<TrainsKey, TrainsEntry>,
}

impl<R: RailStatus> CachedRailStatusClient<R> {
    /// Create a new cached client.
    pub fn new(client: R, cache_config: &CacheConfig) -> Self {
        let trains = MokaCache::builder()
            .time_to_live(cache_config.ttl)
            .max_capacity(cache_config.max_capacity)
            .build();

        Self { client, trains }
    }

    /// Access the underlying client for operations that bypass cache.
    pub fn client(&self) -> &R {
        &self.client
    }

    /// Get cache statistics.
    pub fn cache_entry_count(&self) -> u64 {
        self.trains.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_cache(&self) {
        self.trains.invalidate_all();
    }
}

impl<R: RailStatus> RailStatus for CachedRailStatusClient<R> {
    async fn trains_between(
        &self,
        source: &StationCode,
        destination: &StationCode,
        date: NaiveDate,
    ) -> Result<Vec<LiveTrain>, RailStatusError> {
        let key = (source.clone(), destination.clone(), date);

        if let Some(cached) = self.trains.get(&key).await {
            return Ok(cached.as_ref().clone());
        }

        let trains = self.client.trains_between(source, destination, date).await?;
        self.trains.insert(key, Arc::new(trains.clone())).await;
        debug!(entries = self.cache_entry_count(), "cached live trains");

        Ok(trains)
    }
}
