//! Cache configuration.

use std::time::Duration;

/// Configuration for a cache instance.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries in the cache.
    pub max_capacity: u64,

    /// Time-to-live for cache entries.
    /// After this duration, entries are automatically evicted.
    pub ttl: Option<Duration>,

    /// Time-to-idle for cache entries.
    /// Entries are evicted if not accessed within this duration.
    pub tti: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
            ttl: Some(Duration::from_secs(300)), // 5 minutes
            tti: None,
        }
    }
}

impl CacheConfig {
    /// Create a new cache config with the given max capacity.
    pub fn with_capacity(max_capacity: u64) -> Self {
        Self {
            max_capacity,
            ..Default::default()
        }
    }

    /// Set time-to-live for cache entries.
    #[must_use]
    pub fn ttl(mut self, duration: Duration) -> Self {
        self.ttl = Some(duration);
        self
    }

    /// Set time-to-idle for cache entries.
    #[must_use]
    pub fn tti(mut self, duration: Duration) -> Self {
        self.tti = Some(duration);
        self
    }

    /// Config for conversation session state (pending deploy/broadcast).
    /// Sessions expire after 30 minutes, or 5 minutes of inactivity.
    pub fn session() -> Self {
        Self::with_capacity(20_000)
            .ttl(Duration::from_secs(1800))
            .tti(Duration::from_secs(300))
    }

    /// Config for channel-membership checks.
    /// Short TTL so unsubscribing takes effect quickly.
    pub fn membership() -> Self {
        Self::with_capacity(50_000).ttl(Duration::from_secs(300))
    }

    /// Config for the per-webhook token -> bot document hot path.
    pub fn bot_lookup() -> Self {
        Self::with_capacity(10_000).ttl(Duration::from_secs(600))
    }
}
