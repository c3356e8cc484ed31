//! Cache registry - Central management for all caches.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use super::{CacheConfig, TypedCache};

/// Central registry for named typed caches.
///
/// Repositories and guards create and look up their own caches by name,
/// giving each domain isolated cache policy.
#[derive(Clone)]
pub struct CacheRegistry {
    caches: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

/// Internal cache entry storing a type-erased cache.
struct CacheEntry {
    cache: Box<dyn Any + Send + Sync>,
    type_id: TypeId,
    type_name: &'static str,
}

impl CacheRegistry {
    /// Create a new empty cache registry.
    pub fn new() -> Self {
        info!("Cache registry initialized");
        Self {
            caches: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Get an existing cache or create a new one if it doesn't exist.
    ///
    /// # Panics
    /// Panics if a cache with the same name but different types already exists.
    pub fn get_or_create<K, V>(&self, name: &str, config: CacheConfig) -> TypedCache<K, V>
    where
        K: Hash + Eq + Send + Sync + 'static,
        V: Clone + Send + Sync + 'static,
    {
        let mut caches = self.caches.write();

        if let Some(existing) = caches.get(name) {
            let expected_type = TypeId::of::<TypedCache<K, V>>();
            if existing.type_id != expected_type {
                panic!(
                    "Cache '{}' already exists with different types: expected {}, got {}",
                    name,
                    std::any::type_name::<TypedCache<K, V>>(),
                    existing.type_name
                );
            }
            return existing
                .cache
                .downcast_ref::<TypedCache<K, V>>()
                .unwrap()
                .clone();
        }

        debug!("Creating cache: {}", name);

        let cache = TypedCache::new(name, config);
        caches.insert(
            name.to_string(),
            CacheEntry {
                cache: Box::new(cache.clone()),
                type_id: TypeId::of::<TypedCache<K, V>>(),
                type_name: std::any::type_name::<TypedCache<K, V>>(),
            },
        );

        cache
    }
}

impl Default for CacheRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CacheRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let caches = self.caches.read();
        f.debug_struct("CacheRegistry")
            .field("cache_count", &caches.len())
            .field("cache_names", &caches.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_or_create_returns_same_cache() {
        let registry = CacheRegistry::new();

        let a: TypedCache<u64, String> =
            registry.get_or_create("shared", CacheConfig::default());
        a.insert(7, "seven".to_string());

        let b: TypedCache<u64, String> =
            registry.get_or_create("shared", CacheConfig::default());
        assert_eq!(b.get(&7), Some("seven".to_string()));
    }

    #[test]
    #[should_panic]
    fn test_type_mismatch_panics() {
        let registry = CacheRegistry::new();
        let _a: TypedCache<u64, String> =
            registry.get_or_create("mismatch", CacheConfig::default());
        let _b: TypedCache<u64, u64> =
            registry.get_or_create("mismatch", CacheConfig::default());
    }
}
