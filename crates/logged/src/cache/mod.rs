use std::hash::Hash;
use std::sync::Arc;

use moka::sync::Cache;

use crate::configuration::Configuration;
use crate::interceptor::{CallSite, LoggingDescriptor};

/// Bounded cache of values resolved once per key.
///
/// Concurrent misses on the same key resolve the value only once.
#[derive(Clone)]
pub struct ResolvedCache<K, V> {
    cache: Cache<K, Arc<V>>,
}

impl<K, V> ResolvedCache<K, V>
where
    K: 'static + Eq + Hash + Send + Sync,
    V: 'static + Send + Sync,
{
    pub fn new(capacity: u64) -> Self {
        Self { cache: Cache::new(capacity) }
    }

    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        self.cache.get(key)
    }

    /// Returns the cached value, resolving and storing it on a miss.
    pub fn get_or_resolve(&self, key: K, resolve: impl FnOnce() -> V) -> Arc<V> {
        self.cache.get_with(key, || Arc::new(resolve()))
    }

    pub fn invalidate_all(&self) {
        self.cache.invalidate_all()
    }
}

/// Descriptors by call site key. Overrides are still looked up by site id.
#[derive(Clone)]
pub struct DescriptorCache(ResolvedCache<u64, LoggingDescriptor>);

impl DescriptorCache {
    pub fn new(capacity: u64) -> Self {
        Self(ResolvedCache::new(capacity))
    }

    pub fn descriptor(&self, site: &CallSite, configuration: &Configuration) -> Arc<LoggingDescriptor> {
        self.0
            .get_or_resolve(site.key(), || LoggingDescriptor::resolve(site, configuration.site(site.id())))
    }

    pub fn invalidate_all(&self) {
        self.0.invalidate_all()
    }
}
