//! Thread-safe LRU cache
//!
//! A key index and a [`RecencyQueue`] sit behind one `RwLock`, so eviction,
//! insertion and recency updates are applied to both structures atomically.

use std::collections::HashMap;
use std::fmt;

use ahash::RandomState;
use lruqueue::{NodeId, RecencyQueue};
use parking_lot::RwLock;
use tracing::{debug, trace, warn};

use crate::config::CacheConfig;
use crate::stats::CacheStats;
use crate::{Error, Result};

/// Generic string-keyed cache
pub trait Cache<V>: Send + Sync {
    /// Fetch the value for `key`, or `Error::NotFound`
    fn read(&self, key: &str) -> Result<V>;

    /// Store `value` under `key`
    fn write(&self, key: &str, value: V);

    /// Number of entries currently stored
    fn size(&self) -> usize;
}

/// Cached value plus its position in the recency queue
struct Item<V> {
    value: V,
    node: NodeId,
}

struct Inner<V> {
    items: HashMap<String, Item<V>, RandomState>,
    queue: RecencyQueue,
}

/// Fixed-capacity cache that evicts the least recently read or written key
pub struct LruCache<V> {
    /// Key index and recency order, always mutated together
    inner: RwLock<Inner<V>>,

    /// Cache statistics
    stats: CacheStats,

    /// Cache capacity
    capacity: usize,

    /// Label for log events
    name: String,
}

impl<V: Clone> LruCache<V> {
    /// Create a new LruCache with the given capacity
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries, at least 1
    ///
    /// # Returns
    /// * `Result<LruCache<V>>` - `Error::InvalidCapacity` if `capacity` is zero
    pub fn new(capacity: usize) -> Result<Self> {
        Self::from_config(&CacheConfig::new(capacity))
    }

    /// Create a new LruCache from a [`CacheConfig`]
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        if let Err(e) = config.validate() {
            warn!(cache = %config.name, capacity = config.capacity, "rejecting cache configuration");
            return Err(e);
        }

        let queue = RecencyQueue::new(config.capacity)?;
        debug!(cache = %config.name, capacity = config.capacity, "created LRU cache");

        Ok(Self {
            inner: RwLock::new(Inner {
                items: HashMap::with_capacity_and_hasher(config.capacity, RandomState::new()),
                queue,
            }),
            stats: CacheStats::new(),
            capacity: config.capacity,
            name: config.name.clone(),
        })
    }

    /// Get a value and mark it most recently used
    ///
    /// # Returns
    /// * `Result<V>` - A clone of the stored value, or `Error::NotFound`
    pub fn read(&self, key: &str) -> Result<V> {
        let mut inner = self.inner.write();
        let Inner { items, queue } = &mut *inner;

        match items.get(key) {
            Some(item) => {
                queue.touch(item.node);
                self.stats.record_hit();
                trace!(cache = %self.name, key, "cache hit");
                Ok(item.value.clone())
            }
            None => {
                self.stats.record_miss();
                trace!(cache = %self.name, key, "cache miss");
                Err(Error::NotFound)
            }
        }
    }

    /// Insert or overwrite a value and mark it most recently used
    ///
    /// Adding a new key to a full cache evicts the least recently used one.
    /// Overwriting an existing key never evicts.
    pub fn write(&self, key: &str, value: V) {
        let mut inner = self.inner.write();
        let Inner { items, queue } = &mut *inner;

        if let Some(item) = items.get_mut(key) {
            item.value = value;
            queue.touch(item.node);
            self.stats.record_update();
            trace!(cache = %self.name, key, "overwrote entry");
            return;
        }

        let (node, evicted) = queue.add(key);
        if let Some(evicted) = evicted {
            items.remove(&evicted);
            self.stats.record_eviction();
            debug!(cache = %self.name, key = %evicted, "evicted least recently used entry");
        }

        items.insert(key.to_owned(), Item { value, node });
        self.stats.record_insert();
    }

    /// Remove a key, returning its value
    pub fn remove(&self, key: &str) -> Option<V> {
        let mut inner = self.inner.write();
        let Inner { items, queue } = &mut *inner;

        let item = items.remove(key)?;
        queue.remove(item.node);
        Some(item.value)
    }

    /// Get a value without changing recency or statistics
    pub fn peek(&self, key: &str) -> Option<V> {
        self.inner.read().items.get(key).map(|item| item.value.clone())
    }

    /// Check for a key without changing recency or statistics
    pub fn contains(&self, key: &str) -> bool {
        self.inner.read().items.contains_key(key)
    }

    /// Keys from least to most recently used
    pub fn keys(&self) -> Vec<String> {
        self.inner
            .read()
            .queue
            .iter()
            .map(|node| node.value().to_owned())
            .collect()
    }

    /// Get current number of entries
    pub fn size(&self) -> usize {
        self.inner.read().items.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Get cache capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Drop every entry and reset statistics
    pub fn clear(&self) {
        let mut inner = self.inner.write();
        inner.items.clear();
        inner.queue.clear();
        self.stats.reset();
        debug!(cache = %self.name, "cleared cache");
    }
}

impl<V: Clone + Send + Sync> Cache<V> for LruCache<V> {
    fn read(&self, key: &str) -> Result<V> {
        LruCache::read(self, key)
    }

    fn write(&self, key: &str, value: V) {
        LruCache::write(self, key, value)
    }

    fn size(&self) -> usize {
        LruCache::size(self)
    }
}

impl<V> fmt::Debug for LruCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("name", &self.name)
            .field("capacity", &self.capacity)
            .field("size", &self.inner.read().items.len())
            .finish()
    }
}
