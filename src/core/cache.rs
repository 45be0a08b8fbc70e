use moka::policy::EvictionPolicy;
use moka::sync::Cache;
use std::fmt::Debug;
use std::hash::Hash;
use std::num::NonZeroUsize;
use tracing::debug;

/// Bounded cache evicting the least-recently-used entry.
///
/// Pending maintenance is flushed after every write, so the entry count and
/// evictions are settled by the time a call returns.
pub struct LruCache<K, V>
where
    K: Eq + Hash + Clone + Debug + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    capacity: NonZeroUsize,
    inner: Cache<K, V>,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone + Debug + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new(capacity: NonZeroUsize) -> Self {
        let inner = Cache::builder()
            .max_capacity(capacity.get() as u64)
            .eviction_policy(EvictionPolicy::lru())
            .eviction_listener(|key, _value, cause| {
                if cause.was_evicted() {
                    debug!("Cache EVICT for key: {:?}", key);
                }
            })
            .build();

        Self { capacity, inner }
    }

    pub fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.inner.entry_count() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Presence check that leaves recency untouched.
    pub fn contains(&self, key: &K) -> bool {
        self.inner.contains_key(key)
    }

    /// Returns a clone of the cached value and marks it most recently used.
    pub fn get(&self, key: &K) -> Option<V> {
        match self.inner.get(key) {
            Some(value) => {
                debug!("Cache HIT for key: {:?}", key);
                Some(value)
            }
            None => {
                debug!("Cache MISS for key: {:?}", key);
                None
            }
        }
    }

    pub fn put(&self, key: K, value: V) {
        debug!("Cache PUT for key: {:?}", key);
        self.inner.insert(key, value);
        self.inner.run_pending_tasks();
    }

    pub fn clear(&self) {
        self.inner.invalidate_all();
        self.inner.run_pending_tasks();
        debug!("Cache CLEAR");
    }
}
