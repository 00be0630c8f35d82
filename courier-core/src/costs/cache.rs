#[cfg(test)]
#[path = "../../tests/unit/costs/cache_test.rs"]
mod cache_test;

use rustc_hash::{FxHashMap, FxHasher};
use std::hash::{Hash, Hasher};
use std::sync::RwLock;

const DEFAULT_SHARDS: usize = 64;

/// A concurrent map split into independently locked shards. Readers of one shard never
/// block writers of another one, so there is no global lock.
pub struct ShardedCache<K, V> {
    shards: Vec<RwLock<FxHashMap<K, V>>>,
}

impl<K, V> Default for ShardedCache<K, V>
where
    K: Hash + Eq,
    V: Copy,
{
    fn default() -> Self {
        Self::new(DEFAULT_SHARDS)
    }
}

impl<K, V> ShardedCache<K, V>
where
    K: Hash + Eq,
    V: Copy,
{
    /// Creates a new cache with given amount of shards.
    pub fn new(shards: usize) -> Self {
        Self { shards: (0..shards.max(1)).map(|_| RwLock::new(FxHashMap::default())).collect() }
    }

    /// Returns a value stored for the key.
    pub fn get(&self, key: &K) -> Option<V> {
        let shard = self.shard(key).read().unwrap_or_else(|poisoned| poisoned.into_inner());
        shard.get(key).copied()
    }

    /// Inserts the value only if key is absent. Returns the value stored in the cache
    /// after the call: either the given one or the one inserted before by another writer.
    pub fn insert_if_absent(&self, key: K, value: V) -> V {
        let mut shard = self.shard(&key).write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *shard.entry(key).or_insert(value)
    }

    /// Returns total amount of entries.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.read().unwrap_or_else(|poisoned| poisoned.into_inner()).len()).sum()
    }

    /// Returns true if cache has no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn shard(&self, key: &K) -> &RwLock<FxHashMap<K, V>> {
        let mut hasher = FxHasher::default();
        key.hash(&mut hasher);

        &self.shards[(hasher.finish() as usize) % self.shards.len()]
    }
}
