use bevy::log::debug;
use std::collections::HashMap;
use std::hash::Hash;

/// A cached value with metadata
struct CachedEntry<V> {
    value: V,
    last_used: u64,
}

/// Bounded map that evicts the least recently used entry when full.
///
/// Recency is a per-cache counter bumped on every lookup, so behaviour
/// does not depend on wall-clock time.
pub struct LruCache<K, V> {
    entries: HashMap<K, CachedEntry<V>>,
    capacity: usize,
    tick: u64,
    evictions: u64,
}

impl<K: Hash + Eq + Clone, V> LruCache<K, V> {
    /// Create a cache holding at most `capacity` entries (minimum one)
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity: capacity.max(1),
            tick: 0,
            evictions: 0,
        }
    }

    /// Look up `key`, building and inserting the value on a miss
    pub fn get_or_insert_with<F: FnOnce() -> V>(&mut self, key: K, build: F) -> &mut V {
        self.tick += 1;
        let tick = self.tick;

        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            self.evict_oldest();
        }

        let entry = self.entries.entry(key).or_insert_with(|| CachedEntry {
            value: build(),
            last_used: tick,
        });
        entry.last_used = tick;
        &mut entry.value
    }

    /// Look up `key`, marking it as recently used
    pub fn get(&mut self, key: &K) -> Option<&V> {
        self.tick += 1;
        let tick = self.tick;
        self.entries.get_mut(key).map(|entry| {
            entry.last_used = tick;
            &entry.value
        })
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total entries dropped to make room since creation
    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    /// Change the bound, evicting as needed
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        while self.entries.len() > self.capacity {
            self.evict_oldest();
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(key, _)| key.clone());

        if let Some(key) = oldest {
            self.entries.remove(&key);
            self.evictions += 1;
            debug!("Evicted cache entry, {} remain", self.entries.len());
        }
    }
}
