//! # Concurrent Registry
//!
//! A reader-writer-locked map for write-once-then-read-many registration
//! tables and for highly mutated shared maps such as the live-session table.
//!
//! Reads and iteration take the shared lock; mutation takes the exclusive
//! lock, so iteration never observes a half-inserted or half-erased entry.
//! The lock is held for the entire `for_each_*` call: callbacks must not
//! re-enter the registry. That is a contract, not something detected at
//! runtime.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::RwLock;

/// Thread-safe map guarded by a reader-writer lock.
///
/// Values are cloned out on lookup, so `V` is typically an `Arc` or another
/// cheaply cloneable handle.
pub struct ConcurrentRegistry<K, V> {
    map: RwLock<HashMap<K, V>>,
}

impl<K, V> Default for ConcurrentRegistry<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> ConcurrentRegistry<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new() -> Self {
        Self {
            map: RwLock::new(HashMap::new()),
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<K, V>> {
        self.map.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<K, V>> {
        self.map.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Insert `value` under `key`, replacing any previous entry.
    pub fn insert_or_assign(&self, key: K, value: V) {
        self.write().insert(key, value);
    }

    /// Clone out the value under `key`, if any.
    pub fn try_get(&self, key: &K) -> Option<V> {
        self.read().get(key).cloned()
    }

    /// Remove the entry under `key`; returns whether one existed.
    pub fn erase(&self, key: &K) -> bool {
        self.write().remove(key).is_some()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.read().contains_key(key)
    }

    pub fn clear(&self) {
        self.write().clear();
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Apply `f` to every value while holding the shared lock.
    pub fn for_each_all<F>(&self, mut f: F)
    where
        F: FnMut(&V),
    {
        for value in self.read().values() {
            f(value);
        }
    }

    /// Apply `f` to every value satisfying `filter` while holding the shared
    /// lock. Backs broadcast-to-all-except-sender fan-out.
    pub fn for_each_some<P, F>(&self, filter: P, mut f: F)
    where
        P: Fn(&V) -> bool,
        F: FnMut(&V),
    {
        for value in self.read().values().filter(|v| filter(v)) {
            f(value);
        }
    }
}
