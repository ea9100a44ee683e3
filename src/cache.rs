//! Bidirectional bounded cache with LRU eviction
//!
//! A capacity-bounded associative store that keeps a forward,
//! recency-ordered index and a reverse index consistent with each other at
//! every public-method boundary. The forward index is an [`lru::LruCache`];
//! the reverse index is a plain map maintained transactionally with it, so
//! eviction removes both sides of a pair in one call and the live entries
//! always form a partial bijection.
//!
//! The type is domain-agnostic; the fake-DNS holder instantiates it with
//! domain keys and IPv4 values.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::num::NonZeroUsize;

use lru::LruCache;

/// Capacity-bounded map with LRU eviction and a consistent reverse index
pub struct BidiLruCache<K, V> {
    forward: LruCache<K, V>,
    reverse: HashMap<V, K>,
}

impl<K, V> BidiLruCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Hash + Eq + Clone,
{
    /// Create a cache holding at most `capacity` entries
    #[must_use]
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            forward: LruCache::new(capacity),
            reverse: HashMap::with_capacity(capacity.get()),
        }
    }

    /// Forward lookup; a hit marks the entry most-recently-used, a miss
    /// mutates nothing
    pub fn get<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.forward.get(key).cloned()
    }

    /// Insert or replace a mapping
    ///
    /// When `key` is new and the cache is full, the least-recently-used
    /// pair is evicted from both indices and returned. When `value` is
    /// already live under a different key, that stale pair is displaced
    /// from both indices, so live entries can never share a key or a
    /// value.
    pub fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        let mut evicted = None;
        if let Some((displaced_key, displaced_value)) =
            self.forward.push(key.clone(), value.clone())
        {
            // Either `key` itself (its old value was replaced) or the
            // least-recently-used pair pushed out past capacity.
            if self.reverse.get(&displaced_value) == Some(&displaced_key) {
                self.reverse.remove(&displaced_value);
            }
            if displaced_key != key {
                evicted = Some((displaced_key, displaced_value));
            }
        }
        if let Some(stale_key) = self.reverse.insert(value, key.clone()) {
            if stale_key != key {
                self.forward.pop(&stale_key);
            }
        }
        evicted
    }

    /// Reverse lookup; does not affect recency ordering
    #[must_use]
    pub fn reverse_lookup<Q>(&self, value: &Q) -> Option<&K>
    where
        V: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.reverse.get(value)
    }

    /// Current number of live entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    /// Check if the cache is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Fixed capacity set at construction
    #[must_use]
    pub fn cap(&self) -> NonZeroUsize {
        self.forward.cap()
    }
}

impl<K, V> fmt::Debug for BidiLruCache<K, V>
where
    K: Hash + Eq,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BidiLruCache")
            .field("len", &self.forward.len())
            .field("cap", &self.forward.cap())
            .finish()
    }
}
