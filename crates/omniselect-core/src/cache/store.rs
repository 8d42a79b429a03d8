use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, PoisonError};

use lru::LruCache;

use super::CacheStore;
use crate::state::CacheEntry;

/// Unbounded in-memory store. The default backend.
#[derive(Debug)]
pub struct MemoryStore<O> {
    entries: HashMap<String, CacheEntry<O>>,
}

impl<O> MemoryStore<O> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<O> Default for MemoryStore<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: Clone + Send> CacheStore<O> for MemoryStore<O> {
    fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn get(&mut self, key: &str) -> Option<CacheEntry<O>> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, entry: CacheEntry<O>) {
        self.entries.insert(key.to_string(), entry);
    }
}

/// Bounded store evicting the least recently used query.
pub struct LruStore<O> {
    entries: LruCache<String, CacheEntry<O>>,
}

impl<O> LruStore<O> {
    /// A capacity of zero is bumped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }
}

impl<O: Clone + Send> CacheStore<O> for LruStore<O> {
    fn contains(&self, key: &str) -> bool {
        self.entries.contains(key)
    }

    fn get(&mut self, key: &str) -> Option<CacheEntry<O>> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, entry: CacheEntry<O>) {
        self.entries.put(key.to_string(), entry);
    }
}

/// Handle to a store that several controllers read and write.
///
/// Sharing is always explicit: clone the handle and pass it to each select.
pub struct SharedStore<S> {
    inner: Arc<Mutex<S>>,
}

impl<S> SharedStore<S> {
    pub fn new(store: S) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Run `f` against the underlying store.
    pub fn with<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

impl<S> Clone for SharedStore<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<O, S: CacheStore<O>> CacheStore<O> for SharedStore<S> {
    fn contains(&self, key: &str) -> bool {
        self.with(|store| store.contains(key))
    }

    fn get(&mut self, key: &str) -> Option<CacheEntry<O>> {
        self.with(|store| store.get(key))
    }

    fn set(&mut self, key: &str, entry: CacheEntry<O>) {
        self.with(|store| store.set(key, entry));
    }
}
