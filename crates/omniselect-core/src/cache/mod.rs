//! Per-query result cache.
//!
//! The cache maps a normalized query to its furthest fetched [`CacheEntry`].
//! It is backed by any [`CacheStore`]; controllers build a private
//! [`MemoryStore`] unless the caller injects one, and a disabled cache
//! answers every lookup with `None`.

mod disk;
mod store;

pub use disk::DiskStore;
pub use store::{LruStore, MemoryStore, SharedStore};

use crate::state::CacheEntry;

/// Key-value backend for [`ResultCache`].
pub trait CacheStore<O>: Send {
    fn contains(&self, key: &str) -> bool;

    /// Takes `&mut self` so bounded stores can record recency.
    fn get(&mut self, key: &str) -> Option<CacheEntry<O>>;

    fn set(&mut self, key: &str, entry: CacheEntry<O>);
}

/// Optional store plus hit/miss accounting.
pub struct ResultCache<O> {
    store: Option<Box<dyn CacheStore<O>>>,
    hits: usize,
    misses: usize,
}

impl<O: Clone + Send + 'static> ResultCache<O> {
    /// Cache backed by a fresh in-memory store owned by this instance.
    pub fn new() -> Self {
        Self::with_store(MemoryStore::new())
    }

    pub fn with_store<S>(store: S) -> Self
    where
        S: CacheStore<O> + 'static,
    {
        Self {
            store: Some(Box::new(store)),
            hits: 0,
            misses: 0,
        }
    }

    /// A cache that never stores anything.
    pub fn disabled() -> Self {
        Self {
            store: None,
            hits: 0,
            misses: 0,
        }
    }

    /// Drop the store; every later lookup misses and writes are ignored.
    pub fn disable(&mut self) {
        self.store = None;
    }

    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    pub fn get(&mut self, query: &str) -> Option<CacheEntry<O>> {
        let entry = self.store.as_mut()?.get(query);
        if entry.is_some() {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        entry
    }

    pub fn set(&mut self, query: &str, entry: CacheEntry<O>) {
        if let Some(store) = self.store.as_mut() {
            store.set(query, entry);
        }
    }

    /// Returns (hits, misses).
    pub fn stats(&self) -> (usize, usize) {
        (self.hits, self.misses)
    }

    /// Hit rate as a percentage, `None` before the first lookup.
    pub fn hit_rate(&self) -> Option<f32> {
        let total = self.hits + self.misses;
        if total == 0 {
            None
        } else {
            Some(self.hits as f32 / total as f32 * 100.0)
        }
    }
}

impl<O: Clone + Send + 'static> Default for ResultCache<O> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(page: u32, options: &[&'static str], last: bool) -> CacheEntry<&'static str> {
        CacheEntry {
            page,
            options: options.to_vec(),
            has_reached_last_page: last,
        }
    }

    #[test]
    fn test_get_set_overwrites_per_query() {
        let mut cache = ResultCache::new();
        assert!(cache.get("x").is_none());

        cache.set("x", entry(1, &["o1", "o2"], false));
        cache.set("x", entry(2, &["o1", "o2", "o3"], false));

        let got = cache.get("x").unwrap();
        assert_eq!(got.page, 2);
        assert_eq!(got.options, vec!["o1", "o2", "o3"]);
    }

    #[test]
    fn test_disabled_cache_ignores_writes() {
        let mut cache = ResultCache::disabled();
        cache.set("x", entry(1, &["o1"], true));
        assert!(cache.get("x").is_none());
        assert!(!cache.is_enabled());
        assert_eq!(cache.stats(), (0, 0));
    }

    #[test]
    fn test_disable_drops_existing_entries() {
        let mut cache = ResultCache::new();
        cache.set("x", entry(1, &["o1"], false));
        cache.disable();
        assert!(cache.get("x").is_none());
    }

    #[test]
    fn test_hit_miss_tracking() {
        let mut cache = ResultCache::new();
        assert_eq!(cache.hit_rate(), None);

        let _ = cache.get("a");
        cache.set("a", entry(1, &["o1"], false));
        let _ = cache.get("a");
        let _ = cache.get("a");

        assert_eq!(cache.stats(), (2, 1));
        let rate = cache.hit_rate().unwrap();
        assert!((rate - 66.67).abs() < 0.1);
    }

    #[test]
    fn test_instances_do_not_share_default_store() {
        let mut first = ResultCache::new();
        let mut second: ResultCache<&str> = ResultCache::new();
        first.set("x", entry(1, &["o1"], false));
        assert!(first.get("x").is_some());
        assert!(second.get("x").is_none());
    }

    /// Store recording how often it is read.
    struct CountingStore {
        inner: MemoryStore<&'static str>,
        reads: std::sync::Arc<std::sync::atomic::AtomicUsize>,
    }

    impl CacheStore<&'static str> for CountingStore {
        fn contains(&self, key: &str) -> bool {
            self.inner.contains(key)
        }

        fn get(&mut self, key: &str) -> Option<CacheEntry<&'static str>> {
            self.reads.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, entry: CacheEntry<&'static str>) {
            self.inner.set(key, entry);
        }
    }

    #[test]
    fn test_one_store_read_per_lookup() {
        let reads = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let mut cache = ResultCache::with_store(CountingStore {
            inner: MemoryStore::new(),
            reads: std::sync::Arc::clone(&reads),
        });

        assert!(cache.get("x").is_none());
        cache.set("x", entry(1, &["o1"], false));
        assert!(cache.get("x").is_some());

        assert_eq!(reads.load(std::sync::atomic::Ordering::SeqCst), 2);
        assert_eq!(cache.stats(), (1, 1));
    }
}
