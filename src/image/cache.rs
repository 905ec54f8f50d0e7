//! Bounded cache of image URLs known to load.

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cached::{Cached, TimedSizedCache};
use once_cell::sync::OnceCell;

use crate::constants::{IMAGE_CACHE_DEFAULT_CAPACITY, IMAGE_CACHE_DEFAULT_TTL_SECS};

static GLOBAL_CACHE: OnceCell<Arc<ImageCache>> = OnceCell::new();

/// Set of validated image URLs with a size bound and an expiry.
///
/// Once full, the least recently used URL is evicted. An entry older than the
/// TTL is treated as unknown and the URL gets probed again.
pub struct ImageCache {
    entries: Mutex<TimedSizedCache<String, ()>>,
    capacity: usize,
    ttl: Duration,
}

impl ImageCache {
    /// Create a cache. Capacity and TTL are clamped to at least 1 (second).
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = capacity.max(1);
        let ttl_secs = ttl.as_secs().max(1);

        Self {
            entries: Mutex::new(TimedSizedCache::with_size_and_lifespan(capacity, ttl_secs)),
            capacity,
            ttl: Duration::from_secs(ttl_secs),
        }
    }

    /// Process-wide cache shared by every [`ProductImage`](super::ProductImage)
    pub fn global() -> Arc<ImageCache> {
        Self::init_global(
            IMAGE_CACHE_DEFAULT_CAPACITY,
            Duration::from_secs(IMAGE_CACHE_DEFAULT_TTL_SECS),
        )
    }

    /// Create the process-wide cache with the given bounds. Only the first call
    /// (including an implicit one through [`ImageCache::global`]) has effect.
    pub fn init_global(capacity: usize, ttl: Duration) -> Arc<ImageCache> {
        Arc::clone(GLOBAL_CACHE.get_or_init(|| Arc::new(Self::new(capacity, ttl))))
    }

    /// Whether the URL loaded successfully within the TTL
    pub fn contains(&self, url: &str) -> bool {
        if let Ok(mut entries) = self.entries.lock() {
            entries.cache_get(&url.to_owned()).is_some()
        } else {
            false
        }
    }

    /// Record the URL as loadable
    pub fn insert(&self, url: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.cache_set(url.to_owned(), ());
        }
    }

    /// Number of stored entries, expired ones included until they are evicted
    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.cache_size()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.cache_clear();
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::new(
            IMAGE_CACHE_DEFAULT_CAPACITY,
            Duration::from_secs(IMAGE_CACHE_DEFAULT_TTL_SECS),
        )
    }
}

impl fmt::Debug for ImageCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .field("ttl", &self.ttl)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_contains() {
        let cache = ImageCache::new(8, Duration::from_secs(60));
        assert!(cache.is_empty());
        assert!(!cache.contains("https://cdn.example.com/a.png"));

        cache.insert("https://cdn.example.com/a.png");
        assert!(cache.contains("https://cdn.example.com/a.png"));
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(!cache.contains("https://cdn.example.com/a.png"));
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let cache = ImageCache::new(2, Duration::from_secs(60));
        cache.insert("a");
        cache.insert("b");
        cache.insert("c");

        assert_eq!(cache.len(), 2);
        assert!(!cache.contains("a"));
        assert!(cache.contains("b"));
        assert!(cache.contains("c"));
    }

    #[test]
    fn test_entries_expire() {
        let cache = ImageCache::new(4, Duration::from_secs(1));
        cache.insert("a");
        assert!(cache.contains("a"));

        std::thread::sleep(Duration::from_millis(1100));
        assert!(!cache.contains("a"));
    }

    #[test]
    fn test_bounds_are_clamped() {
        let cache = ImageCache::new(0, Duration::from_millis(10));
        assert_eq!(cache.capacity(), 1);
        assert_eq!(cache.ttl(), Duration::from_secs(1));
    }

    #[test]
    fn test_global_is_shared() {
        let first = ImageCache::global();
        let second = ImageCache::init_global(1, Duration::from_secs(1));
        assert!(Arc::ptr_eq(&first, &second));
    }
}
