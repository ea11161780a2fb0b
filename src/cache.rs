//! Process-lifetime result cache keyed by the raw input URL.

use std::collections::HashMap;
use std::sync::Mutex;

/// A computed transcript/summary pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub transcript: String,
    pub summary: String,
}

/// Maps each input URL string (not normalized) to its computed results.
///
/// Entries live for the process lifetime: no eviction, no TTL, no size bound.
/// The single-run-at-a-time assumption means the mutex is only ever contended
/// by tests.
#[derive(Debug, Default)]
pub struct ResultCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, url: &str) -> Option<CacheEntry> {
        self.entries.lock().expect("cache lock poisoned").get(url).cloned()
    }

    pub fn insert(&self, url: String, entry: CacheEntry) {
        self.entries.lock().expect("cache lock poisoned").insert(url, entry);
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries.lock().expect("cache lock poisoned").contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(t: &str, s: &str) -> CacheEntry {
        CacheEntry {
            transcript: t.to_string(),
            summary: s.to_string(),
        }
    }

    #[test]
    fn test_empty_cache() {
        let cache = ResultCache::new();
        assert!(cache.is_empty());
        assert!(cache.get("https://youtu.be/abc").is_none());
    }

    #[test]
    fn test_insert_and_get() {
        let cache = ResultCache::new();
        cache.insert("url-a".to_string(), entry("hello", "hi"));

        let got = cache.get("url-a").unwrap();
        assert_eq!(got.transcript, "hello");
        assert_eq!(got.summary, "hi");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_key_is_exact_url_string() {
        let cache = ResultCache::new();
        cache.insert("https://youtu.be/abc".to_string(), entry("t", "s"));

        // No normalization: a trailing slash is a different key.
        assert!(cache.get("https://youtu.be/abc/").is_none());
        assert!(cache.contains("https://youtu.be/abc"));
    }

    #[test]
    fn test_insert_overwrites() {
        let cache = ResultCache::new();
        cache.insert("u".to_string(), entry("old", "old"));
        cache.insert("u".to_string(), entry("new", "new"));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("u").unwrap().transcript, "new");
    }
}
