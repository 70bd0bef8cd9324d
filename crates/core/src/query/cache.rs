//! In-process TTL cache for query results.
//!
//! Maps a query key to its result rows (stored as JSON) stamped with an
//! expiry time. Expired entries are recomputed transparently by the
//! executor and replaced on the next `put`; they are not evicted
//! proactively unless [`QueryCache::purge_expired`] is called.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone)]
struct CacheEntry {
    rows: serde_json::Value,
    expires_at: DateTime<Utc>,
}

/// TTL-bounded map from query key to result rows.
///
/// The mutex guards only map access; it is never held across query
/// execution, so two concurrent misses for the same key may both recompute.
/// The contract requires read-after-write consistency per key, not mutual
/// exclusion of recomputation.
#[derive(Debug)]
pub struct QueryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl_secs: i64,
}

impl QueryCache {
    pub fn new(ttl_secs: i64) -> Self {
        Self { entries: Mutex::new(HashMap::new()), ttl_secs }
    }

    /// Rows for `key` if present and fresh, `None` otherwise.
    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        let entries = self.entries.lock().expect("query cache poisoned");
        entries
            .get(key)
            .filter(|entry| entry.expires_at > Utc::now())
            .map(|entry| entry.rows.clone())
    }

    /// Store rows for `key`, stamped with `now + ttl`.
    ///
    /// Replaces any existing entry for that key, stale or not.
    pub fn put(&self, key: String, rows: serde_json::Value) {
        let expires_at = Utc::now() + Duration::seconds(self.ttl_secs);
        let mut entries = self.entries.lock().expect("query cache poisoned");
        entries.insert(key, CacheEntry { rows, expires_at });
    }

    /// Drop the entry for `key`. Returns true if one was present.
    pub fn invalidate(&self, key: &str) -> bool {
        let mut entries = self.entries.lock().expect("query cache poisoned");
        entries.remove(key).is_some()
    }

    /// Delete expired entries. Returns the number deleted.
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut entries = self.entries.lock().expect("query cache poisoned");
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("query cache poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_put_and_get() {
        let cache = QueryCache::new(3600);
        cache.put("k1".into(), json!([{"year": 2001, "docs": 3}]));
        let rows = cache.get("k1").unwrap();
        assert_eq!(rows[0]["year"], 2001);
    }

    #[test]
    fn test_get_missing() {
        let cache = QueryCache::new(3600);
        assert!(cache.get("nonexistent").is_none());
    }

    #[test]
    fn test_expired_entry_not_returned() {
        let cache = QueryCache::new(-1);
        cache.put("k1".into(), json!([]));
        assert!(cache.get("k1").is_none());
        // still present until purged
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_put_replaces_stale_entry() {
        let cache = QueryCache::new(3600);
        cache.put("k1".into(), json!([1]));
        cache.put("k1".into(), json!([2]));
        assert_eq!(cache.get("k1").unwrap(), json!([2]));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_invalidate() {
        let cache = QueryCache::new(3600);
        cache.put("k1".into(), json!([]));
        assert!(cache.invalidate("k1"));
        assert!(!cache.invalidate("k1"));
        assert!(cache.get("k1").is_none());
    }

    #[test]
    fn test_purge_expired() {
        let cache = QueryCache::new(-1);
        cache.put("stale".into(), json!([]));
        let fresh = QueryCache::new(3600);
        fresh.put("fresh".into(), json!([]));

        assert_eq!(cache.purge_expired(), 1);
        assert!(cache.is_empty());
        assert_eq!(fresh.purge_expired(), 0);
        assert_eq!(fresh.len(), 1);
    }
}
