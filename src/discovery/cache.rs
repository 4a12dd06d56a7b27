use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// How long resolved identities and artist details stay cached
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// Read-through cache whose entries expire after a fixed time-to-live.
///
/// Entries are never invalidated except by expiry. A stale entry is dropped
/// when it is looked up, and every insert sweeps out all expired entries.
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: Mutex<HashMap<K, (V, Instant)>>,
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Return a fresh cached value, evicting it if it has expired
    pub fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let stale = match entries.get(key) {
            Some((value, expires_at)) if Instant::now() < *expires_at => return Some(value.clone()),
            Some(_) => true,
            None => false,
        };
        if stale {
            entries.remove(key);
        }
        None
    }

    pub fn insert(&self, key: K, value: V) {
        let now = Instant::now();
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.retain(|_, (_, expires_at)| now < *expires_at);
        entries.insert(key, (value, now + self.ttl));
    }

    /// Serve from the cache, or run `fetch` and remember a `Some` result
    pub fn get_or_try_insert_with<E, F>(&self, key: K, fetch: F) -> Result<Option<V>, E>
    where
        F: FnOnce() -> Result<Option<V>, E>,
    {
        if let Some(hit) = self.get(&key) {
            return Ok(Some(hit));
        }
        // The lock is not held while fetching; a racing fetch stores an equivalent value
        let fetched = fetch()?;
        if let Some(value) = &fetched {
            self.insert(key, value.clone());
        }
        Ok(fetched)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}
