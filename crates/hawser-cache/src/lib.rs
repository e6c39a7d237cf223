//! In-memory TTL cache for retrieved payloads.
//!
//! Caches whole payloads keyed by [`ContentId`] so repeated retrievals
//! within the freshness window skip the gateway walk entirely. Entries
//! expire by age, not by count or total size: there is no eviction order
//! and no capacity bound. Expiry is lazy, an entry is only dropped when a
//! `get` finds it stale.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use bytes::Bytes;
use hawser_types::ContentId;
use tracing::debug;

struct CacheEntry {
    payload: Bytes,
    stored_at: Instant,
}

/// Thread-safe payload cache with a fixed freshness window.
///
/// `set` always stores, overwriting any previous entry for the same
/// identifier and restarting its clock. `get` returns a hit only while the
/// entry's age is at most `max_age`; an entry aged exactly `max_age` still
/// counts as fresh.
pub struct TtlCache {
    max_age: Duration,
    inner: Mutex<HashMap<ContentId, CacheEntry>>,
}

impl TtlCache {
    pub fn new(max_age: Duration) -> Self {
        Self {
            max_age,
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// Store a payload, replacing any existing entry for `id`.
    pub fn set(&self, id: ContentId, payload: Bytes) {
        let mut inner = self.inner.lock().expect("cache lock poisoned");
        inner.insert(
            id,
            CacheEntry {
                payload,
                stored_at: Instant::now(),
            },
        );
    }

    /// Look up a payload, dropping the entry if it has gone stale.
    pub fn get(&self, id: &ContentId) -> Option<Bytes> {
        let mut inner = self.inner.lock().expect("cache lock poisoned");
        let expired = match inner.get(id) {
            Some(entry) if entry.stored_at.elapsed() <= self.max_age => {
                return Some(entry.payload.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            inner.remove(id);
            debug!(%id, "evicted expired cache entry");
        }
        None
    }

    /// Number of stored entries. Stale entries count until a `get` drops
    /// them.
    pub fn len(&self) -> usize {
        self.inner.lock().expect("cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
