//! In-memory result cache with per-entry TTL.
//!
//! The scan service answers repeat requests from here instead of
//! re-fetching and re-analyzing. Keys are content hashes of the
//! request, so the same question always lands on the same slot.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Default entry lifetime.
pub const DEFAULT_TTL: Duration = Duration::from_secs(120);

/// Hash request parts into a stable cache key.
///
/// Parts are separated before hashing, so `["ab", "c"]` and
/// `["a", "bc"]` produce different keys.
pub fn request_key(parts: &[&str]) -> String {
    let mut hasher = blake3::Hasher::new();
    for part in parts {
        hasher.update(part.as_bytes());
        hasher.update(&[0x1f]);
    }
    hasher.finalize().to_hex().to_string()
}

struct Slot<V> {
    value: V,
    expires_at: Instant,
}

/// Mutex-guarded TTL map. Values are cloned out on hit.
pub struct TtlCache<V> {
    slots: Mutex<HashMap<String, Slot<V>>>,
    ttl: Duration,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        TtlCache {
            slots: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Slot<V>>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Look up `key`, evicting it first if it has expired.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut slots = self.lock();
        match slots.get(key) {
            Some(slot) if slot.expires_at > Instant::now() => Some(slot.value.clone()),
            Some(_) => {
                slots.remove(key);
                None
            }
            None => None,
        }
    }

    /// Insert with the cache-wide TTL.
    pub fn put(&self, key: impl Into<String>, value: V) {
        self.put_with_ttl(key, value, self.ttl);
    }

    /// Insert with an explicit TTL.
    pub fn put_with_ttl(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let mut slots = self.lock();
        slots.insert(
            key.into(),
            Slot {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    /// Drop every expired entry.
    pub fn purge_expired(&self) {
        let now = Instant::now();
        self.lock().retain(|_, slot| slot.expires_at > now);
    }

    /// Number of slots, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        TtlCache::new(DEFAULT_TTL)
    }
}
