//! Coordination store capability and its in-memory backend.

use crate::error::GuardError;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// The two atomic primitives a guard needs from a shared key/value store.
///
/// Any store offering "set if absent with expiry" and "delete if value
/// matches" can back a [`MutationGuard`](crate::MutationGuard).
pub trait CoordinationStore: Send + Sync {
    /// Set `key` to `value` for `ttl` unless a live value is present.
    fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> Result<bool, GuardError>;

    /// Delete `key` only if its live value equals `expected`.
    fn compare_and_delete(&self, key: &str, expected: &str) -> Result<bool, GuardError>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock()
    }
}

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

/// Process-local coordination store.
///
/// Expired entries are treated as absent and evicted lazily on access.
pub struct MemoryCoordinationStore {
    entries: Mutex<HashMap<String, Entry>>,
    clock: Arc<dyn Clock>,
}

impl MemoryCoordinationStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Live value under `key`, if any.
    pub fn get(&self, key: &str) -> Option<String> {
        let now = self.clock.now();
        self.entries
            .lock()
            .get(key)
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.value.clone())
    }
}

impl Default for MemoryCoordinationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CoordinationStore for MemoryCoordinationStore {
    fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> Result<bool, GuardError> {
        let now = self.clock.now();
        let mut entries = self.entries.lock();
        if let Some(entry) = entries.get(key) {
            if entry.expires_at > now {
                return Ok(false);
            }
        }
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: now + ttl,
            },
        );
        Ok(true)
    }

    fn compare_and_delete(&self, key: &str, expected: &str) -> Result<bool, GuardError> {
        let now = self.clock.now();
        let mut entries = self.entries.lock();
        let Some(entry) = entries.get(key) else {
            return Ok(false);
        };
        if entry.expires_at <= now {
            entries.remove(key);
            return Ok(false);
        }
        if entry.value != expected {
            return Ok(false);
        }
        entries.remove(key);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (Arc<ManualClock>, MemoryCoordinationStore) {
        let clock = Arc::new(ManualClock::new());
        let store = MemoryCoordinationStore::with_clock(clock.clone());
        (clock, store)
    }

    #[test]
    fn set_if_absent_refuses_live_key() {
        let (_, store) = store();
        assert!(store.set_if_absent("k", "a", Duration::from_secs(5)).unwrap());
        assert!(!store.set_if_absent("k", "b", Duration::from_secs(5)).unwrap());
        assert_eq!(store.get("k").as_deref(), Some("a"));
    }

    #[test]
    fn expired_key_counts_as_absent() {
        let (clock, store) = store();
        store.set_if_absent("k", "a", Duration::from_secs(5)).unwrap();
        clock.advance(Duration::from_secs(5));
        assert_eq!(store.get("k"), None);
        assert!(store.set_if_absent("k", "b", Duration::from_secs(5)).unwrap());
        assert_eq!(store.get("k").as_deref(), Some("b"));
    }

    #[test]
    fn compare_and_delete_checks_value() {
        let (_, store) = store();
        store.set_if_absent("k", "a", Duration::from_secs(5)).unwrap();
        assert!(!store.compare_and_delete("k", "b").unwrap());
        assert!(store.compare_and_delete("k", "a").unwrap());
        assert!(!store.compare_and_delete("k", "a").unwrap());
    }

    #[test]
    fn compare_and_delete_ignores_expired_value() {
        let (clock, store) = store();
        store.set_if_absent("k", "a", Duration::from_secs(1)).unwrap();
        clock.advance(Duration::from_secs(2));
        assert!(!store.compare_and_delete("k", "a").unwrap());
    }
}
