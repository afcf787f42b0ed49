//! Per-service cache of derived chat keys.
//!
//! Lives as long as the owning `EncryptionService`. Entries never expire:
//! a chat's key is stable for the life of the conversation, so the only
//! reason to drop one is memory pressure (`clear`/`remove`).

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::kdf::ChatKey;
use crate::CryptoResult;

/// Thread-safe map of chat id → derived key.
#[derive(Default)]
pub struct KeyCache {
    entries: Mutex<HashMap<String, ChatKey>>,
}

impl KeyCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached key for `chat_id`, deriving and caching it on a miss.
    ///
    /// A failed derivation is not cached.
    pub fn get_or_derive<F>(&self, chat_id: &str, derive: F) -> CryptoResult<ChatKey>
    where
        F: FnOnce(&str) -> CryptoResult<ChatKey>,
    {
        if let Some(key) = self.lock().get(chat_id) {
            return Ok(key.clone());
        }

        // Derive outside the lock; a racing thread computes the same key.
        let key = derive(chat_id)?;
        self.lock()
            .entry(chat_id.to_string())
            .or_insert_with(|| key.clone());
        tracing::trace!(chat_id, "derived chat key");
        Ok(key)
    }

    pub fn contains(&self, chat_id: &str) -> bool {
        self.lock().contains_key(chat_id)
    }

    pub fn remove(&self, chat_id: &str) {
        self.lock().remove(chat_id);
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // Keys are immutable once inserted, so a poisoned map is still consistent.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, ChatKey>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for KeyCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyCache")
            .field("entries", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kdf::derive_chat_key;
    use crate::CryptoError;
    use std::cell::Cell;

    #[test]
    fn miss_then_hit() {
        let cache = KeyCache::new();
        let calls = Cell::new(0);
        let derive = |id: &str| {
            calls.set(calls.get() + 1);
            derive_chat_key(id, None)
        };

        let k1 = cache.get_or_derive("chat-1", derive).unwrap();
        let k2 = cache
            .get_or_derive("chat-1", |id| {
                calls.set(calls.get() + 1);
                derive_chat_key(id, None)
            })
            .unwrap();

        assert_eq!(k1.as_bytes(), k2.as_bytes());
        assert_eq!(calls.get(), 1, "second lookup must hit the cache");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn failed_derivation_not_cached() {
        let cache = KeyCache::new();
        let result = cache.get_or_derive("", |id| derive_chat_key(id, None));
        assert!(matches!(result, Err(CryptoError::InvalidInput(_))));
        assert!(cache.is_empty());
    }

    #[test]
    fn remove_and_clear() {
        let cache = KeyCache::new();
        cache.get_or_derive("a", |id| derive_chat_key(id, None)).unwrap();
        cache.get_or_derive("b", |id| derive_chat_key(id, None)).unwrap();
        assert!(cache.contains("a"));

        cache.remove("a");
        assert!(!cache.contains("a"));
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn debug_shows_count_only() {
        let cache = KeyCache::new();
        cache.get_or_derive("a", |id| derive_chat_key(id, None)).unwrap();
        assert_eq!(format!("{cache:?}"), "KeyCache { entries: 1 }");
    }
}
