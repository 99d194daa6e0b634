//! In-process key-value store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::broadcast;

use super::{ContextId, EVENT_CHANNEL_CAPACITY, KeyValueStore, StorageEvent, StoreError};

/// A key-value store held in memory.
///
/// Cloning is cheap and every clone shares the same entries and change
/// channel, so several cart managers over clones of one `MemoryStore`
/// behave like several tabs over one browser storage area.
///
/// An optional quota caps the total size of keys plus values in bytes.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<MemoryStoreInner>,
}

struct MemoryStoreInner {
    entries: Mutex<HashMap<String, String>>,
    quota: Option<usize>,
    available: AtomicBool,
    writes: AtomicU64,
    events: broadcast::Sender<StorageEvent>,
}

impl MemoryStore {
    /// Create an empty store without a size limit.
    #[must_use]
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Create an empty store that rejects writes beyond `quota` bytes.
    #[must_use]
    pub fn with_quota(quota: usize) -> Self {
        Self::build(Some(quota))
    }

    fn build(quota: Option<usize>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(MemoryStoreInner {
                entries: Mutex::new(HashMap::new()),
                quota,
                available: AtomicBool::new(true),
                writes: AtomicU64::new(0),
                events,
            }),
        }
    }

    /// Mark the store as available or unavailable.
    ///
    /// While unavailable, every operation fails with
    /// [`StoreError::Unavailable`].
    pub fn set_available(&self, available: bool) {
        self.inner.available.store(available, Ordering::SeqCst);
    }

    /// Number of successful `set` and `remove` calls so far.
    #[must_use]
    pub fn write_count(&self) -> u64 {
        self.inner.writes.load(Ordering::SeqCst)
    }

    /// Total bytes currently held (keys plus values).
    #[must_use]
    pub fn used_bytes(&self) -> usize {
        self.lock()
            .map(|entries| Self::size_of(&entries))
            .unwrap_or(0)
    }

    fn size_of(entries: &HashMap<String, String>) -> usize {
        entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, StoreError> {
        if !self.inner.available.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("store is offline".to_string()));
        }
        self.inner
            .entries
            .lock()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }

    fn publish(&self, key: &str, origin: ContextId) {
        self.inner.writes.fetch_add(1, Ordering::SeqCst);
        // No subscribers is not an error.
        let _ = self.inner.events.send(StorageEvent::now(key, origin));
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("quota", &self.inner.quota)
            .field("writes", &self.write_count())
            .finish_non_exhaustive()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str, origin: ContextId) -> Result<(), StoreError> {
        {
            let mut entries = self.lock()?;
            if let Some(limit) = self.inner.quota {
                let current = Self::size_of(&entries);
                let replaced = entries.get(key).map_or(0, |old| key.len() + old.len());
                let needed = current - replaced + key.len() + value.len();
                if needed > limit {
                    return Err(StoreError::QuotaExceeded { needed, limit });
                }
            }
            entries.insert(key.to_owned(), value.to_owned());
        }
        self.publish(key, origin);
        Ok(())
    }

    fn remove(&self, key: &str, origin: ContextId) -> Result<(), StoreError> {
        self.lock()?.remove(key);
        self.publish(key, origin);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.inner.events.subscribe()
    }
}
