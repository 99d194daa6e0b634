//! Directory-backed key-value store.
//!
//! Each key lives in `<dir>/<key>.json`. Writes go to a temporary sibling
//! file first and are renamed into place, so readers never observe a
//! partially written value.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use super::{ContextId, EVENT_CHANNEL_CAPACITY, KeyValueStore, StorageEvent, StoreError};

const FILE_EXTENSION: &str = "json";

/// A key-value store persisted as files in a directory.
///
/// Cloning shares the change channel. Changes made by other processes are
/// only noticed while a watcher started with [`FileStore::watch`] is running.
#[derive(Clone)]
pub struct FileStore {
    inner: Arc<FileStoreInner>,
}

struct FileStoreInner {
    dir: PathBuf,
    /// Last value this store wrote per key, so the watcher can tell our own
    /// writes from foreign ones.
    own_writes: Mutex<HashMap<String, Option<String>>>,
    events: broadcast::Sender<StorageEvent>,
}

impl FileStore {
    /// Create a store rooted at `dir`.
    ///
    /// The directory does not need to exist yet; it is created on the first
    /// write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(FileStoreInner {
                dir: dir.into(),
                own_writes: Mutex::new(HashMap::new()),
                events,
            }),
        }
    }

    /// Returns the directory holding the key files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.inner.dir
    }

    /// Returns the file path for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidKey`] if the key is empty or contains
    /// characters other than ASCII alphanumerics, `-`, `_` and `.`, or
    /// starts with a dot.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(StoreError::InvalidKey(key.to_owned()));
        }
        Ok(self.inner.dir.join(format!("{key}.{FILE_EXTENSION}")))
    }

    /// Spawn a background task that polls the directory every `interval`
    /// and publishes a [`StorageEvent`] whenever a key file changes in a way
    /// this store did not cause.
    ///
    /// Events from the watcher carry a context id unique to the watcher,
    /// standing in for the unknown foreign writer. Must be called from
    /// within a Tokio runtime. Aborting the returned handle stops the
    /// watcher.
    #[must_use]
    pub fn watch(&self, interval: Duration) -> JoinHandle<()> {
        let store = self.clone();
        let origin = ContextId::new();
        tokio::spawn(async move {
            let mut seen = store.snapshot();
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let current = store.snapshot();
                for key in changed_keys(&seen, &current) {
                    let value = current.get(&key).cloned();
                    if store.is_own_write(&key, value.as_ref()) {
                        continue;
                    }
                    tracing::debug!(key = %key, "foreign change detected");
                    let _ = store.inner.events.send(StorageEvent::now(key, origin));
                }
                seen = current;
            }
        })
    }

    /// Read every key file currently in the directory.
    fn snapshot(&self) -> HashMap<String, String> {
        let mut values = HashMap::new();
        let entries = match std::fs::read_dir(&self.inner.dir) {
            Ok(entries) => entries,
            Err(e) => {
                if e.kind() != io::ErrorKind::NotFound {
                    tracing::debug!(error = %e, "failed to list store directory");
                }
                return values;
            }
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(FILE_EXTENSION) {
                continue;
            }
            let Some(key) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            match std::fs::read_to_string(&path) {
                Ok(value) => {
                    values.insert(key.to_owned(), value);
                }
                Err(e) => tracing::debug!(key, error = %e, "failed to read key file"),
            }
        }
        values
    }

    fn is_own_write(&self, key: &str, value: Option<&String>) -> bool {
        self.inner
            .own_writes
            .lock()
            .map(|writes| writes.get(key).is_some_and(|own| own.as_ref() == value))
            .unwrap_or(false)
    }

    fn record_own_write(&self, key: &str, value: Option<String>) {
        if let Ok(mut writes) = self.inner.own_writes.lock() {
            writes.insert(key.to_owned(), value);
        }
    }

    fn publish(&self, key: &str, origin: ContextId) {
        let _ = self.inner.events.send(StorageEvent::now(key, origin));
    }
}

impl std::fmt::Debug for FileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStore")
            .field("dir", &self.inner.dir)
            .finish_non_exhaustive()
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str, origin: ContextId) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.inner.dir)?;

        let tmp = path.with_extension(format!("{FILE_EXTENSION}.tmp"));
        std::fs::write(&tmp, value)?;
        if let Err(e) = std::fs::rename(&tmp, &path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e.into());
        }

        self.record_own_write(key, Some(value.to_owned()));
        self.publish(key, origin);
        Ok(())
    }

    fn remove(&self, key: &str, origin: ContextId) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        self.record_own_write(key, None);
        self.publish(key, origin);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.inner.events.subscribe()
    }
}

/// Keys whose value differs between two snapshots, including removals.
fn changed_keys(before: &HashMap<String, String>, after: &HashMap<String, String>) -> Vec<String> {
    let mut keys: Vec<String> = after
        .iter()
        .filter(|(key, value)| before.get(*key) != Some(*value))
        .map(|(key, _)| key.clone())
        .collect();
    keys.extend(
        before
            .keys()
            .filter(|key| !after.contains_key(*key))
            .cloned(),
    );
    keys.sort();
    keys
}
