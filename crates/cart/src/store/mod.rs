//! Persistent key-value storage for the cart.
//!
//! The cart's only durability mechanism is a string-keyed store with
//! synchronous get/set and a change notification channel. Every successful
//! write or removal publishes a [`StorageEvent`] to all subscribers of the
//! same store, including the context that made the change.
//!
//! # Backends
//!
//! - [`MemoryStore`] - In-process store shared by cloning; models several
//!   browser tabs over one local storage area.
//! - [`FileStore`] - One JSON file per key in a directory; a background
//!   watcher turns writes from other processes into change events.

mod file;
mod memory;

use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::broadcast;
use uuid::Uuid;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Capacity of each store's change channel.
///
/// A subscriber that falls further behind than this sees a lag error and
/// must reload from the store.
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Errors returned by store backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The write would exceed the store's size limit.
    #[error("storage quota exceeded: {needed} bytes needed, {limit} bytes allowed")]
    QuotaExceeded { needed: usize, limit: usize },

    /// The store cannot be used at the moment.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The key cannot be mapped to a storage location.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// Filesystem operation failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Identifies one execution context (a tab, a process) sharing a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(Uuid);

impl ContextId {
    /// Generate a fresh, random context id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ContextId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Notification that a key changed in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    /// The key that was written or removed.
    pub key: String,
    /// The context that made the change.
    pub origin: ContextId,
    /// When the store observed the change.
    pub at: DateTime<Utc>,
}

impl StorageEvent {
    /// Create an event stamped with the current time.
    #[must_use]
    pub fn now(key: impl Into<String>, origin: ContextId) -> Self {
        Self {
            key: key.into(),
            origin,
            at: Utc::now(),
        }
    }
}

/// A synchronous string key-value store with change notification.
///
/// Implementations must publish a [`StorageEvent`] to every subscriber after
/// each successful `set` or `remove`, and must leave stored data untouched
/// when a write fails.
pub trait KeyValueStore {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key` on behalf of `origin`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the value was not stored.
    fn set(&self, key: &str, value: &str, origin: ContextId) -> Result<(), StoreError>;

    /// Remove `key` on behalf of `origin`. Removing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot be written.
    fn remove(&self, key: &str, origin: ContextId) -> Result<(), StoreError>;

    /// Subscribe to change notifications for every key in this store.
    fn subscribe(&self) -> broadcast::Receiver<StorageEvent>;
}
