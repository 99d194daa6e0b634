//! Premium Cart library.
//!
//! A shopping cart persisted in a local key-value store and kept consistent
//! across every view and execution context that shares the store.
//!
//! # Architecture
//!
//! - [`cart`] - In-memory cart state and the derived view model
//! - [`manager`] - `CartManager`: gestures, persistence, reconciliation
//! - [`store`] - Key-value store trait, change events, memory and file backends
//! - [`surface`] - Rendering surface trait and shopper notices
//! - [`catalog`] - Product catalog loading
//!
//! # Example
//!
//! ```
//! use premium_cart::{CartManager, MemoryStore, DEFAULT_CART_KEY};
//! use premium_cart_core::CartCandidate;
//! use rust_decimal::Decimal;
//!
//! let store = MemoryStore::new();
//! let mut tab = CartManager::new(store.clone(), DEFAULT_CART_KEY);
//! let mut other_tab = CartManager::new(store, DEFAULT_CART_KEY);
//!
//! let watch = CartCandidate::new("w1", "Watch", Decimal::new(120, 0), "w1.png");
//! tab.add_item(&watch).unwrap();
//!
//! assert!(other_tab.sync());
//! assert_eq!(other_tab.view_model().formatted_total(), "$120.00");
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod command;
pub mod config;
pub mod error;
pub mod manager;
pub mod store;
pub mod surface;

pub use cart::{Cart, CartView};
pub use catalog::{Catalog, CatalogError};
pub use command::CartCommand;
pub use config::{CartConfig, ConfigError, LogFormat};
pub use error::CartError;
pub use manager::{CartManager, CheckoutOutcome, DEFAULT_CART_KEY};
pub use store::{ContextId, FileStore, KeyValueStore, MemoryStore, StorageEvent, StoreError};
pub use surface::{CartNotice, RenderSurface};
