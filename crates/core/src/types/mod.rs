//! Core types for Premium Cart.
//!
//! This module provides type-safe wrappers for catalog and cart concepts.

pub mod id;
pub mod line_item;
pub mod price;
pub mod product;

pub use id::{IdError, ProductId};
pub use line_item::LineItem;
pub use price::{CurrencyCode, Price, UnknownCurrency};
pub use product::{CartCandidate, CatalogProduct};
