//! Premium Cart Core - Shared types library.
//!
//! This crate provides the types shared by the cart components:
//! - `premium-cart` - Cart state, persistence and synchronization
//! - `cli` - Terminal rendering surface for the cart
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product ids, prices, catalog records and cart line items

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
