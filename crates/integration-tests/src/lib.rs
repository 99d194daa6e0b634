//! Integration tests for Premium Cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p premium-cart-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `multi_context` - Several cart managers sharing one store
//! - `write_failures` - Quota and availability failures
//! - `file_store` - Managers backed by the on-disk store and its watcher
//!
//! Shared fixtures live here so every test file builds the same products.

use std::sync::{Arc, Mutex};

use premium_cart::{CartNotice, CartView, RenderSurface};
use premium_cart_core::CartCandidate;
use rust_decimal::Decimal;

/// The watch used across scenarios: $120.00.
#[must_use]
pub fn watch() -> CartCandidate {
    CartCandidate::new("w1", "Watch", Decimal::new(120, 0), "w1.png")
}

/// The strap used across scenarios: $19.99.
#[must_use]
pub fn strap() -> CartCandidate {
    CartCandidate::new("s1", "Strap", Decimal::new(1999, 2), "s1.png")
}

/// What a [`Recorder`] has seen.
#[derive(Debug, Default)]
pub struct Recorded {
    pub views: Vec<CartView>,
    pub notices: Vec<CartNotice>,
}

/// A surface that keeps every view and notice it receives.
#[derive(Debug, Clone, Default)]
pub struct Recorder(Arc<Mutex<Recorded>>);

impl Recorder {
    /// Number of renders so far.
    ///
    /// # Panics
    ///
    /// Panics if the recorder lock is poisoned.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn renders(&self) -> usize {
        self.0.lock().unwrap().views.len()
    }

    /// The most recent view, if any.
    ///
    /// # Panics
    ///
    /// Panics if the recorder lock is poisoned.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn last_view(&self) -> Option<CartView> {
        self.0.lock().unwrap().views.last().cloned()
    }

    /// Every notice so far.
    ///
    /// # Panics
    ///
    /// Panics if the recorder lock is poisoned.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn notices(&self) -> Vec<CartNotice> {
        self.0.lock().unwrap().notices.clone()
    }
}

impl RenderSurface for Recorder {
    #[allow(clippy::unwrap_used)]
    fn render(&mut self, view: &CartView) {
        self.0.lock().unwrap().views.push(view.clone());
    }

    #[allow(clippy::unwrap_used)]
    fn notice(&mut self, notice: CartNotice) {
        self.0.lock().unwrap().notices.push(notice);
    }
}
