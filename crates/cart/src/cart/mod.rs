//! Cart state.
//!
//! [`Cart`] is the in-memory mapping from product id to [`LineItem`]. It
//! knows nothing about storage or rendering; the [`CartManager`] wraps it
//! with persistence and synchronization.
//!
//! Mutating methods return `true` when the cart changed, so callers can skip
//! the store write for no-op gestures.
//!
//! [`CartManager`]: crate::manager::CartManager

mod view;

use indexmap::IndexMap;
use premium_cart_core::price::json_number;
use premium_cart_core::{CartCandidate, CurrencyCode, LineItem, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use view::CartView;

/// A shopping cart: at most one line item per product id, each with a
/// quantity of at least one. Iteration follows insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: IndexMap<ProductId, LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a persisted cart.
    ///
    /// Entries are re-keyed by their own `id` and entries with a zero
    /// quantity are dropped, so the result always satisfies the cart
    /// invariants.
    ///
    /// # Errors
    ///
    /// Returns `serde_json::Error` if the value is not a valid cart mapping.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let raw: IndexMap<String, LineItem> = serde_json::from_str(json)?;
        let items = raw
            .into_values()
            .filter(|item| item.quantity > 0)
            .map(|item| (item.id.clone(), item))
            .collect();
        Ok(Self { items })
    }

    /// Parse a persisted cart, treating absent or malformed data as empty.
    #[must_use]
    pub fn from_stored(stored: Option<&str>) -> Self {
        let Some(json) = stored else {
            return Self::new();
        };
        Self::from_json(json).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "discarding malformed persisted cart");
            Self::new()
        })
    }

    /// Serialize to the persisted layout.
    ///
    /// # Errors
    ///
    /// Returns `serde_json::Error` if a price cannot be written as a number.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Add one unit of `candidate`.
    ///
    /// A new line item caches the candidate's name, price and image; adding
    /// an id already in the cart only bumps its quantity.
    ///
    /// The unit price is stored as it will read back from the persisted
    /// cart. Returns `false` without changing anything if the candidate's
    /// id is empty or its price is negative or out of range.
    pub fn add(&mut self, candidate: &CartCandidate) -> bool {
        let Ok(id) = ProductId::parse(&candidate.id) else {
            return false;
        };
        let Some(unit_price) = json_number::persistable(candidate.unit_price) else {
            tracing::warn!(id = %id, price = %candidate.unit_price, "ignoring candidate with unusable price");
            return false;
        };
        let item = self.items.entry(id.clone()).or_insert_with(|| LineItem {
            id,
            name: candidate.name.clone(),
            unit_price,
            image: candidate.image.clone(),
            quantity: 0,
        });
        item.quantity = item.quantity.saturating_add(1);
        true
    }

    /// Add one to the quantity of `id`. Returns `false` if `id` is absent.
    pub fn increment(&mut self, id: &str) -> bool {
        match self.items.get_mut(id) {
            Some(item) => {
                item.quantity = item.quantity.saturating_add(1);
                true
            }
            None => false,
        }
    }

    /// Subtract one from the quantity of `id`, removing the line item when
    /// it reaches zero. Returns `false` if `id` is absent.
    pub fn decrement(&mut self, id: &str) -> bool {
        let Some(item) = self.items.get_mut(id) else {
            return false;
        };
        item.quantity = item.quantity.saturating_sub(1);
        if item.quantity == 0 {
            self.items.shift_remove(id);
        }
        true
    }

    /// Remove the line item for `id`. Returns `false` if `id` is absent.
    pub fn remove(&mut self, id: &str) -> bool {
        self.items.shift_remove(id).is_some()
    }

    /// Remove every line item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Look up a line item.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&LineItem> {
        self.items.get(id)
    }

    /// Line items in insertion order.
    pub fn items(&self) -> impl Iterator<Item = &LineItem> {
        self.items.values()
    }

    /// Number of distinct line items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the cart holds no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items.values().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of `quantity * unit_price` over all line items, saturating at
    /// `Decimal::MAX`.
    #[must_use]
    pub fn total_amount(&self) -> Decimal {
        self.items
            .values()
            .map(LineItem::line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Build the view model for the rendering surface.
    #[must_use]
    pub fn view(&self, currency: CurrencyCode) -> CartView {
        CartView {
            line_items: self.items.values().cloned().collect(),
            total_quantity: self.total_quantity(),
            total_amount: self.total_amount(),
            currency,
        }
    }
}
