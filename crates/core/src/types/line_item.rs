//! Cart line items.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::json_number;

/// One distinct product held in a cart.
///
/// `name`, `unit_price` and `image` are snapshots taken when the product was
/// first added; they are never refreshed from the catalog.
///
/// The serialized field names (`price`, `qty`) match the persisted cart
/// layout shared with the browser storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ProductId,
    pub name: String,
    #[serde(rename = "price", with = "json_number")]
    pub unit_price: Decimal,
    #[serde(alias = "img")]
    pub image: String,
    #[serde(rename = "qty")]
    pub quantity: u32,
}

impl LineItem {
    /// Line total: `quantity * unit_price`, saturating at `Decimal::MAX`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price.saturating_mul(Decimal::from(self.quantity))
    }
}
