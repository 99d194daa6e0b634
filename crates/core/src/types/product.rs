//! Catalog product records and cart add candidates.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::json_number;

/// A product record supplied by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogProduct {
    pub id: ProductId,
    pub name: String,
    #[serde(with = "json_number")]
    pub price: Decimal,
    #[serde(alias = "img")]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// The fields a cart caches when a product is first added.
///
/// The id is kept as a raw string: an empty id is a valid gesture from the
/// rendering surface, and the cart ignores it rather than rejecting it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartCandidate {
    pub id: String,
    pub name: String,
    #[serde(with = "json_number")]
    pub unit_price: Decimal,
    pub image: String,
}

impl CartCandidate {
    /// Create a candidate from its parts.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        unit_price: Decimal,
        image: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            unit_price,
            image: image.into(),
        }
    }
}

impl From<&CatalogProduct> for CartCandidate {
    fn from(product: &CatalogProduct) -> Self {
        Self {
            id: product.id.as_str().to_owned(),
            name: product.name.clone(),
            unit_price: product.price,
            image: product.image.clone(),
        }
    }
}
