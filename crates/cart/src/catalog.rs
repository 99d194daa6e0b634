//! Product catalog loading.
//!
//! The catalog is a JSON array of product records. Records are checked
//! individually; a bad record is skipped with a warning instead of failing
//! the whole catalog.

use std::path::Path;
use std::str::FromStr;

use indexmap::IndexMap;
use premium_cart_core::price::json_number;
use premium_cart_core::{CartCandidate, CatalogProduct, ProductId};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur when loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A catalog record as found in the source file, before validation.
#[derive(Debug, Deserialize)]
struct RawProduct {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    price: Value,
    #[serde(default, alias = "img")]
    image: Option<String>,
    #[serde(default)]
    category: Option<String>,
}

/// Why a raw record was skipped.
#[derive(Debug, Error, PartialEq, Eq)]
enum RecordError {
    #[error("missing id")]
    MissingId,
    #[error("price is not a number: {0}")]
    InvalidPrice(String),
    #[error("price is negative: {0}")]
    NegativePrice(Decimal),
    #[error("price is out of range: {0}")]
    PriceOutOfRange(Decimal),
}

impl RawProduct {
    fn validate(self) -> Result<CatalogProduct, RecordError> {
        let id = ProductId::parse(&self.id).map_err(|_| RecordError::MissingId)?;
        let price = coerce_price(&self.price)?;
        Ok(CatalogProduct {
            id,
            name: self.name,
            price,
            image: self.image.unwrap_or_default(),
            category: self.category.filter(|c| !c.trim().is_empty()),
        })
    }
}

/// Coerce a JSON price (number or numeric string) to a decimal.
fn coerce_price(value: &Value) -> Result<Decimal, RecordError> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_owned(),
        other => return Err(RecordError::InvalidPrice(other.to_string())),
    };
    let price = Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| RecordError::InvalidPrice(text.clone()))?;
    if price.is_sign_negative() && !price.is_zero() {
        return Err(RecordError::NegativePrice(price));
    }
    json_number::persistable(price).ok_or(RecordError::PriceOutOfRange(price))
}

/// Products available to add to the cart, in source order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: IndexMap<ProductId, CatalogProduct>,
}

impl Catalog {
    /// Parse a catalog from a JSON array of product records.
    ///
    /// Records without an id or with an unusable price are skipped. When an
    /// id appears twice, the first record wins.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Json` if the input is not a JSON array of
    /// objects.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let raw: Vec<RawProduct> = serde_json::from_str(json)?;
        let mut products = IndexMap::with_capacity(raw.len());
        for (index, record) in raw.into_iter().enumerate() {
            match record.validate() {
                Ok(product) => {
                    if products.contains_key(&product.id) {
                        tracing::warn!(index, id = %product.id, "skipping duplicate catalog record");
                        continue;
                    }
                    products.insert(product.id.clone(), product);
                }
                Err(e) => tracing::warn!(index, error = %e, "skipping catalog record"),
            }
        }
        tracing::debug!(products = products.len(), "catalog loaded");
        Ok(Self { products })
    }

    /// Load a catalog file.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&CatalogProduct> {
        self.products.get(id)
    }

    /// The add-to-cart candidate for a product.
    #[must_use]
    pub fn candidate(&self, id: &str) -> Option<CartCandidate> {
        self.get(id).map(CartCandidate::from)
    }

    /// Products in a category (case-insensitive), in source order.
    pub fn by_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a CatalogProduct> {
        self.products.values().filter(move |product| {
            product
                .category
                .as_deref()
                .is_some_and(|c| c.eq_ignore_ascii_case(category))
        })
    }

    /// All products in source order.
    pub fn iter(&self) -> impl Iterator<Item = &CatalogProduct> {
        self.products.values()
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Returns `true` if the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
