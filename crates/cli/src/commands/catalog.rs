//! Catalog listing command.
//!
//! # Usage
//!
//! ```bash
//! cart-cli catalog products.json
//! cart-cli catalog products.json --category watches
//! ```

use std::io::Write;
use std::path::Path;

use premium_cart::Catalog;
use premium_cart_core::{CurrencyCode, Price};

use super::CommandError;

/// Print the products in a catalog file, optionally filtered by category.
///
/// # Errors
///
/// Returns `CommandError` if the catalog cannot be loaded or the output
/// cannot be written.
pub fn list(
    path: &Path,
    category: Option<&str>,
    currency: CurrencyCode,
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    let catalog = Catalog::load(path)?;
    let products: Vec<_> = match category {
        Some(category) => catalog.by_category(category).collect(),
        None => catalog.iter().collect(),
    };

    if products.is_empty() {
        writeln!(out, "No products found.")?;
        return Ok(());
    }
    for product in products {
        writeln!(
            out,
            "{:<12} {:<24} {:>12}  {}",
            product.id,
            product.name,
            Price::new(product.price, currency).display(),
            product.category.as_deref().unwrap_or("-"),
        )?;
    }
    Ok(())
}
