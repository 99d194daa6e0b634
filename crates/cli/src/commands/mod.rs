//! CLI command implementations.

pub mod cart;
pub mod catalog;
pub mod watch;

use premium_cart::{CartError, CatalogError};
use thiserror::Error;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Cart(#[from] CartError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("product {0} is not in the catalog")]
    UnknownProduct(String),
    #[error("price cannot be negative: {0}")]
    NegativePrice(rust_decimal::Decimal),
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}
