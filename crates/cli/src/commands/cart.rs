//! Cart gesture commands.
//!
//! # Usage
//!
//! ```bash
//! # Add a product by hand
//! cart-cli add --id w1 --name Watch --price 120 --image w1.png
//!
//! # Add a product from a catalog file
//! cart-cli add --id w1 --catalog products.json
//!
//! # Adjust quantities
//! cart-cli inc w1
//! cart-cli dec w1
//! cart-cli remove w1
//!
//! # Empty the cart, or run the demo checkout
//! cart-cli clear
//! cart-cli checkout
//! ```

use std::path::Path;

use premium_cart::{Catalog, CartCommand, CartManager, KeyValueStore};
use premium_cart_core::CartCandidate;
use rust_decimal::Decimal;

use super::CommandError;

/// Build an add candidate from explicit fields or a catalog lookup.
///
/// # Errors
///
/// Returns `CommandError` if the catalog cannot be loaded, the product is
/// not in it, or the price is negative.
pub fn candidate(
    id: &str,
    catalog: Option<&Path>,
    name: Option<String>,
    price: Option<Decimal>,
    image: Option<String>,
) -> Result<CartCandidate, CommandError> {
    if let Some(path) = catalog {
        let catalog = Catalog::load(path)?;
        return catalog
            .candidate(id)
            .ok_or_else(|| CommandError::UnknownProduct(id.to_owned()));
    }

    let price = price.unwrap_or_default();
    if price.is_sign_negative() && !price.is_zero() {
        return Err(CommandError::NegativePrice(price));
    }
    Ok(CartCandidate::new(
        id,
        name.unwrap_or_else(|| id.to_owned()),
        price,
        image.unwrap_or_default(),
    ))
}

/// Run one gesture against the cart.
///
/// Surfaces are re-rendered by the manager when the cart changes. For a
/// gesture that changes nothing, the current cart is rendered explicitly so
/// the user always sees a result.
///
/// # Errors
///
/// Returns `CommandError::Cart` if the change could not be saved.
pub fn apply<S: KeyValueStore>(
    manager: &mut CartManager<S>,
    command: CartCommand,
) -> Result<(), CommandError> {
    let before = manager.cart().clone();
    // Clear always writes and re-renders; checkout answers with a notice.
    let always_reported = matches!(command, CartCommand::Clear | CartCommand::Checkout);

    manager.dispatch(command)?;

    if !always_reported && manager.cart() == &before {
        tracing::info!("cart unchanged");
        manager.refresh();
    }
    Ok(())
}

/// Show the current cart.
pub fn show<S: KeyValueStore>(manager: &mut CartManager<S>) {
    manager.refresh();
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use premium_cart::MemoryStore;

    use super::*;
    use crate::surface::TerminalSurface;
    use crate::surface::tests::SharedBuffer;

    fn manager_with_output() -> (CartManager<MemoryStore>, SharedBuffer) {
        let mut manager = CartManager::new(MemoryStore::new(), "cart");
        let buffer = SharedBuffer::default();
        manager.attach(Box::new(TerminalSurface::new(Box::new(buffer.clone()))));
        (manager, buffer)
    }

    #[test]
    fn test_candidate_from_fields() {
        let candidate = candidate(
            "w1",
            None,
            Some("Watch".to_string()),
            Some(Decimal::new(120, 0)),
            Some("w1.png".to_string()),
        )
        .unwrap();
        assert_eq!(
            candidate,
            CartCandidate::new("w1", "Watch", Decimal::new(120, 0), "w1.png")
        );
    }

    #[test]
    fn test_candidate_rejects_negative_price() {
        let result = candidate("w1", None, None, Some(Decimal::new(-1, 0)), None);
        assert!(matches!(result, Err(CommandError::NegativePrice(_))));
    }

    #[test]
    fn test_candidate_from_catalog() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"[{"id":"s1","name":"Strap","price":"19.99","image":"s1.png"}]"#)
            .unwrap();

        let found = candidate("s1", Some(file.path()), None, None, None).unwrap();
        assert_eq!(found.name, "Strap");

        let missing = candidate("nope", Some(file.path()), None, None, None);
        assert!(matches!(missing, Err(CommandError::UnknownProduct(_))));
    }

    #[test]
    fn test_apply_renders_change_once() {
        let (mut manager, buffer) = manager_with_output();
        let watch = CartCandidate::new("w1", "Watch", Decimal::new(120, 0), "w1.png");

        apply(&mut manager, CartCommand::Add(watch)).unwrap();
        assert_eq!(buffer.contents().matches("Cart (").count(), 1);
        assert!(buffer.contents().contains("Total: $120.00"));
    }

    #[test]
    fn test_apply_noop_still_renders() {
        let (mut manager, buffer) = manager_with_output();
        apply(&mut manager, CartCommand::Increment("missing".to_string())).unwrap();
        assert!(buffer.contents().contains("Your cart is empty."));
    }

    #[test]
    fn test_checkout_on_empty_cart_shows_notice_only() {
        let (mut manager, buffer) = manager_with_output();
        apply(&mut manager, CartCommand::Checkout).unwrap();
        assert_eq!(buffer.contents(), "! Your cart is empty\n");
    }
}
