//! Rendering surfaces and the notices they receive.

use std::fmt;

use crate::cart::CartView;

/// One-shot messages for the shopper. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CartNotice {
    /// Checkout was attempted on an empty cart.
    EmptyCart,
    /// The demo checkout accepted the cart and cleared it.
    CheckoutAcknowledged,
    /// A change could not be written to the store and was rolled back.
    NotSaved,
}

impl CartNotice {
    /// User-facing message text.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::EmptyCart => "Your cart is empty",
            Self::CheckoutAcknowledged => {
                "Checkout demo — implement real payment flow in production."
            }
            Self::NotSaved => "Your cart could not be saved",
        }
    }
}

impl fmt::Display for CartNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Something that displays the cart: a drawer, a count badge, a totals line.
///
/// Attached surfaces receive the full view model after every successful
/// mutation and every reconciliation, so they never need to track which
/// elements changed.
pub trait RenderSurface {
    /// Redraw from the current view model.
    fn render(&mut self, view: &CartView);

    /// Show a one-shot notice. Ignored by default.
    fn notice(&mut self, notice: CartNotice) {
        let _ = notice;
    }
}
