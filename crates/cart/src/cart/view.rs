//! Cart view model.

use premium_cart_core::{CurrencyCode, LineItem, Price};
use rust_decimal::Decimal;

/// Cart display data for rendering surfaces.
///
/// Amounts stay unrounded here; the `formatted_*` helpers do the currency
/// formatting for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    pub line_items: Vec<LineItem>,
    pub total_quantity: u64,
    pub total_amount: Decimal,
    pub currency: CurrencyCode,
}

impl CartView {
    /// Create an empty view.
    #[must_use]
    pub const fn empty(currency: CurrencyCode) -> Self {
        Self {
            line_items: Vec::new(),
            total_quantity: 0,
            total_amount: Decimal::ZERO,
            currency,
        }
    }

    /// Returns `true` if there is nothing to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.line_items.is_empty()
    }

    /// Count for the cart badge.
    #[must_use]
    pub const fn badge(&self) -> u64 {
        self.total_quantity
    }

    /// Running total, e.g. "$240.00".
    #[must_use]
    pub fn formatted_total(&self) -> String {
        self.format(self.total_amount)
    }

    /// Unit price of a line, e.g. "120.00 USD".
    #[must_use]
    pub fn formatted_price(&self, item: &LineItem) -> String {
        Price::new(item.unit_price, self.currency).display_with_code()
    }

    /// Line total, e.g. "$240.00".
    #[must_use]
    pub fn formatted_line_total(&self, item: &LineItem) -> String {
        self.format(item.line_total())
    }

    fn format(&self, amount: Decimal) -> String {
        Price::new(amount, self.currency).display()
    }
}
