//! Terminal rendering of the cart.

use std::io::{self, Write};

use premium_cart::{CartNotice, CartView, RenderSurface};

/// Draws the cart drawer as plain text.
pub struct TerminalSurface {
    out: Box<dyn Write>,
}

impl TerminalSurface {
    /// Render to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    /// Render to any writer.
    #[must_use]
    pub fn new(out: Box<dyn Write>) -> Self {
        Self { out }
    }

    fn draw(&mut self, view: &CartView) -> io::Result<()> {
        writeln!(self.out, "Cart ({})", view.badge())?;
        if view.is_empty() {
            writeln!(self.out, "  Your cart is empty.")?;
        }
        for item in &view.line_items {
            writeln!(
                self.out,
                "  {:<24} x{:<4} {:>14} {:>12}  [{}]",
                item.name,
                item.quantity,
                view.formatted_price(item),
                view.formatted_line_total(item),
                item.id,
            )?;
        }
        writeln!(self.out, "Total: {}", view.formatted_total())?;
        self.out.flush()
    }
}

impl RenderSurface for TerminalSurface {
    fn render(&mut self, view: &CartView) {
        if let Err(e) = self.draw(view) {
            tracing::debug!(error = %e, "failed to draw cart");
        }
    }

    fn notice(&mut self, notice: CartNotice) {
        if let Err(e) = writeln!(self.out, "! {notice}") {
            tracing::debug!(error = %e, "failed to write notice");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub mod tests {
    use std::sync::{Arc, Mutex};

    use premium_cart::Cart;
    use premium_cart_core::{CartCandidate, CurrencyCode};
    use rust_decimal::Decimal;

    use super::*;

    /// A writer whose contents can be read back after being boxed.
    #[derive(Clone, Default)]
    pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        pub fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_render_empty() {
        let buffer = SharedBuffer::default();
        let mut surface = TerminalSurface::new(Box::new(buffer.clone()));
        surface.render(&CartView::empty(CurrencyCode::USD));

        let out = buffer.contents();
        assert!(out.contains("Cart (0)"));
        assert!(out.contains("Your cart is empty."));
        assert!(out.contains("Total: $0.00"));
    }

    #[test]
    fn test_render_items() {
        let mut cart = Cart::new();
        let watch = CartCandidate::new("w1", "Watch", Decimal::new(120, 0), "w1.png");
        cart.add(&watch);
        cart.add(&watch);

        let buffer = SharedBuffer::default();
        let mut surface = TerminalSurface::new(Box::new(buffer.clone()));
        surface.render(&cart.view(CurrencyCode::USD));

        let out = buffer.contents();
        assert!(out.contains("Cart (2)"));
        assert!(out.contains("Watch"));
        assert!(out.contains("120.00 USD"));
        assert!(out.contains("[w1]"));
        assert!(out.contains("Total: $240.00"));
    }

    #[test]
    fn test_notice() {
        let buffer = SharedBuffer::default();
        let mut surface = TerminalSurface::new(Box::new(buffer.clone()));
        surface.notice(CartNotice::EmptyCart);
        assert_eq!(buffer.contents(), "! Your cart is empty\n");
    }
}
