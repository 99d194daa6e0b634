//! Cart gestures as explicit commands.

use premium_cart_core::CartCandidate;

/// A gesture from a rendering surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartCommand {
    Add(CartCandidate),
    Increment(String),
    Decrement(String),
    Remove(String),
    Clear,
    Checkout,
}

impl CartCommand {
    /// Short name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Add(_) => "add",
            Self::Increment(_) => "increment",
            Self::Decrement(_) => "decrement",
            Self::Remove(_) => "remove",
            Self::Clear => "clear",
            Self::Checkout => "checkout",
        }
    }
}
