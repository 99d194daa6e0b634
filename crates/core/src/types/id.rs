//! Product identifiers.
//!
//! Catalog records and cart line items are keyed by an opaque string id.
//! [`ProductId`] guarantees the id is non-empty so a line item can always be
//! addressed by the rendering surface.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ProductId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The input string is empty or whitespace only.
    #[error("product id cannot be empty")]
    Empty,
}

/// An opaque, non-empty product identifier.
///
/// ## Examples
///
/// ```
/// use premium_cart_core::ProductId;
///
/// assert!(ProductId::parse("w1").is_ok());
/// assert!(ProductId::parse("").is_err());
/// assert!(ProductId::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductId(String);

impl ProductId {
    /// Parse a `ProductId` from a string.
    ///
    /// The id is stored as given; surrounding whitespace is not trimmed
    /// because ids are opaque.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::Empty`] if the input is empty or only whitespace.
    pub fn parse(s: &str) -> Result<Self, IdError> {
        if s.trim().is_empty() {
            return Err(IdError::Empty);
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl std::str::FromStr for ProductId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ProductId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.trim().is_empty() {
            return Err(IdError::Empty);
        }
        Ok(Self(value))
    }
}

impl From<ProductId> for String {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for ProductId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let id = ProductId::parse("w1").unwrap();
        assert_eq!(id.as_str(), "w1");
        assert_eq!(id.to_string(), "w1");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(ProductId::parse(""), Err(IdError::Empty));
        assert_eq!(ProductId::parse(" \t"), Err(IdError::Empty));
    }

    #[test]
    fn test_parse_keeps_whitespace() {
        let id = ProductId::parse(" w1 ").unwrap();
        assert_eq!(id.as_str(), " w1 ");
    }

    #[test]
    fn test_serde_transparent_string() {
        let id = ProductId::parse("sku-9").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"sku-9\"");

        let back: ProductId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_deserialize_rejects_empty() {
        let result: Result<ProductId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }
}
