//! Type-safe price representation using decimal arithmetic.
//!
//! Amounts are kept as [`Decimal`] end to end. Rounding to two places only
//! happens in [`Price::display`], at the presentation boundary.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Format for display (e.g., "$19.99").
    ///
    /// Rounds half away from zero to two decimal places.
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self
            .amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        format!("{}{:.2}", self.currency_code.symbol(), rounded)
    }

    /// Format with the currency code suffix (e.g., "19.99 USD").
    #[must_use]
    pub fn display_with_code(&self) -> String {
        let rounded = self
            .amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        format!("{:.2} {}", rounded, self.currency_code.code())
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    /// Three-letter ISO code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        }
    }
}

/// Error returned when a currency code is not supported.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported currency code: {0}")]
pub struct UnknownCurrency(pub String);

impl FromStr for CurrencyCode {
    type Err = UnknownCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            "CAD" => Ok(Self::CAD),
            "AUD" => Ok(Self::AUD),
            _ => Err(UnknownCurrency(s.to_owned())),
        }
    }
}

/// Serde adapter that writes a [`Decimal`] as a JSON number.
///
/// Reading accepts a JSON number or a numeric string. Numbers are converted
/// through their shortest round-trip text form, so `19.99` comes back as
/// exactly `19.99` rather than the nearest binary fraction. Negative amounts
/// are rejected.
///
/// Only amounts returned by [`persistable`](json_number::persistable) are
/// guaranteed to read back equal to what was written.
pub mod json_number {
    use std::fmt;
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};

    /// Largest accepted price, in whole currency units.
    ///
    /// Keeps every price within the digits an `f64` carries exactly and
    /// keeps line totals far from `Decimal` overflow.
    pub const MAX_PRICE_UNITS: u64 = 1_000_000_000_000;

    /// The amount as it will read back after a write, or `None` if it is
    /// negative or above [`MAX_PRICE_UNITS`].
    ///
    /// ```
    /// use premium_cart_core::price::json_number::persistable;
    /// use rust_decimal::Decimal;
    ///
    /// assert_eq!(persistable(Decimal::new(1999, 2)), Some(Decimal::new(1999, 2)));
    /// assert_eq!(persistable(Decimal::new(-5, 0)), None);
    /// ```
    #[must_use]
    pub fn persistable(value: Decimal) -> Option<Decimal> {
        if value.is_zero() {
            return Some(Decimal::ZERO);
        }
        if value.is_sign_negative() || value > Decimal::from(MAX_PRICE_UNITS) {
            return None;
        }
        from_f64(to_f64(value)?)
    }

    /// Parsing the decimal text picks the nearest `f64`.
    fn to_f64(value: Decimal) -> Option<f64> {
        value
            .normalize()
            .to_string()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
    }

    fn from_f64(value: f64) -> Option<Decimal> {
        Decimal::from_str(&value.to_string()).ok()
    }

    /// Serialize a decimal as an `f64` JSON number.
    ///
    /// # Errors
    ///
    /// Returns a serializer error if the amount cannot be represented as `f64`.
    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        let number =
            to_f64(*value).ok_or_else(|| serde::ser::Error::custom("price out of range"))?;
        serializer.serialize_f64(number)
    }

    /// Deserialize a decimal from a JSON number or numeric string.
    ///
    /// # Errors
    ///
    /// Returns a deserializer error for non-numeric or negative input.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        deserializer.deserialize_any(PriceVisitor)
    }

    struct PriceVisitor;

    impl PriceVisitor {
        fn non_negative<E: de::Error>(value: Decimal) -> Result<Decimal, E> {
            if value.is_sign_negative() && !value.is_zero() {
                return Err(E::custom(format!("price cannot be negative: {value}")));
            }
            Ok(value)
        }
    }

    impl Visitor<'_> for PriceVisitor {
        type Value = Decimal;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a non-negative number or numeric string")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Decimal, E> {
            Ok(Decimal::from(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Decimal, E> {
            Self::non_negative(Decimal::from(v))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Decimal, E> {
            if !v.is_finite() {
                return Err(E::custom("price must be finite"));
            }
            let value = from_f64(v).ok_or_else(|| E::custom(format!("price out of range: {v}")))?;
            Self::non_negative(value)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Decimal, E> {
            let value = Decimal::from_str(v.trim()).map_err(E::custom)?;
            Self::non_negative(value)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    struct Priced {
        #[serde(with = "json_number")]
        price: Decimal,
    }

    fn usd(amount: Decimal) -> Price {
        Price::new(amount, CurrencyCode::USD)
    }

    #[test]
    fn test_display_two_places() {
        assert_eq!(usd(Decimal::new(120, 0)).display(), "$120.00");
        assert_eq!(usd(Decimal::new(1999, 2)).display(), "$19.99");
        assert_eq!(usd(Decimal::ZERO).display(), "$0.00");
    }

    #[test]
    fn test_display_rounds_half_away_from_zero() {
        assert_eq!(usd(Decimal::new(10_005, 3)).display(), "$10.01");
        assert_eq!(usd(Decimal::new(10_004, 3)).display(), "$10.00");
    }

    #[test]
    fn test_display_other_currencies() {
        let eur = Price::new(Decimal::new(5, 0), CurrencyCode::EUR);
        assert_eq!(eur.display(), "€5.00");
        assert_eq!(eur.display_with_code(), "5.00 EUR");
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!("usd".parse::<CurrencyCode>().unwrap(), CurrencyCode::USD);
        assert_eq!(" GBP ".parse::<CurrencyCode>().unwrap(), CurrencyCode::GBP);
        assert!("XYZ".parse::<CurrencyCode>().is_err());
    }

    #[test]
    fn test_json_number_writes_number() {
        let json = serde_json::to_string(&Priced {
            price: Decimal::new(1999, 2),
        })
        .unwrap();
        assert_eq!(json, r#"{"price":19.99}"#);
    }

    #[test]
    fn test_json_number_reads_exact_decimal() {
        let p: Priced = serde_json::from_str(r#"{"price":19.99}"#).unwrap();
        assert_eq!(p.price, Decimal::new(1999, 2));

        let p: Priced = serde_json::from_str(r#"{"price":120}"#).unwrap();
        assert_eq!(p.price, Decimal::new(120, 0));
    }

    #[test]
    fn test_json_number_coerces_strings() {
        let p: Priced = serde_json::from_str(r#"{"price":" 45.50 "}"#).unwrap();
        assert_eq!(p.price, Decimal::new(4550, 2));
    }

    #[test]
    fn test_json_number_rejects_negative_and_garbage() {
        assert!(serde_json::from_str::<Priced>(r#"{"price":-1}"#).is_err());
        assert!(serde_json::from_str::<Priced>(r#"{"price":-0.5}"#).is_err());
        assert!(serde_json::from_str::<Priced>(r#"{"price":"abc"}"#).is_err());
        assert!(serde_json::from_str::<Priced>(r#"{"price":null}"#).is_err());
    }

    #[test]
    fn test_persistable_keeps_ordinary_prices() {
        for price in [Decimal::ZERO, Decimal::new(1999, 2), Decimal::new(120, 0)] {
            assert_eq!(json_number::persistable(price), Some(price));
        }
    }

    #[test]
    fn test_persistable_rejects_negative_and_huge() {
        assert_eq!(json_number::persistable(Decimal::new(-5, 0)), None);
        assert_eq!(json_number::persistable(Decimal::MAX), None);
        let over = Decimal::from(json_number::MAX_PRICE_UNITS) + Decimal::ONE;
        assert_eq!(json_number::persistable(over), None);
    }

    #[test]
    fn test_persistable_matches_what_reads_back() {
        // 17 significant digits do not survive an f64.
        let precise = Decimal::from_str("123456789.0123456789").unwrap();
        let kept = json_number::persistable(precise).unwrap();
        assert_ne!(kept, precise);

        let json = serde_json::to_string(&Priced { price: precise }).unwrap();
        let back: Priced = serde_json::from_str(&json).unwrap();
        assert_eq!(back.price, kept);
    }
}
