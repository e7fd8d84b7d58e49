//! Monetary types for the currency display layer.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::CommonError;

/// Currencies a user may pick as a display override.
pub const SUPPORTED_DISPLAY_CURRENCIES: &[&str] = &[
    "USD", "CNY", "EUR", "GBP", "JPY", "HKD", "SGD", "THB", "MYR", "IDR", "PHP", "VND", "INR",
    "KRW", "AUD", "BRL", "MXN",
];

/// Base currency used when no country is selected.
pub const FALLBACK_BASE_CURRENCY: &str = "USD";

/// ISO 4217 currency code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    /// Create a new currency from code.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_uppercase())
    }

    /// Create a currency, rejecting anything that is not three ASCII letters.
    pub fn parse(code: &str) -> Result<Self, CommonError> {
        let currency = Self::new(code);
        if currency.is_well_formed() {
            Ok(currency)
        } else {
            Err(CommonError::InvalidCurrency(code.to_string()))
        }
    }

    /// Like [`parse`](Self::parse), additionally requiring a supported
    /// display currency.
    pub fn parse_display(code: &str) -> Result<Self, CommonError> {
        let currency = Self::parse(code)?;
        if currency.is_supported_display() {
            Ok(currency)
        } else {
            Err(CommonError::UnsupportedCurrency(currency.0))
        }
    }

    /// Get the currency code.
    pub fn code(&self) -> &str {
        &self.0
    }

    /// True for the empty code that marks a never-populated rate cache.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn is_well_formed(&self) -> bool {
        self.0.len() == 3 && self.0.chars().all(|c| c.is_ascii_uppercase())
    }

    /// Get the standard decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        match self.0.as_str() {
            "JPY" | "KRW" | "VND" | "IDR" => 0,
            "BHD" | "KWD" | "OMR" => 3,
            _ => 2,
        }
    }

    /// Whether this currency may be chosen as a display override.
    pub fn is_supported_display(&self) -> bool {
        SUPPORTED_DISPLAY_CURRENCIES.contains(&self.0.as_str())
    }

    /// The base used when nothing else is known.
    pub fn fallback_base() -> Self {
        Self::new(FALLBACK_BASE_CURRENCY)
    }

    /// Common currencies
    pub fn usd() -> Self {
        Self::new("USD")
    }

    pub fn cny() -> Self {
        Self::new("CNY")
    }

    pub fn eur() -> Self {
        Self::new("EUR")
    }

    pub fn jpy() -> Self {
        Self::new("JPY")
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Currency {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Currency {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<Currency> for String {
    fn from(c: Currency) -> Self {
        c.0
    }
}

/// Exchange rates keyed by currency, relative to some base currency.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateTable(HashMap<Currency, Decimal>);

impl RateTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a rate. Non-positive rates are refused and `false` is returned.
    pub fn insert(&mut self, currency: Currency, rate: Decimal) -> bool {
        if rate <= Decimal::ZERO {
            return false;
        }
        self.0.insert(currency, rate);
        true
    }

    /// Look up the rate for a currency.
    pub fn get(&self, currency: &Currency) -> Option<Decimal> {
        self.0.get(currency).copied()
    }

    pub fn contains(&self, currency: &Currency) -> bool {
        self.0.contains_key(currency)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(currency, rate)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&Currency, &Decimal)> {
        self.0.iter()
    }
}

impl FromIterator<(Currency, Decimal)> for RateTable {
    fn from_iter<I: IntoIterator<Item = (Currency, Decimal)>>(iter: I) -> Self {
        let mut table = RateTable::new();
        for (currency, rate) in iter {
            table.insert(currency, rate);
        }
        table
    }
}

/// A raw amount handed to the converter: either already numeric or text that
/// may or may not parse as a number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Amount {
    Number(Decimal),
    Text(String),
}

impl Amount {
    /// Numeric value of the amount, if it has one.
    ///
    /// Text must be a plain decimal or scientific literal once trimmed; digit
    /// separators such as `_` or `,` make it non-numeric.
    pub fn to_decimal(&self) -> Option<Decimal> {
        match self {
            Amount::Number(d) => Some(*d),
            Amount::Text(s) => {
                let s = s.trim();
                if s.is_empty() || !s.chars().all(is_numeric_char) {
                    return None;
                }
                Decimal::from_str(s)
                    .or_else(|_| Decimal::from_scientific(s))
                    .ok()
            }
        }
    }

    pub fn as_number(&self) -> Option<Decimal> {
        match self {
            Amount::Number(d) => Some(*d),
            Amount::Text(_) => None,
        }
    }
}

fn is_numeric_char(c: char) -> bool {
    matches!(c, '0'..='9' | '+' | '-' | '.' | 'e' | 'E')
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Amount::Number(d) => write!(f, "{}", d.normalize()),
            Amount::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<Decimal> for Amount {
    fn from(d: Decimal) -> Self {
        Amount::Number(d)
    }
}

impl From<i64> for Amount {
    fn from(v: i64) -> Self {
        Amount::Number(Decimal::from(v))
    }
}

impl From<i32> for Amount {
    fn from(v: i32) -> Self {
        Amount::Number(Decimal::from(v))
    }
}

impl From<u64> for Amount {
    fn from(v: u64) -> Self {
        Amount::Number(Decimal::from(v))
    }
}

impl From<&str> for Amount {
    fn from(s: &str) -> Self {
        Amount::Text(s.to_string())
    }
}

impl From<String> for Amount {
    fn from(s: String) -> Self {
        Amount::Text(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_currency_normalizes_case() {
        assert_eq!(Currency::new(" cny "), Currency::cny());
        assert!(Currency::parse("usd").is_ok());
        assert!(Currency::parse("US").is_err());
        assert!(Currency::parse("U5D").is_err());
    }

    #[test]
    fn test_currency_decimal_places() {
        assert_eq!(Currency::usd().decimal_places(), 2);
        assert_eq!(Currency::jpy().decimal_places(), 0);
        assert_eq!(Currency::new("KWD").decimal_places(), 3);
    }

    #[test]
    fn test_supported_display_set() {
        assert!(Currency::cny().is_supported_display());
        assert!(!Currency::new("XAU").is_supported_display());

        assert_eq!(Currency::parse_display("hkd"), Ok(Currency::new("HKD")));
        assert_eq!(
            Currency::parse_display("XAU"),
            Err(CommonError::UnsupportedCurrency("XAU".to_string()))
        );
        assert!(matches!(Currency::parse_display("X"), Err(CommonError::InvalidCurrency(_))));
    }

    #[test]
    fn test_rate_table_refuses_non_positive() {
        let mut table = RateTable::new();
        assert!(table.insert(Currency::usd(), dec!(1)));
        assert!(!table.insert(Currency::cny(), dec!(0)));
        assert!(!table.insert(Currency::eur(), dec!(-0.9)));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_rate_table_json_shape() {
        let table: RateTable = [(Currency::usd(), dec!(1)), (Currency::cny(), dec!(7.09))]
            .into_iter()
            .collect();
        let json = serde_json::to_value(&table).unwrap();
        assert!(json.get("CNY").is_some());

        let back: RateTable = serde_json::from_value(json).unwrap();
        assert_eq!(back.get(&Currency::cny()), Some(dec!(7.09)));
    }

    #[test]
    fn test_amount_parsing() {
        assert_eq!(Amount::from("  12.50 ").to_decimal(), Some(dec!(12.50)));
        assert_eq!(Amount::from("1e3").to_decimal(), Some(dec!(1000)));
        assert_eq!(Amount::from("abc").to_decimal(), None);
        assert_eq!(Amount::from("").to_decimal(), None);
        assert_eq!(Amount::from(100).to_decimal(), Some(dec!(100)));
    }

    #[test]
    fn test_amount_rejects_digit_separators() {
        assert_eq!(Amount::from("1_000").to_decimal(), None);
        assert_eq!(Amount::from("1,000").to_decimal(), None);
        assert_eq!(Amount::from("_").to_decimal(), None);
        assert_eq!(Amount::from("12abc").to_decimal(), None);
        assert_eq!(Amount::from("-2.5E2").to_decimal(), Some(dec!(-250)));
    }
}
