//! Identifier types for console entities.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a country record as issued by the admin backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountryId(String);

impl CountryId {
    /// Create a new country ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CountryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CountryId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Identifier of a merchant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MerchantId(String);

impl MerchantId {
    /// Create a new merchant ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Basic shape check: non-empty, no whitespace, at most 64 chars.
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty() && self.0.len() <= 64 && !self.0.chars().any(char::is_whitespace)
    }
}

impl fmt::Display for MerchantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MerchantId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
