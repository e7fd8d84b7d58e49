//! Error types shared across the console crates.

use thiserror::Error;

/// Errors raised while constructing common value types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommonError {
    /// Not a three-letter currency code.
    #[error("Invalid currency code: {0:?}")]
    InvalidCurrency(String),

    /// Currency is well formed but not offered as a display currency.
    #[error("Unsupported display currency: {0}")]
    UnsupportedCurrency(String),
}

/// Result type for common operations.
pub type Result<T> = std::result::Result<T, CommonError>;
