//! Store error types.

use payconsole_common::Currency;
use thiserror::Error;

/// Errors raised by the selection stores and their storage backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing a storage slot failed.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A snapshot could not be encoded.
    #[error("Snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Storage keys are limited to lowercase letters, digits, `-` and `_`.
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    /// Currency is not in the supported display set.
    #[error("Unsupported display currency: {0}")]
    UnsupportedCurrency(Currency),

    /// Operation needs a selected country.
    #[error("No country selected")]
    NoCountrySelected,

    /// Merchant id failed validation.
    #[error("Invalid merchant id: {0:?}")]
    InvalidMerchant(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
