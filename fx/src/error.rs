//! FX error types.

use payconsole_common::Currency;
use thiserror::Error;

/// Errors a rate source can report.
///
/// The fetcher never hands these to its callers; they end up in the log.
#[derive(Debug, Error)]
pub enum FxError {
    /// Transport-level failure talking to the rate service.
    #[error("Rate request failed: {0}")]
    Transport(String),

    /// Service answered with something other than `"success"`.
    #[error("Rate service reported {result:?} for {base}")]
    Unsuccessful { base: Currency, result: String },

    /// Response body could not be understood.
    #[error("Malformed rate payload: {0}")]
    MalformedPayload(String),

    /// Service answered successfully but without usable rates.
    #[error("No rates returned for {0}")]
    EmptyRates(Currency),
}

impl From<reqwest::Error> for FxError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            FxError::MalformedPayload(e.to_string())
        } else {
            FxError::Transport(e.to_string())
        }
    }
}

/// Result type for FX operations.
pub type FxResult<T> = Result<T, FxError>;
