//! Time utilities and constants for the currency display layer.

use chrono::{DateTime, Duration, Utc};

/// Timing constants.
pub mod constants {
    use super::Duration;

    /// How long a fetched rate table is reused (1 hour).
    pub fn rate_cache_window() -> Duration {
        Duration::hours(1)
    }

    /// Default upstream request timeout (10 seconds).
    pub fn rate_request_timeout() -> std::time::Duration {
        std::time::Duration::from_secs(10)
    }
}

/// A timestamp, always UTC.
pub type Timestamp = DateTime<Utc>;

/// Get the current timestamp.
pub fn now() -> Timestamp {
    Utc::now()
}

/// Whether `timestamp` lies less than `window` in the past.
///
/// Timestamps in the future count as fresh.
pub fn is_within(timestamp: Timestamp, window: Duration) -> bool {
    now().signed_duration_since(timestamp) < window
}
