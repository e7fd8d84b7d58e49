//! The cached rate table and the store seam it lives behind.

use chrono::Duration;
use parking_lot::RwLock;
use payconsole_common::{time, Currency, RateTable, Timestamp};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// The last fetched rate table.
///
/// `last_fetch_time == None` together with an empty base means the cache has
/// never been populated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateCacheEntry {
    pub rates: RateTable,
    pub base_currency: Currency,
    pub last_fetch_time: Option<Timestamp>,
}

impl RateCacheEntry {
    /// An entry stamped with the current time.
    pub fn fetched_now(base_currency: Currency, rates: RateTable) -> Self {
        Self {
            rates,
            base_currency,
            last_fetch_time: Some(time::now()),
        }
    }

    /// An empty, never-fetched entry.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether any table was ever recorded, fetched or fallback.
    pub fn is_populated(&self) -> bool {
        !self.base_currency.is_empty() && !self.rates.is_empty()
    }

    /// Cache hit test: same base and fetched less than `window` ago.
    pub fn is_fresh_for(&self, base: &Currency, window: Duration) -> bool {
        match self.last_fetch_time {
            Some(fetched_at) if self.base_currency == *base => {
                let fresh = time::is_within(fetched_at, window);
                debug!(base = %base, fetched_at = %fetched_at, fresh, "Checked cached rates");
                fresh
            }
            _ => false,
        }
    }

    /// Rate for `currency`, if the table has one.
    pub fn rate_for(&self, currency: &Currency) -> Option<rust_decimal::Decimal> {
        self.rates.get(currency)
    }
}

/// Where the fetcher keeps its rate cache.
///
/// Implementations hand out clones and swap the whole entry on write, so a
/// reader never observes a half-updated table.
pub trait RateStore: Send + Sync {
    /// Copy of the current entry.
    fn snapshot(&self) -> RateCacheEntry;

    /// Replace the entry wholesale.
    fn replace(&self, entry: RateCacheEntry);
}

/// Shared rate store handle.
pub type SharedRateStore = Arc<dyn RateStore>;

/// Rate store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct InMemoryRateStore {
    entry: RwLock<RateCacheEntry>,
}

impl InMemoryRateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a previously captured entry.
    pub fn with_entry(entry: RateCacheEntry) -> Self {
        Self {
            entry: RwLock::new(entry),
        }
    }
}

impl RateStore for InMemoryRateStore {
    fn snapshot(&self) -> RateCacheEntry {
        self.entry.read().clone()
    }

    fn replace(&self, entry: RateCacheEntry) {
        *self.entry.write() = entry;
    }
}
