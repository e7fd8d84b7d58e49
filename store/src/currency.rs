//! Display-currency override and rate cache, persisted together.

use parking_lot::RwLock;
use payconsole_common::Currency;
use payconsole_fx::{RateCacheEntry, RateStore};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{StoreError, StoreResult};
use crate::storage::{load_snapshot, save_snapshot, SharedStorage};

/// Storage key of the currency slot.
pub const CURRENCY_KEY: &str = "currency-store";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CurrencySnapshot {
    display_currency: Option<Currency>,
    #[serde(default)]
    rate_cache: RateCacheEntry,
}

/// Holds the display override and the cached rate table.
///
/// Also the [`RateStore`] the fetcher writes into, so every cache update
/// lands in storage.
pub struct CurrencyStore {
    storage: SharedStorage,
    state: RwLock<CurrencySnapshot>,
}

impl CurrencyStore {
    /// Open the store. A persisted override outside the supported display
    /// set is dropped.
    pub fn open(storage: SharedStorage) -> Self {
        let mut snapshot: CurrencySnapshot = load_snapshot(storage.as_ref(), CURRENCY_KEY).unwrap_or_default();
        if let Some(c) = snapshot.display_currency.take() {
            if c.is_supported_display() {
                snapshot.display_currency = Some(c);
            } else {
                warn!(display_currency = %c, "Dropping unsupported persisted display currency");
            }
        }
        Self {
            storage,
            state: RwLock::new(snapshot),
        }
    }

    /// The override, `None` meaning "use the country's native currency".
    pub fn display_currency(&self) -> Option<Currency> {
        self.state.read().display_currency.clone()
    }

    /// Set or drop the override.
    pub fn set_display_currency(&self, currency: Option<Currency>) -> StoreResult<()> {
        if let Some(c) = &currency {
            if !c.is_supported_display() {
                return Err(StoreError::UnsupportedCurrency(c.clone()));
            }
        }
        info!(
            display_currency = currency.as_ref().map(Currency::code).unwrap_or("native"),
            "Display currency changed"
        );
        self.state.write().display_currency = currency;
        self.persist()
    }

    /// Drop the override in memory only.
    pub(crate) fn reset_display_currency(&self) {
        self.state.write().display_currency = None;
    }

    pub(crate) fn persist(&self) -> StoreResult<()> {
        let snapshot = self.state.read().clone();
        save_snapshot(self.storage.as_ref(), CURRENCY_KEY, &snapshot)
    }
}

/// Every replace rewrites the `currency-store` slot synchronously. With
/// [`FileStorage`](crate::FileStorage) that is one small file write and
/// fsync on the calling task.
impl RateStore for CurrencyStore {
    fn snapshot(&self) -> RateCacheEntry {
        self.state.read().rate_cache.clone()
    }

    fn replace(&self, entry: RateCacheEntry) {
        self.state.write().rate_cache = entry;
        if let Err(e) = self.persist() {
            warn!(error = %e, "Failed to persist rate cache");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, Storage};
    use payconsole_common::RateTable;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    #[test]
    fn test_display_currency_validation() {
        let store = CurrencyStore::open(Arc::new(MemoryStorage::new()));

        store.set_display_currency(Some(Currency::cny())).unwrap();
        assert_eq!(store.display_currency(), Some(Currency::cny()));

        let result = store.set_display_currency(Some(Currency::new("XAU")));
        assert!(matches!(result, Err(StoreError::UnsupportedCurrency(_))));
        assert_eq!(store.display_currency(), Some(Currency::cny()));

        store.set_display_currency(None).unwrap();
        assert_eq!(store.display_currency(), None);
    }

    #[test]
    fn test_rate_cache_persists_with_override() {
        let storage: SharedStorage = Arc::new(MemoryStorage::new());
        let store = CurrencyStore::open(storage.clone());
        let table: RateTable = [(Currency::usd(), dec!(1)), (Currency::cny(), dec!(7.09))]
            .into_iter()
            .collect();
        let entry = RateCacheEntry::fetched_now(Currency::usd(), table);

        store.set_display_currency(Some(Currency::cny())).unwrap();
        store.replace(entry.clone());

        let reopened = CurrencyStore::open(storage);
        assert_eq!(reopened.display_currency(), Some(Currency::cny()));
        assert_eq!(reopened.snapshot(), entry);
    }

    #[test]
    fn test_unsupported_persisted_override_is_dropped() {
        let storage: SharedStorage = Arc::new(MemoryStorage::new());
        storage
            .save(CURRENCY_KEY, r#"{"displayCurrency":"XAU","rateCache":{"rates":{},"baseCurrency":"","lastFetchTime":null}}"#)
            .unwrap();

        let store = CurrencyStore::open(storage.clone());
        assert_eq!(store.display_currency(), None);

        storage.save(CURRENCY_KEY, r#"{"displayCurrency":"EUR"}"#).unwrap();
        assert_eq!(CurrencyStore::open(storage).display_currency(), Some(Currency::eur()));
    }
}
