//! Merchant filter store.

use parking_lot::RwLock;
use payconsole_common::MerchantSelection;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::storage::{load_snapshot, save_snapshot, SharedStorage};

/// Storage key of the merchant slot.
pub const MERCHANT_KEY: &str = "merchant-store";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct MerchantSnapshot {
    selected: Option<MerchantSelection>,
}

/// Optional merchant narrowing the reporting views.
pub struct MerchantStore {
    storage: SharedStorage,
    selected: RwLock<Option<MerchantSelection>>,
}

impl MerchantStore {
    pub fn open(storage: SharedStorage) -> Self {
        let snapshot: MerchantSnapshot = load_snapshot(storage.as_ref(), MERCHANT_KEY).unwrap_or_default();
        Self {
            storage,
            selected: RwLock::new(snapshot.selected),
        }
    }

    pub fn current(&self) -> Option<MerchantSelection> {
        self.selected.read().clone()
    }

    pub fn set(&self, merchant: MerchantSelection) -> StoreResult<()> {
        if !merchant.id.is_valid() {
            return Err(StoreError::InvalidMerchant(merchant.id.to_string()));
        }
        debug!(merchant_id = %merchant.id, "Merchant selected");
        *self.selected.write() = Some(merchant);
        self.persist()
    }

    pub fn clear(&self) -> StoreResult<()> {
        self.reset();
        self.persist()
    }

    /// Drop the filter in memory only.
    pub(crate) fn reset(&self) {
        *self.selected.write() = None;
    }

    pub(crate) fn persist(&self) -> StoreResult<()> {
        let snapshot = MerchantSnapshot {
            selected: self.current(),
        };
        save_snapshot(self.storage.as_ref(), MERCHANT_KEY, &snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use std::sync::Arc;

    #[test]
    fn test_set_clear_rehydrate() {
        let storage: SharedStorage = Arc::new(MemoryStorage::new());
        let store = MerchantStore::open(storage.clone());
        let merchant = MerchantSelection::new("M_10023", "Acme Shop");

        store.set(merchant.clone()).unwrap();
        assert_eq!(MerchantStore::open(storage.clone()).current(), Some(merchant));

        store.clear().unwrap();
        assert_eq!(MerchantStore::open(storage).current(), None);
    }

    #[test]
    fn test_rejects_invalid_id() {
        let store = MerchantStore::open(Arc::new(MemoryStorage::new()));

        let result = store.set(MerchantSelection::new("", "Nameless"));

        assert!(matches!(result, Err(StoreError::InvalidMerchant(_))));
        assert!(store.current().is_none());
    }
}
