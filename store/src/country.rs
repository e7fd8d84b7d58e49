//! Selected-country store.

use parking_lot::RwLock;
use payconsole_common::CountrySelection;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::StoreResult;
use crate::storage::{load_snapshot, save_snapshot, SharedStorage};

/// Storage key of the country slot.
pub const COUNTRY_KEY: &str = "country-store";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CountrySnapshot {
    selected: Option<CountrySelection>,
}

/// Holds the selected country.
///
/// Changing the country has knock-on effects on the other stores; those are
/// applied by [`ConsoleState`](crate::ConsoleState), not here.
pub struct CountryStore {
    storage: SharedStorage,
    selected: RwLock<Option<CountrySelection>>,
}

impl CountryStore {
    /// Open the store, rehydrating the last persisted selection.
    pub fn open(storage: SharedStorage) -> Self {
        let snapshot: CountrySnapshot = load_snapshot(storage.as_ref(), COUNTRY_KEY).unwrap_or_default();
        Self {
            storage,
            selected: RwLock::new(snapshot.selected),
        }
    }

    /// The selected country, if any.
    pub fn current(&self) -> Option<CountrySelection> {
        self.selected.read().clone()
    }

    pub fn is_selected(&self) -> bool {
        self.selected.read().is_some()
    }

    /// Replace the selection in memory only; see [`persist`](Self::persist).
    pub(crate) fn replace(&self, country: CountrySelection) {
        info!(
            country_id = %country.id,
            iso_code = %country.iso_code,
            currency = %country.native_currency,
            "Country selected"
        );
        *self.selected.write() = Some(country);
    }

    /// Write the current selection to its slot.
    pub(crate) fn persist(&self) -> StoreResult<()> {
        let snapshot = CountrySnapshot {
            selected: self.current(),
        };
        save_snapshot(self.storage.as_ref(), COUNTRY_KEY, &snapshot)
    }
}
