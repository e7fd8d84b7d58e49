//! PayConsole Store
//!
//! Process-wide selection state for the admin console: the selected country,
//! the merchant filter, the display-currency override and the rate cache.
//! Each store persists its snapshot under its own storage key and is
//! rehydrated when opened. [`ConsoleState`] wires them to the rate fetcher
//! and hands out read snapshots to the amount converter.

pub mod country;
pub mod currency;
pub mod error;
pub mod merchant;
pub mod state;
pub mod storage;

pub use country::CountryStore;
pub use currency::CurrencyStore;
pub use error::{StoreError, StoreResult};
pub use merchant::MerchantStore;
pub use state::{ConsoleState, DisplayContext};
pub use storage::{FileStorage, MemoryStorage, SharedStorage, Storage};
