//! PayConsole FX
//!
//! Rate cache, throttled rate fetching and amount conversion for the admin
//! console's monetary columns.
//!
//! # Features
//!
//! - One cached rate table per base currency, reused within a cache window
//! - Pluggable rate sources, with an HTTP source for open.er-api.com
//! - Hardcoded fallback table so conversion keeps working offline
//! - Fail-soft amount conversion and en-US digit grouping
//!
//! # Example
//!
//! ```rust,ignore
//! use payconsole_fx::{convert, ConvertOptions, InMemoryRateStore, OpenErApiSource, RateFetcher};
//!
//! let store = Arc::new(InMemoryRateStore::new());
//! let fetcher = RateFetcher::new(Arc::new(OpenErApiSource::default()), store.clone());
//! fetcher.ensure_rates(&Currency::usd()).await;
//!
//! let shown = convert(Amount::from(100), Some(&Currency::cny()), &store.snapshot(), ConvertOptions::default());
//! ```

pub mod cache;
pub mod conversion;
pub mod error;
pub mod fallback;
pub mod fetcher;
pub mod format;
pub mod http;
pub mod provider;

pub use cache::{InMemoryRateStore, RateCacheEntry, RateStore, SharedRateStore};
pub use conversion::{convert, ConvertOptions};
pub use error::{FxError, FxResult};
pub use fallback::fallback_rates;
pub use fetcher::{FetchOutcome, FetcherConfig, RateFetcher};
pub use format::{format_amount, group_digits};
pub use http::OpenErApiSource;
pub use provider::RateSource;
