//! Throttled rate fetching.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Duration;
use parking_lot::Mutex;
use payconsole_common::{time::constants, Currency};
use tracing::{debug, info, instrument, warn};

use crate::cache::{RateCacheEntry, SharedRateStore};
use crate::fallback::fallback_entry;
use crate::provider::RateSource;

/// Configuration for the rate fetcher.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// How long a fetched table is reused for the same base.
    pub cache_window: Duration,
    /// Base used when the caller has none.
    pub fallback_base: Currency,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            cache_window: constants::rate_cache_window(),
            fallback_base: Currency::fallback_base(),
        }
    }
}

/// What a call to [`RateFetcher::ensure_rates`] ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Cached table was fresh; no request was made.
    CacheHit,
    /// A new table was fetched and stored.
    Refreshed,
    /// The fetch succeeded but a newer one had already been applied.
    Superseded,
    /// The fetch failed and the cache was empty, so the fallback table went in.
    FallbackInstalled,
    /// The fetch failed and the existing table was kept.
    KeptExisting,
}

/// Keeps the rate cache reasonably fresh without over-querying the source.
pub struct RateFetcher {
    source: Arc<dyn RateSource>,
    store: SharedRateStore,
    config: FetcherConfig,
    /// Ticket of the most recently issued request.
    issued: AtomicU64,
    /// Ticket of the last request whose result was written. Held while writing.
    applied: Mutex<u64>,
}

impl RateFetcher {
    /// Create a fetcher with default configuration.
    pub fn new(source: Arc<dyn RateSource>, store: SharedRateStore) -> Self {
        Self::with_config(source, store, FetcherConfig::default())
    }

    /// Create a fetcher with custom configuration.
    pub fn with_config(source: Arc<dyn RateSource>, store: SharedRateStore, config: FetcherConfig) -> Self {
        Self {
            source,
            store,
            config,
            issued: AtomicU64::new(0),
            applied: Mutex::new(0),
        }
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    /// Copy of the current cache entry.
    pub fn snapshot(&self) -> RateCacheEntry {
        self.store.snapshot()
    }

    /// Like [`ensure_rates`](Self::ensure_rates), using the configured
    /// fallback base when `base` is `None`.
    pub async fn ensure_rates_or_default(&self, base: Option<&Currency>) -> FetchOutcome {
        let base = base.unwrap_or(&self.config.fallback_base).clone();
        self.ensure_rates(&base).await
    }

    /// Make sure the cache holds rates for `base`.
    ///
    /// Returns without touching the network when the cached table has the
    /// same base and is younger than the cache window. Failures are logged
    /// and never surface to the caller.
    #[instrument(skip(self), fields(base = %base))]
    pub async fn ensure_rates(&self, base: &Currency) -> FetchOutcome {
        let base = if base.is_empty() {
            warn!("Empty base currency requested, using fallback base");
            self.config.fallback_base.clone()
        } else {
            base.clone()
        };

        if self.store.snapshot().is_fresh_for(&base, self.config.cache_window) {
            debug!("Using cached rates");
            return FetchOutcome::CacheHit;
        }

        let ticket = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(ticket, source = self.source.name(), "Fetching rates");

        match self.source.fetch_latest(&base).await {
            Ok(rates) => {
                let mut applied = self.applied.lock();
                if ticket < *applied {
                    info!(ticket, applied = *applied, "Discarding superseded rate response");
                    return FetchOutcome::Superseded;
                }

                let count = rates.len();
                // Stores may write through to disk here. That stays on this
                // task and under the lock so writes land in ticket order.
                self.store.replace(RateCacheEntry::fetched_now(base, rates));
                *applied = ticket;

                info!(ticket, rates = count, "Rates refreshed");
                FetchOutcome::Refreshed
            }
            Err(e) => {
                let _applied = self.applied.lock();
                if self.store.snapshot().is_populated() {
                    warn!(error = %e, "Rate fetch failed, keeping existing rates");
                    FetchOutcome::KeptExisting
                } else {
                    warn!(error = %e, "Rate fetch failed, installing fallback rates");
                    self.store.replace(fallback_entry());
                    FetchOutcome::FallbackInstalled
                }
            }
        }
    }

    /// Forget every cached rate.
    pub fn clear(&self) {
        let _applied = self.applied.lock();
        self.store.replace(RateCacheEntry::empty());
        info!("Rate cache cleared");
    }
}
