//! The console state container.

use std::sync::Arc;

use payconsole_common::{Amount, CountrySelection, Currency, MerchantSelection};
use payconsole_fx::{convert, ConvertOptions, FetchOutcome, FetcherConfig, RateCacheEntry, RateFetcher, RateSource};
use tracing::{info, instrument, warn};

use crate::country::{CountryStore, COUNTRY_KEY};
use crate::currency::{CurrencyStore, CURRENCY_KEY};
use crate::error::{StoreError, StoreResult};
use crate::merchant::{MerchantStore, MERCHANT_KEY};
use crate::storage::SharedStorage;

/// What the amount converter reads, captured at one instant.
#[derive(Debug, Clone)]
pub struct DisplayContext {
    pub display_currency: Option<Currency>,
    pub rates: RateCacheEntry,
}

impl DisplayContext {
    pub fn convert(&self, amount: impl Into<Amount>, options: ConvertOptions) -> Amount {
        convert(amount.into(), self.display_currency.as_ref(), &self.rates, options)
    }
}

/// Owns the selection stores and the rate fetcher.
///
/// Passed explicitly to whatever renders monetary values; readers only get
/// snapshots back.
pub struct ConsoleState {
    countries: CountryStore,
    merchants: MerchantStore,
    currency: Arc<CurrencyStore>,
    fetcher: RateFetcher,
}

impl ConsoleState {
    /// Open every store on `storage`, rehydrating persisted snapshots.
    pub fn open(storage: SharedStorage, source: Arc<dyn RateSource>, config: FetcherConfig) -> Self {
        let currency = Arc::new(CurrencyStore::open(storage.clone()));
        let fetcher = RateFetcher::with_config(source, currency.clone(), config);

        Self {
            countries: CountryStore::open(storage.clone()),
            merchants: MerchantStore::open(storage),
            currency,
            fetcher,
        }
    }

    pub fn selected_country(&self) -> Option<CountrySelection> {
        self.countries.current()
    }

    pub fn selected_merchant(&self) -> Option<MerchantSelection> {
        self.merchants.current()
    }

    pub fn display_currency(&self) -> Option<Currency> {
        self.currency.display_currency()
    }

    /// Override if set, else the selected country's native currency.
    pub fn effective_currency(&self) -> Option<Currency> {
        self.display_currency()
            .or_else(|| self.selected_country().map(|c| c.native_currency))
    }

    /// Copy of the rate cache.
    pub fn rates(&self) -> RateCacheEntry {
        self.fetcher.snapshot()
    }

    /// Select a country.
    ///
    /// Always drops the display override and the merchant filter, even when
    /// the same country is picked again, then makes sure rates for the
    /// country's native currency are loaded.
    ///
    /// All three selections change in memory before anything is written, so a
    /// failing slot never leaves the old override or merchant in place. Every
    /// slot is still attempted; the first write error is returned after the
    /// rates have been ensured.
    #[instrument(skip(self, country), fields(country_id = %country.id))]
    pub async fn select_country(&self, country: CountrySelection) -> StoreResult<FetchOutcome> {
        let base = country.native_currency.clone();

        self.countries.replace(country);
        self.currency.reset_display_currency();
        self.merchants.reset();

        let writes = [
            (COUNTRY_KEY, self.countries.persist()),
            (CURRENCY_KEY, self.currency.persist()),
            (MERCHANT_KEY, self.merchants.persist()),
        ];
        let mut first_error = None;
        for (key, result) in writes {
            if let Err(e) = result {
                warn!(key, error = %e, "Failed to persist country change");
                first_error.get_or_insert(e);
            }
        }

        let outcome = self.fetcher.ensure_rates(&base).await;
        match first_error {
            Some(e) => Err(e),
            None => Ok(outcome),
        }
    }

    /// Apply a freshly fetched country list.
    ///
    /// Selects the first entry only when nothing is selected yet. Returns the
    /// country selected by this call.
    pub async fn apply_country_list(&self, countries: &[CountrySelection]) -> StoreResult<Option<CountrySelection>> {
        if self.countries.is_selected() {
            return Ok(None);
        }
        let Some(first) = countries.first() else {
            return Ok(None);
        };

        info!(country_id = %first.id, "Defaulting to first country in list");
        self.select_country(first.clone()).await?;
        Ok(Some(first.clone()))
    }

    pub fn select_merchant(&self, merchant: MerchantSelection) -> StoreResult<()> {
        self.merchants.set(merchant)
    }

    pub fn clear_merchant(&self) -> StoreResult<()> {
        self.merchants.clear()
    }

    /// Set or drop the display override. Needs a selected country.
    pub fn set_display_currency(&self, currency: Option<Currency>) -> StoreResult<()> {
        if !self.countries.is_selected() {
            return Err(StoreError::NoCountrySelected);
        }
        self.currency.set_display_currency(currency)
    }

    /// Make sure rates relative to `base` are cached.
    pub async fn ensure_rates(&self, base: &Currency) -> FetchOutcome {
        self.fetcher.ensure_rates(base).await
    }

    /// Make sure rates relative to the selected country's currency are
    /// cached, or the fallback base when no country is selected.
    pub async fn ensure_rates_for_selection(&self) -> FetchOutcome {
        let base = self.selected_country().map(|c| c.native_currency);
        self.fetcher.ensure_rates_or_default(base.as_ref()).await
    }

    pub fn clear_rates(&self) {
        self.fetcher.clear();
    }

    pub fn display_context(&self) -> DisplayContext {
        DisplayContext {
            display_currency: self.display_currency(),
            rates: self.rates(),
        }
    }

    /// Convert with the default options (labelled, formatted).
    pub fn convert(&self, amount: impl Into<Amount>) -> Amount {
        self.convert_with(amount, ConvertOptions::default())
    }

    pub fn convert_with(&self, amount: impl Into<Amount>, options: ConvertOptions) -> Amount {
        self.display_context().convert(amount, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStorage, MemoryStorage, Storage};
    use payconsole_common::RateTable;
    use payconsole_fx::provider::MockRateSource;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Memory storage whose writes to one key fail while `failing` is set.
    struct FailingSlot {
        inner: MemoryStorage,
        key: &'static str,
        failing: AtomicBool,
    }

    impl FailingSlot {
        fn new(key: &'static str) -> Self {
            Self {
                inner: MemoryStorage::new(),
                key,
                failing: AtomicBool::new(false),
            }
        }
    }

    impl Storage for FailingSlot {
        fn load(&self, key: &str) -> StoreResult<Option<String>> {
            self.inner.load(key)
        }

        fn save(&self, key: &str, value: &str) -> StoreResult<()> {
            if key == self.key && self.failing.load(Ordering::SeqCst) {
                return Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full").into());
            }
            self.inner.save(key, value)
        }

        fn remove(&self, key: &str) -> StoreResult<()> {
            self.inner.remove(key)
        }
    }

    fn source() -> Arc<MockRateSource> {
        let source = Arc::new(MockRateSource::new("test"));
        let usd: RateTable = [(Currency::usd(), dec!(1)), (Currency::cny(), dec!(7.09))]
            .into_iter()
            .collect();
        let cny: RateTable = [(Currency::cny(), dec!(1)), (Currency::usd(), dec!(0.141))]
            .into_iter()
            .collect();
        source.set_rates(Currency::usd(), usd);
        source.set_rates(Currency::cny(), cny);
        source
    }

    fn usa() -> CountrySelection {
        CountrySelection::new("1", "United States", "US", Currency::usd())
    }

    fn china() -> CountrySelection {
        CountrySelection::new("86", "China", "CN", Currency::cny())
    }

    fn open(storage: SharedStorage, source: Arc<MockRateSource>) -> ConsoleState {
        ConsoleState::open(storage, source, FetcherConfig::default())
    }

    #[tokio::test]
    async fn test_country_change_resets_override_and_merchant() {
        let state = open(Arc::new(MemoryStorage::new()), source());
        state.select_country(usa()).await.unwrap();
        state.set_display_currency(Some(Currency::cny())).unwrap();
        state.select_merchant(MerchantSelection::new("M_1", "Acme")).unwrap();

        state.select_country(china()).await.unwrap();

        assert_eq!(state.display_currency(), None);
        assert_eq!(state.selected_merchant(), None);
        assert_eq!(state.effective_currency(), Some(Currency::cny()));
    }

    #[tokio::test]
    async fn test_country_change_resets_even_when_a_write_fails() {
        let storage = Arc::new(FailingSlot::new(CURRENCY_KEY));
        let state = open(storage.clone(), source());
        state.select_country(usa()).await.unwrap();
        state.set_display_currency(Some(Currency::cny())).unwrap();
        state.select_merchant(MerchantSelection::new("M_1", "Acme")).unwrap();

        storage.failing.store(true, Ordering::SeqCst);
        let result = state.select_country(china()).await;

        assert!(matches!(result, Err(StoreError::Io(_))));
        assert_eq!(state.selected_country().map(|c| c.id), Some(china().id));
        assert_eq!(state.display_currency(), None);
        assert_eq!(state.selected_merchant(), None);

        // the slots that could be written were
        storage.failing.store(false, Ordering::SeqCst);
        let reopened = open(storage, source());
        assert_eq!(reopened.selected_country().map(|c| c.id), Some(china().id));
        assert_eq!(reopened.selected_merchant(), None);
    }

    #[tokio::test]
    async fn test_reselecting_same_country_also_resets() {
        let state = open(Arc::new(MemoryStorage::new()), source());
        state.select_country(usa()).await.unwrap();
        state.set_display_currency(Some(Currency::cny())).unwrap();
        state.select_merchant(MerchantSelection::new("M_1", "Acme")).unwrap();

        state.select_country(usa()).await.unwrap();

        assert_eq!(state.display_currency(), None);
        assert_eq!(state.selected_merchant(), None);
    }

    #[tokio::test]
    async fn test_country_selection_fetches_native_rates() {
        let source = source();
        let state = open(Arc::new(MemoryStorage::new()), source.clone());

        let outcome = state.select_country(china()).await.unwrap();

        assert_eq!(outcome, FetchOutcome::Refreshed);
        assert_eq!(state.rates().base_currency, Currency::cny());
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_override_requires_country() {
        let state = open(Arc::new(MemoryStorage::new()), source());

        let result = state.set_display_currency(Some(Currency::cny()));

        assert!(matches!(result, Err(StoreError::NoCountrySelected)));
    }

    #[tokio::test]
    async fn test_convert_through_state() {
        let state = open(Arc::new(MemoryStorage::new()), source());
        state.select_country(usa()).await.unwrap();

        assert_eq!(state.convert(100), Amount::from(100));

        state.set_display_currency(Some(Currency::cny())).unwrap();

        assert_eq!(state.convert(100), Amount::Text("CNY 709".to_string()));
        assert_eq!(state.convert("abc"), Amount::from("abc"));
        assert_eq!(
            state.convert_with(100, ConvertOptions::raw()),
            Amount::Number(dec!(709))
        );
    }

    #[tokio::test]
    async fn test_apply_country_list_defaults_once() {
        let state = open(Arc::new(MemoryStorage::new()), source());

        let picked = state.apply_country_list(&[china(), usa()]).await.unwrap();
        assert_eq!(picked.map(|c| c.id), Some(china().id));

        let picked = state.apply_country_list(&[usa()]).await.unwrap();
        assert!(picked.is_none());
        assert_eq!(state.selected_country().map(|c| c.id), Some(china().id));

        let empty = open(Arc::new(MemoryStorage::new()), source());
        assert!(empty.apply_country_list(&[]).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ensure_rates_for_selection_defaults_to_fallback_base() {
        let state = open(Arc::new(MemoryStorage::new()), source());

        state.ensure_rates_for_selection().await;

        assert_eq!(state.rates().base_currency, Currency::usd());
    }

    #[tokio::test]
    async fn test_restart_rehydrates_everything() {
        let dir = tempfile::tempdir().unwrap();
        let storage: SharedStorage = Arc::new(FileStorage::open(dir.path()).unwrap());

        let country = usa();
        let state = open(storage.clone(), source());
        state.select_country(country.clone()).await.unwrap();
        state.set_display_currency(Some(Currency::cny())).unwrap();
        state.select_merchant(MerchantSelection::new("M_7", "Corner Store")).unwrap();
        let rates = state.rates();
        drop(state);

        let storage: SharedStorage = Arc::new(FileStorage::open(dir.path()).unwrap());
        let source = source();
        let restored = open(storage, source.clone());

        assert_eq!(restored.selected_country(), Some(country));
        assert_eq!(restored.display_currency(), Some(Currency::cny()));
        assert_eq!(restored.selected_merchant().map(|m| m.merchant_name), Some("Corner Store".to_string()));
        assert_eq!(restored.rates(), rates);

        restored.ensure_rates(&Currency::usd()).await;
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn test_clear_rates() {
        let state = open(Arc::new(MemoryStorage::new()), source());
        state.ensure_rates(&Currency::usd()).await;

        state.clear_rates();

        assert!(!state.rates().is_populated());
    }
}
