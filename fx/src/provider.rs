//! Rate source trait and the test double.

use async_trait::async_trait;
use payconsole_common::{Currency, RateTable};

use crate::error::FxResult;

/// Something that can produce a full rate table for a base currency.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Get the source name.
    fn name(&self) -> &str;

    /// Fetch every rate relative to `base`.
    async fn fetch_latest(&self, base: &Currency) -> FxResult<RateTable>;
}

/// Mock rate source for testing.
#[cfg(any(test, feature = "test-utils"))]
pub use mock::MockRateSource;

#[cfg(any(test, feature = "test-utils"))]
mod mock {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use parking_lot::Mutex;
    use payconsole_common::{Currency, RateTable};

    use super::RateSource;
    use crate::error::{FxError, FxResult};

    /// In-process rate source that counts how often it was asked.
    pub struct MockRateSource {
        name: String,
        tables: Mutex<HashMap<Currency, RateTable>>,
        delays: Mutex<HashMap<Currency, Duration>>,
        failing: AtomicBool,
        calls: AtomicUsize,
    }

    impl MockRateSource {
        /// Create a new mock source.
        pub fn new(name: impl Into<String>) -> Self {
            Self {
                name: name.into(),
                tables: Mutex::new(HashMap::new()),
                delays: Mutex::new(HashMap::new()),
                failing: AtomicBool::new(false),
                calls: AtomicUsize::new(0),
            }
        }

        /// Set the table returned for `base`.
        pub fn set_rates(&self, base: Currency, table: RateTable) {
            self.tables.lock().insert(base, table);
        }

        /// Delay responses for `base`.
        pub fn set_delay(&self, base: Currency, delay: Duration) {
            self.delays.lock().insert(base, delay);
        }

        /// Make every request fail until switched back.
        pub fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        /// Number of fetches issued so far.
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RateSource for MockRateSource {
        fn name(&self) -> &str {
            &self.name
        }

        async fn fetch_latest(&self, base: &Currency) -> FxResult<RateTable> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            let delay = self.delays.lock().get(base).copied();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }

            if self.failing.load(Ordering::SeqCst) {
                return Err(FxError::Transport("mock source offline".to_string()));
            }

            self.tables
                .lock()
                .get(base)
                .cloned()
                .ok_or_else(|| FxError::Unsuccessful {
                    base: base.clone(),
                    result: "error".to_string(),
                })
        }
    }
}
