//! Console configuration.

use std::path::PathBuf;
use std::time::Duration;

use payconsole_common::time::constants;
use payconsole_common::Currency;
use payconsole_fx::http::DEFAULT_BASE_URL;
use payconsole_fx::FetcherConfig;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Some(LogFormat::Pretty),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

/// Main console configuration.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Directory holding the persisted store snapshots.
    pub storage_dir: PathBuf,
    /// Rate endpoint; the base currency is appended as a path segment.
    pub rate_api_url: String,
    /// How long fetched rates are reused.
    pub cache_window: Duration,
    /// Upstream request timeout.
    pub request_timeout: Duration,
    /// Base currency when no country is selected.
    pub fallback_currency: String,
    /// Log level.
    pub log_level: String,
    /// Log format.
    pub log_format: LogFormat,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from(".payconsole"),
            rate_api_url: DEFAULT_BASE_URL.to_string(),
            cache_window: Duration::from_secs(3600),
            request_timeout: constants::rate_request_timeout(),
            fallback_currency: "USD".to_string(),
            log_level: "warn".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl ConsoleConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, starting from the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(dir) = lookup("PAYCONSOLE_STORAGE_DIR") {
            config.storage_dir = PathBuf::from(dir);
        }

        if let Some(url) = lookup("PAYCONSOLE_RATE_API_URL") {
            config.rate_api_url = url;
        }

        if let Some(secs) = lookup("PAYCONSOLE_CACHE_WINDOW_SECS") {
            if let Ok(secs) = secs.parse() {
                config.cache_window = Duration::from_secs(secs);
            }
        }

        if let Some(secs) = lookup("PAYCONSOLE_REQUEST_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse() {
                config.request_timeout = Duration::from_secs(secs);
            }
        }

        if let Some(code) = lookup("PAYCONSOLE_FALLBACK_CURRENCY") {
            config.fallback_currency = code;
        }

        if let Some(level) = lookup("LOG_LEVEL") {
            config.log_level = level;
        }

        if let Some(format) = lookup("LOG_FORMAT").as_deref().and_then(LogFormat::parse) {
            config.log_format = format;
        }

        config
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.rate_api_url.is_empty() {
            return Err("Rate API URL cannot be empty".to_string());
        }

        if self.request_timeout.is_zero() {
            return Err("Request timeout cannot be zero".to_string());
        }

        if let Err(e) = Currency::parse(&self.fallback_currency) {
            return Err(e.to_string());
        }

        Ok(())
    }

    /// Fetcher settings derived from this configuration.
    pub fn fetcher_config(&self) -> FetcherConfig {
        FetcherConfig {
            cache_window: chrono::Duration::from_std(self.cache_window)
                .unwrap_or_else(|_| constants::rate_cache_window()),
            fallback_base: Currency::new(&self.fallback_currency),
        }
    }
}
