//! HTTP rate source backed by open.er-api.com.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use payconsole_common::{Currency, RateTable};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::{FxError, FxResult};
use crate::provider::RateSource;

/// Default endpoint; the base currency is appended as the last path segment.
pub const DEFAULT_BASE_URL: &str = "https://open.er-api.com/v6/latest";

const SUCCESS: &str = "success";

/// Rate source for the open.er-api.com "latest" endpoint.
pub struct OpenErApiSource {
    client: Client,
    base_url: String,
}

impl OpenErApiSource {
    /// Create a source against `base_url` with the given request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> FxResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FxError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url_for(&self, base: &Currency) -> String {
        format!("{}/{}", self.base_url, base.code())
    }
}

impl Default for OpenErApiSource {
    fn default() -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct LatestResponse {
    result: String,
    #[serde(default)]
    rates: Option<HashMap<String, f64>>,
    #[serde(rename = "error-type", default)]
    error_type: Option<String>,
}

/// Turn a response body into a rate table.
///
/// Entries that are not finite positive numbers are skipped.
pub(crate) fn parse_latest(base: &Currency, body: &str) -> FxResult<RateTable> {
    let response: LatestResponse =
        serde_json::from_str(body).map_err(|e| FxError::MalformedPayload(e.to_string()))?;

    if response.result != SUCCESS {
        return Err(FxError::Unsuccessful {
            base: base.clone(),
            result: response.error_type.unwrap_or(response.result),
        });
    }

    let rates = response
        .rates
        .ok_or_else(|| FxError::MalformedPayload("missing rates".to_string()))?;

    let table: RateTable = rates
        .into_iter()
        .filter(|(_, rate)| rate.is_finite())
        .filter_map(|(code, rate)| {
            Decimal::from_str(&rate.to_string())
                .ok()
                .map(|rate| (Currency::new(code), rate))
        })
        .collect();

    if table.is_empty() {
        return Err(FxError::EmptyRates(base.clone()));
    }

    Ok(table)
}

#[async_trait]
impl RateSource for OpenErApiSource {
    fn name(&self) -> &str {
        "open.er-api.com"
    }

    #[instrument(skip(self), fields(base = %base))]
    async fn fetch_latest(&self, base: &Currency) -> FxResult<RateTable> {
        let url = self.url_for(base);
        debug!(url = %url, "Requesting latest rates");

        let body = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_latest(base, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_success() {
        let body = r#"{"result":"success","base_code":"USD","rates":{"USD":1,"CNY":7.09,"JPY":151.2}}"#;

        let table = parse_latest(&Currency::usd(), body).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.get(&Currency::cny()), Some(dec!(7.09)));
        assert_eq!(table.get(&Currency::jpy()), Some(dec!(151.2)));
    }

    #[test]
    fn test_parse_error_result() {
        let body = r#"{"result":"error","error-type":"unsupported-code"}"#;

        let err = parse_latest(&Currency::new("ZZZ"), body).unwrap_err();

        match err {
            FxError::Unsuccessful { result, .. } => assert_eq!(result, "unsupported-code"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_malformed() {
        assert!(matches!(
            parse_latest(&Currency::usd(), "<html>"),
            Err(FxError::MalformedPayload(_))
        ));
        assert!(matches!(
            parse_latest(&Currency::usd(), r#"{"result":"success"}"#),
            Err(FxError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_parse_drops_unusable_rates() {
        let body = r#"{"result":"success","rates":{"USD":1,"XXX":0,"YYY":-2}}"#;
        let table = parse_latest(&Currency::usd(), body).unwrap();
        assert_eq!(table.len(), 1);

        let body = r#"{"result":"success","rates":{"XXX":0}}"#;
        assert!(matches!(
            parse_latest(&Currency::usd(), body),
            Err(FxError::EmptyRates(_))
        ));
    }

    #[test]
    fn test_url_for_trims_slash() {
        let source =
            OpenErApiSource::new("https://rates.example/v6/latest/", Duration::from_secs(5)).unwrap();
        assert_eq!(
            source.url_for(&Currency::cny()),
            "https://rates.example/v6/latest/CNY"
        );
    }
}
