//! Country and merchant selections owned by the selection stores.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{CountryId, Currency, MerchantId};

/// A country record as returned by the admin backend's country list.
///
/// The selected country decides the natural currency of every reporting view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountrySelection {
    pub id: CountryId,
    pub country_name: String,
    /// ISO 3166 alpha-2 code.
    pub iso_code: String,
    #[serde(alias = "currency")]
    pub native_currency: Currency,
    pub created_at: DateTime<Utc>,
}

impl CountrySelection {
    pub fn new(
        id: impl Into<CountryId>,
        country_name: impl Into<String>,
        iso_code: impl Into<String>,
        native_currency: Currency,
    ) -> Self {
        Self {
            id: id.into(),
            country_name: country_name.into(),
            iso_code: iso_code.into().to_uppercase(),
            native_currency,
            created_at: Utc::now(),
        }
    }
}

/// Merchant filter narrowing reporting views to one merchant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantSelection {
    pub id: MerchantId,
    pub merchant_name: String,
}

impl MerchantSelection {
    pub fn new(id: impl Into<MerchantId>, merchant_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            merchant_name: merchant_name.into(),
        }
    }
}
