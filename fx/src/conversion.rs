//! Amount conversion for display.

use payconsole_common::{Amount, Currency};

use crate::cache::RateCacheEntry;
use crate::format::format_amount;

/// How a converted amount should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Prefix the formatted number with the currency code.
    pub currency_label: bool,
    /// Produce grouped text; otherwise the raw product is returned.
    pub formatted: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            currency_label: true,
            formatted: true,
        }
    }
}

impl ConvertOptions {
    /// Raw numeric product, for chart axes and further arithmetic.
    pub fn raw() -> Self {
        Self {
            currency_label: false,
            formatted: false,
        }
    }

    /// Grouped number without the currency code.
    pub fn without_label() -> Self {
        Self {
            currency_label: false,
            formatted: true,
        }
    }
}

/// Convert `amount` into the display currency.
///
/// Returns the input unchanged when there is no display override, no rate
/// for it, the amount does not parse, or the product overflows.
pub fn convert(
    amount: Amount,
    display_currency: Option<&Currency>,
    rates: &RateCacheEntry,
    options: ConvertOptions,
) -> Amount {
    let Some(currency) = display_currency else {
        return amount;
    };
    let Some(rate) = rates.rate_for(currency) else {
        return amount;
    };
    let Some(value) = amount.to_decimal() else {
        return amount;
    };
    let Some(converted) = value.checked_mul(rate) else {
        return amount;
    };

    if !options.formatted {
        Amount::Number(converted)
    } else {
        Amount::Text(format_amount(converted, currency, options.currency_label))
    }
}
