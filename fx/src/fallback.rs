//! Built-in rate table used when the rate service has never answered.

use payconsole_common::{Currency, RateTable, FALLBACK_BASE_CURRENCY};
use rust_decimal::Decimal;

use crate::cache::RateCacheEntry;

/// Approximate USD rates, one per supported display currency.
const FALLBACK_USD_RATES: &[(&str, i64, u32)] = &[
    ("USD", 1, 0),
    ("CNY", 709, 2),
    ("EUR", 92, 2),
    ("GBP", 79, 2),
    ("JPY", 15120, 2),
    ("HKD", 782, 2),
    ("SGD", 135, 2),
    ("THB", 3650, 2),
    ("MYR", 472, 2),
    ("IDR", 15800, 0),
    ("PHP", 5620, 2),
    ("VND", 24500, 0),
    ("INR", 8330, 2),
    ("KRW", 1340, 0),
    ("AUD", 152, 2),
    ("BRL", 497, 2),
    ("MXN", 1710, 2),
];

/// The fallback table, relative to [`FALLBACK_BASE_CURRENCY`].
pub fn fallback_rates() -> RateTable {
    FALLBACK_USD_RATES
        .iter()
        .map(|&(code, mantissa, scale)| (Currency::new(code), Decimal::new(mantissa, scale)))
        .collect()
}

/// A cache entry holding the fallback table.
///
/// The fetch time stays unset so the next trigger still asks the network.
pub fn fallback_entry() -> RateCacheEntry {
    RateCacheEntry {
        rates: fallback_rates(),
        base_currency: Currency::new(FALLBACK_BASE_CURRENCY),
        last_fetch_time: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use payconsole_common::SUPPORTED_DISPLAY_CURRENCIES;
    use rust_decimal_macros::dec;

    #[test]
    fn test_fallback_covers_supported_set() {
        let table = fallback_rates();
        for code in SUPPORTED_DISPLAY_CURRENCIES {
            assert!(table.contains(&Currency::new(*code)), "missing fallback rate for {code}");
        }
        assert_eq!(table.len(), SUPPORTED_DISPLAY_CURRENCIES.len());
    }

    #[test]
    fn test_fallback_values() {
        let table = fallback_rates();
        assert_eq!(table.get(&Currency::usd()), Some(dec!(1)));
        assert_eq!(table.get(&Currency::cny()), Some(dec!(7.09)));
        assert_eq!(table.get(&Currency::new("IDR")), Some(dec!(15800)));
    }

    #[test]
    fn test_fallback_entry_is_populated_but_unstamped() {
        let entry = fallback_entry();
        assert!(entry.is_populated());
        assert!(entry.last_fetch_time.is_none());
    }
}
