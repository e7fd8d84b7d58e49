//! Display formatting for converted amounts.

use payconsole_common::Currency;
use rust_decimal::{Decimal, RoundingStrategy};

/// Format `value` with `,` thousands separators and `.` as decimal point.
///
/// Rounds half away from zero to at most `max_fraction_digits` and drops
/// trailing fractional zeros.
pub fn group_digits(value: Decimal, max_fraction_digits: u32) -> String {
    let rounded = value.round_dp_with_strategy(max_fraction_digits, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        return "0".to_string();
    }

    let text = rounded.normalize().to_string();
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.as_str()),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };

    let mut out = String::with_capacity(text.len() + int_part.len() / 3 + 1);
    if negative {
        out.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Format an amount in `currency`, optionally prefixed with its code.
pub fn format_amount(value: Decimal, currency: &Currency, with_label: bool) -> String {
    let grouped = group_digits(value, currency.decimal_places());
    if with_label {
        format!("{} {}", currency.code(), grouped)
    } else {
        grouped
    }
}
