//! Currency display for storefront amounts.

use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use rusty_money::{Findable, FormattableCurrency, Locale};

/// Render `amount` in `currency_code` with zero fractional digits.
///
/// Catalog prices are whole-unit amounts, so cents are never shown.
/// Symbol, symbol placement, and digit grouping come from the ISO
/// currency registry; a code the registry does not know falls back to
/// `"{CODE} {amount}"` with comma grouping. Never panics, whatever the
/// code.
#[must_use]
pub fn format_money(amount: Decimal, currency_code: &str) -> String {
    let rounded = amount.round();

    let Some(currency) = Currency::find(currency_code) else {
        return format!("{currency_code} {}", group_digits(&rounded.to_string(), ','));
    };

    // Thousands separator by formatting locale; the exponent separator
    // never appears since nothing fractional is ever rendered.
    let separator = match currency.locale() {
        Locale::EnEu => '.',
        Locale::EnBy => ' ',
        _ => ',',
    };

    let digits = group_digits(&rounded.to_string(), separator);
    if currency.symbol_first() {
        format!("{}{digits}", currency.symbol())
    } else {
        format!("{digits} {}", currency.symbol())
    }
}

/// Insert `separator` every three digits from the right, preserving a
/// leading sign if present.
fn group_digits(digits: &str, separator: char) -> String {
    let (sign, unsigned) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };

    let chars: Vec<char> = unsigned.chars().collect();
    let mut grouped = String::with_capacity(unsigned.len() + unsigned.len() / 3 + 1);
    for (index, c) in chars.iter().enumerate() {
        let remaining = chars.len() - index;
        if index > 0 && remaining % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(*c);
    }

    format!("{sign}{grouped}")
}
