// src/domain/pricing.rs

use serde::Serialize;

/// Fee breakdown for one application. All amounts in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub subtotal: i64,
    pub discount: i64,
    pub taxable: i64,
    pub tax: i64,
    pub total: i64,
}

/// Rounds half-up to whole cents. Saturates at `i64::MAX`.
fn percent_of(amount: i64, percent: u32) -> i64 {
    let cents = (i128::from(amount) * i128::from(percent) + 50) / 100;
    i64::try_from(cents).unwrap_or(i64::MAX)
}

/// `percent_off` is the promo discount (0 when there's no promo), capped at 100.
/// Tax is a flat percentage of what's left after the discount.
/// Amounts too large for an `i64` saturate instead of wrapping.
pub fn quote(fee_per_traveller: i64, travellers: u32, percent_off: u32, tax_percent: u32) -> Quote {
    let subtotal = fee_per_traveller.max(0).saturating_mul(i64::from(travellers));
    let discount = percent_of(subtotal, percent_off.min(100));
    let taxable = subtotal - discount;
    let tax = percent_of(taxable, tax_percent);

    Quote {
        subtotal,
        discount,
        taxable,
        tax,
        total: taxable.saturating_add(tax),
    }
}

/// `12345` -> `123.45`
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

/// Parses a form amount like `120`, `120.5` or `120.50` into cents.
pub fn parse_amount(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    let (whole, frac) = match raw.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (raw, ""),
    };

    if whole.is_empty() || frac.len() > 2 || !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let whole: i64 = whole.parse().ok()?;
    let frac: i64 = match frac.len() {
        0 => 0,
        1 => frac.parse::<i64>().ok()? * 10,
        _ => frac.parse().ok()?,
    };

    whole.checked_mul(100)?.checked_add(frac)
}
