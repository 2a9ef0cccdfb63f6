//! Display formatting for prices.
//!
//! These helpers only affect rendered strings; the store keeps raw `f64`
//! values end to end.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Rendered in place of values the store does not have yet.
pub const PLACEHOLDER: &str = "—";

fn group_int_digits(int_part: &str) -> String {
    let mut out = String::with_capacity(int_part.len() + int_part.len() / 3);
    let len = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        out.push(ch);
        let remaining = len.saturating_sub(i + 1);
        if remaining > 0 && remaining % 3 == 0 {
            out.push(',');
        }
    }
    out
}

fn group_number_string(s: &str) -> String {
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };
    let grouped = group_int_digits(int_part);
    match frac_part {
        Some(f) if !f.is_empty() => format!("{sign}{grouped}.{f}"),
        _ => format!("{sign}{grouped}"),
    }
}

fn format_grouped(value: f64, decimals: u32) -> String {
    let Some(decimal) = Decimal::from_f64(value) else {
        return PLACEHOLDER.to_string();
    };
    let rounded = decimal.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    group_number_string(&rounded.normalize().to_string())
}

/// USD amount: grouped, at most two decimal places.
pub fn format_usd(value: f64) -> String {
    format_grouped(value, 2)
}

/// Toman amount: grouped whole number.
pub fn format_toman(value: f64) -> String {
    format_grouped(value, 0)
}

/// 24-hour change: signed, two decimal places, percent suffix.
pub fn format_change(value: Option<f64>) -> String {
    match value {
        Some(change) => {
            let sign = if change >= 0.0 { "+" } else { "" };
            format!("{sign}{change:.2}%")
        }
        None => PLACEHOLDER.to_string(),
    }
}
