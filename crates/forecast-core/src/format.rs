//! Locale-aware number formatting

use crate::models::Locale;

/// Fixed decimals with thousands grouping; `None` renders as `-`
///
/// `format_number(1234.5, 2, Locale::German)` gives `1.234,50`.
pub fn format_number(value: impl Into<Option<f64>>, decimals: usize, locale: Locale) -> String {
    let Some(value) = value.into() else {
        return "-".to_string();
    };
    if !value.is_finite() {
        return "-".to_string();
    }

    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut out = String::with_capacity(fixed.len() + fixed.len() / 3 + 1);
    // No sign when the value rounds to zero
    if value < 0.0 && fixed.bytes().any(|b| matches!(b, b'1'..=b'9')) {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part, locale.thousands_separator()));
    if let Some(frac) = frac_part {
        out.push(locale.decimal_separator());
        out.push_str(frac);
    }
    out
}

/// Euro amount with 2 decimals
pub fn format_currency(value: impl Into<Option<f64>>, locale: Locale) -> String {
    let Some(value) = value.into() else {
        return "-".to_string();
    };
    let number = format_number(value, 2, locale);
    match locale {
        Locale::German => format!("{number} €"),
        Locale::English => match number.strip_prefix('-') {
            Some(abs) => format!("-€{abs}"),
            None => format!("€{number}"),
        },
    }
}

fn group_thousands(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}
