//! Parsing of Dutch locale-formatted amount strings.
//!
//! Take the first `\d+[.,]?\d*` token, read a comma as the decimal separator
//! and scale by a magnitude word found anywhere in the original string. A dot
//! is *not* a thousands separator, so `"15.000 euro"` parses as `15.0`.

use once_cell::sync::Lazy;
use regex::Regex;

/// First numeric token of an amount string. ASCII digits only, so every match
/// parses as `f64`.
static NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+[.,]?[0-9]*").expect("valid number pattern"));

/// Scale factor inferred from a locale word in the amount text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Magnitude {
    Million,
    Thousand,
    Unit,
}

impl Magnitude {
    /// Case-sensitive substring test; "miljoen" wins when both words appear.
    pub fn detect(text: &str) -> Self {
        if text.contains("miljoen") {
            Magnitude::Million
        } else if text.contains("duizend") {
            Magnitude::Thousand
        } else {
            Magnitude::Unit
        }
    }

    pub fn factor(self) -> f64 {
        match self {
            Magnitude::Million => 1_000_000.0,
            Magnitude::Thousand => 1_000.0,
            Magnitude::Unit => 1.0,
        }
    }
}

/// Parse an amount such as `"€ 10,5 miljoen"` into `10_500_000.0`.
///
/// Strings without a numeric token parse as `0.0` and contribute nothing.
pub fn parse_amount(text: &str) -> f64 {
    parse_scaled(text, Magnitude::detect(text))
}

/// Parse a table cell whose unit may live in its column header instead,
/// e.g. `"150"` under `"Budget 2024 (miljoen €)"`.
pub fn parse_amount_in_column(cell: &str, header: &str) -> f64 {
    let magnitude = match Magnitude::detect(cell) {
        Magnitude::Unit => Magnitude::detect(&header.to_lowercase()),
        found => found,
    };
    parse_scaled(cell, magnitude)
}

fn parse_scaled(text: &str, magnitude: Magnitude) -> f64 {
    let Some(token) = NUMBER_RE.find(text) else {
        return 0.0;
    };
    let value: f64 = token.as_str().replacen(',', ".", 1).parse().unwrap_or(0.0);
    value * magnitude.factor()
}
