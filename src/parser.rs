//! Field parsers for the loosely formatted text columns of the dataset.
//!
//! Both parsers are total: any input, including a missing cell, yields either
//! a finite number or `None`.

use once_cell::sync::Lazy;
use regex::Regex;

/// Currency symbols, thousands separators, whitespace and the "approx" marker.
static PRICE_NOISE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[$€£,\s]|approx").expect("valid price pattern"));

/// ASCII digits only; `f64::from_str` rejects digits from other scripts.
static LEADING_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+\.?[0-9]*").expect("valid number pattern"));

/// Parses a price descriptor such as `"$45,000"`, `"approx $30,000"` or
/// `"$50,000 - $60,000"` into a single average price.
///
/// Ranges are averaged over their non-empty numeric bounds.
pub fn parse_price(text: Option<&str>) -> Option<f64> {
    let text = text?;
    let cleaned = PRICE_NOISE.replace_all(text, "");

    if cleaned.contains('-') {
        let bounds: Vec<f64> = cleaned
            .split('-')
            .filter(|p| !p.is_empty())
            .filter_map(parse_finite)
            .collect();

        if bounds.is_empty() {
            return None;
        }
        return Some(bounds.iter().sum::<f64>() / bounds.len() as f64);
    }

    parse_finite(&cleaned)
}

/// Extracts the integer or decimal prefix of a value like `"250 km/h"` or
/// `"3.5 sec"`, ignoring whatever unit follows.
pub fn parse_leading_number(text: Option<&str>) -> Option<f64> {
    let m = LEADING_NUMBER.find(text?)?;
    parse_finite(m.as_str())
}

fn parse_finite(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}
