//! FILENAME: execution/src/number_format.rs
//! PURPOSE: Number rendering primitives shared by the formatter and the charts.
//! CONTEXT: `format_general` renders values that carry no format pattern.
//! `round_decimal` is the decimal rounding used by pattern formatting, and
//! `abbreviate_number` produces compact axis labels (1.5k, 2M).

use serde::{Deserialize, Serialize};

/// Suffixes for thousands, millions, billions, ...
pub const DEFAULT_NUMERIC_SYMBOLS: [&str; 6] = ["k", "M", "G", "T", "P", "E"];

/// Suffixes used when abbreviating large numbers, one per power of 1000.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NumericSymbols {
    pub symbols: Vec<String>,
}

impl Default for NumericSymbols {
    fn default() -> Self {
        NumericSymbols {
            symbols: DEFAULT_NUMERIC_SYMBOLS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Format a number without a pattern.
pub fn format_general(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }

    let abs_value = value.abs();

    // Use scientific notation for very large or very small numbers
    if abs_value >= 1e15 || abs_value < 1e-9 {
        let formatted = format!("{:.5e}", value);
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) => format!(
                "{}e{}",
                mantissa.trim_end_matches('0').trim_end_matches('.'),
                exponent
            ),
            None => formatted,
        };
    }

    if value.fract() == 0.0 {
        return format!("{:.0}", value);
    }

    let formatted = format!("{:.10}", value);
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// Add thousands separators to the integer part of a numeric string.
pub fn add_thousands_separator(s: &str) -> String {
    let (integer_part, decimal_part) = match s.split_once('.') {
        Some((int, dec)) => (int, Some(dec)),
        None => (s, None),
    };

    let negative = integer_part.starts_with('-');
    let digits: String = integer_part.chars().filter(|c| c.is_ascii_digit()).collect();

    let mut result = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    if negative {
        result.push('-');
    }

    let len = digits.len();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    if let Some(decimal) = decimal_part {
        result.push('.');
        result.push_str(decimal);
    }

    result
}

/// Rounds a non-negative finite value to `places` fraction digits, half away
/// from zero, working on the shortest decimal representation of the value.
/// Returns the integer digits and exactly `places` fraction digits.
pub fn round_decimal(value: f64, places: usize) -> (String, String) {
    // f64 Display never uses exponent notation
    let repr = format!("{}", value.abs());
    let (int_part, frac_part) = match repr.split_once('.') {
        Some((int, frac)) => (int.to_string(), frac.to_string()),
        None => (repr, String::new()),
    };

    if frac_part.len() <= places {
        let mut frac = frac_part;
        while frac.len() < places {
            frac.push('0');
        }
        return (int_part, frac);
    }

    let round_up = frac_part.as_bytes()[places] >= b'5';
    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().take(places))
        .map(|b| b - b'0')
        .collect();

    if round_up {
        let mut idx = digits.len();
        loop {
            if idx == 0 {
                digits.insert(0, 1);
                break;
            }
            idx -= 1;
            if digits[idx] == 9 {
                digits[idx] = 0;
            } else {
                digits[idx] += 1;
                break;
            }
        }
    }

    let split = digits.len() - places;
    let to_text = |ds: &[u8]| ds.iter().map(|d| char::from(b'0' + d)).collect::<String>();
    (to_text(&digits[..split]), to_text(&digits[split..]))
}

/// Compact label for large numbers: 1500 -> "1.5k", 2000000 -> "2M".
/// Values below 1000 fall back to general formatting.
pub fn abbreviate_number(value: f64, symbols: &NumericSymbols) -> String {
    if !value.is_finite() {
        return String::new();
    }

    let abs_value = value.abs();
    for (i, symbol) in symbols.symbols.iter().enumerate().rev() {
        let magnitude = 1000f64.powi(i as i32 + 1);
        if abs_value < magnitude {
            continue;
        }

        let (int, frac) = round_decimal(abs_value / magnitude, 2);
        let frac = frac.trim_end_matches('0');
        let sign = if value < 0.0 { "-" } else { "" };
        return if frac.is_empty() {
            format!("{}{}{}", sign, int, symbol)
        } else {
            format!("{}{}.{}{}", sign, int, frac, symbol)
        };
    }

    format_general(value)
}
