//! Display formatting for amounts and rates.

use super::config::NumberFormat;

/// Formats `value` with a grouped integer part and between
/// `min_fraction_digits` and `max_fraction_digits` fraction digits.
///
/// The value is rounded at the maximum precision, then trailing zeros are
/// trimmed down to the minimum.
pub fn format_number(value: f64, format: &NumberFormat) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let min = format.min_fraction_digits;
    let max = format.max_fraction_digits.max(min);
    let fixed = format!("{:.*}", max, value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

    let mut fraction = frac_part.trim_end_matches('0').to_string();
    while fraction.len() < min {
        fraction.push('0');
    }

    // Values that round to zero lose their sign
    let negative = value < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0');

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&group_digits(int_part, &format.group_separator));
    if !fraction.is_empty() {
        out.push_str(&format.decimal_separator);
        out.push_str(&fraction);
    }
    out
}

fn group_digits(digits: &str, separator: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3 * separator.len());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    out
}
