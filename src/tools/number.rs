//! Lenient number parsing and en-US style formatting used by the calculators.

use regex::Regex;
use std::sync::OnceLock;

fn leading_float() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?").expect("valid float regex")
    })
}

/// Parse the longest numeric prefix after leading whitespace ("12kg" -> 12).
/// `None` when no digits lead the input.
pub fn parse_leading_float(input: &str) -> Option<f64> {
    let trimmed = input.trim_start();
    let matched = leading_float().find(trimmed)?;
    matched.as_str().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Thousands separators and at most `max_fraction` fraction digits
pub fn format_grouped(value: f64, max_fraction: usize) -> String {
    let fixed = format!("{:.*}", max_fraction, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac)) => (int_part.to_string(), frac.trim_end_matches('0').to_string()),
        None => (fixed.clone(), String::new()),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let is_zero = int_part.chars().all(|c| c == '0') && frac_part.is_empty();
    let sign = if value.is_sign_negative() && !is_zero { "-" } else { "" };
    if frac_part.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac_part)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_leading_float() {
        assert_eq!(parse_leading_float("42"), Some(42.0));
        assert_eq!(parse_leading_float("  -3.5e2 units"), Some(-350.0));
        assert_eq!(parse_leading_float(".5"), Some(0.5));
        assert_eq!(parse_leading_float("12kg"), Some(12.0));
        assert_eq!(parse_leading_float("abc"), None);
        assert_eq!(parse_leading_float(""), None);
        assert_eq!(parse_leading_float("-"), None);
    }

    #[test]
    fn test_format_grouped() {
        assert_eq!(format_grouped(1024.0, 6), "1,024");
        assert_eq!(format_grouped(1234567.891, 6), "1,234,567.891");
        assert_eq!(format_grouped(0.0009765625, 6), "0.000977");
        assert_eq!(format_grouped(-1500.5, 6), "-1,500.5");
        assert_eq!(format_grouped(-0.0000001, 6), "0");
        assert_eq!(format_grouped(999.0, 6), "999");
    }
}
