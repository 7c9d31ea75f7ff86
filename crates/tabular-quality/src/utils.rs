//! Shared utilities for parsing and scoring.
//!
//! This module contains the string and number helpers used across the parser,
//! profiler and quality modules so that every stage agrees on what "missing",
//! "numeric" and "stringified" mean.

// =============================================================================
// Numeric Coercion
// =============================================================================

/// Coerce a string to a number using loose numeric conversion rules.
///
/// Surrounding whitespace is ignored and an empty string coerces to `0`.
/// Decimal literals (including exponents and a leading sign) and `0x`/`0o`/`0b`
/// prefixed integers are accepted. Anything else yields `None`.
///
/// The result may be non-finite (`"Infinity"`).
///
/// # Example
///
/// ```rust,ignore
/// use tabular_quality::utils::coerce_numeric_str;
///
/// assert_eq!(coerce_numeric_str(" 42 "), Some(42.0));
/// assert_eq!(coerce_numeric_str(""), Some(0.0));
/// assert_eq!(coerce_numeric_str("abc"), None);
/// ```
pub fn coerce_numeric_str(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }

    match trimmed {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }

    if let Some(value) = parse_radix_literal(trimmed) {
        return Some(value);
    }

    // Rust accepts spellings ("inf", "NaN", "infinity") that loose conversion does not
    if trimmed
        .chars()
        .any(|c| !(c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-')))
    {
        return None;
    }

    trimmed.parse::<f64>().ok()
}

fn parse_radix_literal(s: &str) -> Option<f64> {
    let (radix, digits) = match s.get(..2) {
        Some("0x") | Some("0X") => (16, &s[2..]),
        Some("0o") | Some("0O") => (8, &s[2..]),
        Some("0b") | Some("0B") => (2, &s[2..]),
        _ => return None,
    };
    if digits.is_empty() {
        return None;
    }
    u64::from_str_radix(digits, radix).ok().map(|v| v as f64)
}

// =============================================================================
// Formatting Utilities
// =============================================================================

/// Format a number the way it is displayed in tabular output.
///
/// Integral values print without a fractional part (`25`, not `25.0`).
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e21 {
        if value == 0.0 {
            // covers -0.0
            return "0".to_string();
        }
        return format!("{:.0}", value);
    }
    value.to_string()
}

/// Truncate a string to at most `max_chars` characters (Unicode scalar values).
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

/// Check if a string is empty after trimming surrounding whitespace.
#[inline]
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Produce `base`, or `base_1`, `base_2`, ... if `base` is already taken.
///
/// Used to disambiguate duplicate header names so that no column is lost when
/// rows are keyed by name.
pub fn unique_name(base: &str, taken: &[String]) -> String {
    if !taken.iter().any(|t| t == base) {
        return base.to_string();
    }
    (1..)
        .map(|n| format!("{}_{}", base, n))
        .find(|candidate| !taken.iter().any(|t| t == candidate))
        .unwrap_or_else(|| base.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== coerce_numeric_str tests ====================

    #[test]
    fn test_coerce_plain_numbers() {
        assert_eq!(coerce_numeric_str("42"), Some(42.0));
        assert_eq!(coerce_numeric_str("-3.5"), Some(-3.5));
        assert_eq!(coerce_numeric_str(".5"), Some(0.5));
        assert_eq!(coerce_numeric_str("1e3"), Some(1000.0));
        assert_eq!(coerce_numeric_str("  130  "), Some(130.0));
    }

    #[test]
    fn test_coerce_empty_is_zero() {
        assert_eq!(coerce_numeric_str(""), Some(0.0));
        assert_eq!(coerce_numeric_str("   "), Some(0.0));
    }

    #[test]
    fn test_coerce_rejects_text() {
        assert_eq!(coerce_numeric_str("abc"), None);
        assert_eq!(coerce_numeric_str("12abc"), None);
        assert_eq!(coerce_numeric_str("1,000"), None);
        assert_eq!(coerce_numeric_str("nan"), None);
        assert_eq!(coerce_numeric_str("inf"), None);
        assert_eq!(coerce_numeric_str("john@example.com"), None);
    }

    #[test]
    fn test_coerce_radix_literals() {
        assert_eq!(coerce_numeric_str("0x1F"), Some(31.0));
        assert_eq!(coerce_numeric_str("0b101"), Some(5.0));
        assert_eq!(coerce_numeric_str("0o17"), Some(15.0));
        assert_eq!(coerce_numeric_str("0x"), None);
    }

    #[test]
    fn test_coerce_infinity() {
        assert_eq!(coerce_numeric_str("Infinity"), Some(f64::INFINITY));
        assert_eq!(coerce_numeric_str("-Infinity"), Some(f64::NEG_INFINITY));
    }

    // ==================== formatting tests ====================

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(25.0), "25");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(-130.0), "-130");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
    }

    #[test]
    fn test_truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("héllo wörld", 7), "héllo w");
        assert_eq!(truncate_chars("", 5), "");
    }

    #[test]
    fn test_unique_name() {
        let taken = vec!["id".to_string(), "id_1".to_string()];
        assert_eq!(unique_name("name", &taken), "name");
        assert_eq!(unique_name("id", &taken), "id_2");
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank(" \t "));
        assert!(!is_blank(" x "));
    }
}
