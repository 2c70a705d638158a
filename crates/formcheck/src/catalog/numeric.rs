// File: src/catalog/numeric.rs
// Purpose: Numeric type and range predicates

use once_cell::sync::Lazy;
use regex::Regex;

use formcheck_expr::parse_number;

use crate::rule::Rule;

static DECIMAL_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?\d+$").unwrap());

/// An optionally signed run of decimal digits, nothing else. False for the
/// empty string, which is what makes the fixed-width integer categories
/// reject empty values.
pub fn is_decimal_digits(value: &str) -> bool {
    DECIMAL_DIGITS.is_match(value)
}

fn integer_within(value: &str, min: f64, max: f64) -> bool {
    if !is_decimal_digits(value) {
        return false;
    }

    // Comparison happens in f64, the precision the declared bounds were
    // written against.
    parse_number(value)
        .map(|number| number >= min && number <= max)
        .unwrap_or(false)
}

pub fn byte(value: &str) -> bool {
    integer_within(value, -128.0, 127.0)
}

pub fn short(value: &str) -> bool {
    integer_within(value, -32768.0, 32767.0)
}

pub fn int(value: &str) -> bool {
    integer_within(value, i32::MIN as f64, i32::MAX as f64)
}

pub fn long(value: &str) -> bool {
    integer_within(value, i64::MIN as f64, i64::MAX as f64)
}

/// Float and double share one check: parseable as a number, empty exempt.
pub fn float(value: &str) -> bool {
    value.is_empty() || parse_number(value).is_some()
}

/// Inclusive integer range. Empty exempt; a missing or unparseable bound
/// fails the containment test rather than widening it.
pub fn int_range(value: &str, rule: &Rule) -> bool {
    if value.is_empty() {
        return true;
    }

    if !is_decimal_digits(value) {
        return false;
    }

    within_bounds(parse_number(value), rule)
}

/// Inclusive float/double range with the same bound policy.
pub fn float_range(value: &str, rule: &Rule) -> bool {
    if value.is_empty() {
        return true;
    }

    within_bounds(parse_number(value), rule)
}

fn within_bounds(number: Option<f64>, rule: &Rule) -> bool {
    let bound = |name| rule.param(name).and_then(parse_number);

    match (number, bound("min"), bound("max")) {
        (Some(number), Some(min), Some(max)) => number >= min && number <= max,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range_rule(min: &str, max: &str) -> Rule {
        Rule::new("f", "m").with_param("min", min).with_param("max", max)
    }

    #[test]
    fn test_fixed_width_integers_reject_empty() {
        assert!(!byte(""));
        assert!(!short(""));
        assert!(!int(""));
        assert!(!long(""));
    }

    #[test]
    fn test_byte_bounds_inclusive() {
        assert!(byte("-128"));
        assert!(byte("127"));
        assert!(!byte("128"));
        assert!(!byte("-129"));
        assert!(!byte("12.5"));
    }

    #[test]
    fn test_short_and_int_bounds() {
        assert!(short("32767"));
        assert!(!short("32768"));
        assert!(int("2147483647"));
        assert!(!int("2147483648"));
        assert!(!int("abc"));
    }

    #[test]
    fn test_float_accepts_any_number_and_empty() {
        assert!(float(""));
        assert!(float("3.25"));
        assert!(float("-1e3"));
        assert!(!float("abc"));
    }

    #[test]
    fn test_int_range() {
        let rule = range_rule("1", "10");
        assert!(int_range("", &rule));
        assert!(int_range("1", &rule));
        assert!(int_range("10", &rule));
        assert!(!int_range("11", &rule));
        assert!(!int_range("5.5", &rule)); // not all digits
    }

    #[test]
    fn test_missing_bound_fails_containment() {
        let rule = Rule::new("f", "m").with_param("min", "1");
        assert!(!int_range("5", &rule));
        assert!(!float_range("5", &rule));

        let garbage = range_rule("low", "high");
        assert!(!float_range("5", &garbage));
    }

    #[test]
    fn test_float_range() {
        let rule = range_rule("0.5", "2.5");
        assert!(float_range("2.5", &rule));
        assert!(!float_range("2.51", &rule));
        assert!(!float_range("abc", &rule));
    }
}
