// File: src/catalog/date.rs
// Purpose: Strict date parsing and date-range predicates

use chrono::{Datelike, Duration, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::rule::Rule;

const DEFAULT_DATE_PATTERN: &str = "dd/MM/yyyy";

// Absolute bound: year/month/day. Tested as a search, then parsed whole.
static ABSOLUTE_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4,}(/\d{1,2}){2}").unwrap());

// Relative bound: up to three signed offsets in the ±Ny ±Nm ±Nd language.
static OFFSET: Lazy<Regex> = Lazy::new(|| Regex::new(r"(-?\d+[dmy]? ?){1,3}").unwrap());

static YEAR_OFFSET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(-?\d+)y.*$").unwrap());
static MONTH_OFFSET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^.*?(-?\d+)m.*$").unwrap());
static DAY_OFFSET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^.*?(-?\d+)d?$").unwrap());

/// Date components extracted against a `dd/MM/yyyy`-style pattern. Any
/// component the value did not supply is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateParts {
    pub day: Option<u32>,
    pub month: Option<u32>,
    pub year: Option<i32>,
}

impl DateParts {
    /// The calendar date, when all components are present and valid.
    pub fn to_date(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year?, self.month?, self.day?)
    }
}

fn component_pattern(pattern: &str, capture: &str) -> String {
    let day = if capture == "dd" { r"(\d{1,2})" } else { r"\d{1,2}" };
    let month = if capture == "MM" { r"(\d{1,2})" } else { r"\d{1,2}" };
    let year = if capture == "yyyy" { r"(\d{4})" } else { r"\d{4}" };

    format!(
        "^{}$",
        pattern
            .replacen("dd", day, 1)
            .replacen("MM", month, 1)
            .replacen("yyyy", year, 1)
    )
}

fn extract<T: std::str::FromStr>(value: &str, pattern: &str, capture: &str) -> Option<T> {
    let regex = Regex::new(&component_pattern(pattern, capture)).ok()?;
    regex.captures(value)?.get(1)?.as_str().parse().ok()
}

/// Strict parse: the value must match the whole pattern for each component
/// to come out.
pub fn parse_date(value: &str, pattern: &str) -> DateParts {
    DateParts {
        day: extract(value, pattern, "dd"),
        month: extract(value, pattern, "MM"),
        year: extract(value, pattern, "yyyy"),
    }
}

fn date_pattern(rule: &Rule) -> &str {
    rule.param("datePatternStrict")
        .filter(|p| !p.is_empty())
        .or_else(|| rule.param("datePattern").filter(|p| !p.is_empty()))
        .unwrap_or(DEFAULT_DATE_PATTERN)
}

/// Strict pattern match plus calendar validity. Empty exempt.
pub fn date(value: &str, rule: &Rule) -> bool {
    value.is_empty() || parse_date(value, date_pattern(rule)).to_date().is_some()
}

/// A value that parses as a calendar-valid date must fall inside the
/// inclusive `[min, max]` bounds; anything else is not this rule's problem.
pub fn date_range(value: &str, rule: &Rule, today: NaiveDate) -> bool {
    let Some(entered) = parse_date(value, date_pattern(rule)).to_date() else {
        return true;
    };

    let min = bound(rule.param("min"), today, NaiveDate::MIN);
    let max = bound(rule.param("max"), today, NaiveDate::MAX);

    match (min, max) {
        (Some(min), Some(max)) => entered >= min && entered <= max,
        // A bound that matches neither form poisons the containment test.
        _ => false,
    }
}

fn bound(param: Option<&str>, today: NaiveDate, default: NaiveDate) -> Option<NaiveDate> {
    let Some(param) = param.filter(|p| !p.is_empty()) else {
        return Some(default);
    };

    if ABSOLUTE_DATE.is_match(param) {
        return parse_absolute(param);
    }

    if OFFSET.is_match(param) {
        return Some(apply_offsets(today, param));
    }

    None
}

fn parse_absolute(text: &str) -> Option<NaiveDate> {
    let mut parts = text.trim().split('/');
    let year = parts.next()?.parse().ok()?;
    let month = parts.next()?.parse().ok()?;
    let day = parts.next()?.parse().ok()?;

    if parts.next().is_some() {
        return None;
    }

    NaiveDate::from_ymd_opt(year, month, day)
}

// Year, month and day offsets apply in that order, each with calendar
// rollover (adding a year to Feb 29 lands on Mar 1).
fn apply_offsets(today: NaiveDate, text: &str) -> NaiveDate {
    let mut date = today;

    if let Some(amount) = offset_amount(&YEAR_OFFSET, text) {
        date = roll(date.year().saturating_add(amount), date.month(), date.day());
    }

    if let Some(amount) = offset_amount(&MONTH_OFFSET, text) {
        let total = i64::from(date.year()) * 12 + i64::from(date.month0()) + i64::from(amount);
        let year = total.div_euclid(12).clamp(i32::MIN as i64, i32::MAX as i64) as i32;
        let month = total.rem_euclid(12) as u32 + 1;
        date = roll(year, month, date.day());
    }

    if let Some(amount) = offset_amount(&DAY_OFFSET, text) {
        date = date
            .checked_add_signed(Duration::days(i64::from(amount)))
            .unwrap_or(if amount >= 0 { NaiveDate::MAX } else { NaiveDate::MIN });
    }

    date
}

fn offset_amount(pattern: &Regex, text: &str) -> Option<i32> {
    pattern.captures(text)?.get(1)?.as_str().parse().ok()
}

fn roll(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.checked_add_signed(Duration::days(i64::from(day) - 1)))
        .unwrap_or(if year >= 0 { NaiveDate::MAX } else { NaiveDate::MIN })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rule() -> Rule {
        Rule::new("f", "m")
    }

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_parse_default_pattern() {
        let parts = parse_date("17/05/2020", DEFAULT_DATE_PATTERN);
        assert_eq!(parts.day, Some(17));
        assert_eq!(parts.month, Some(5));
        assert_eq!(parts.year, Some(2020));
    }

    #[test]
    fn test_parse_rejects_partial_matches() {
        let parts = parse_date("17/05/2020 extra", DEFAULT_DATE_PATTERN);
        assert_eq!(parts.day, None);
    }

    #[test]
    fn test_custom_pattern() {
        let parts = parse_date("2020-05-17", "yyyy-MM-dd");
        assert_eq!(parts.to_date(), Some(ymd(2020, 5, 17)));
    }

    #[test]
    fn test_date_predicate() {
        assert!(date("", &rule()));
        assert!(date("29/02/2020", &rule()));
        assert!(!date("29/02/2021", &rule())); // not a leap year
        assert!(!date("31/04/2021", &rule()));
        assert!(!date("not a date", &rule()));
    }

    #[test]
    fn test_strict_pattern_parameter_wins() {
        let strict = rule().with_param("datePatternStrict", "yyyy/MM/dd");
        assert!(date("2021/04/30", &strict));
        assert!(!date("30/04/2021", &strict));
    }

    #[test]
    fn test_range_with_absolute_bounds() {
        let bounded = rule()
            .with_param("min", "2020/1/1")
            .with_param("max", "2020/12/31");
        assert!(date_range("01/01/2020", &bounded, ymd(2026, 1, 1)));
        assert!(date_range("31/12/2020", &bounded, ymd(2026, 1, 1)));
        assert!(!date_range("01/01/2021", &bounded, ymd(2026, 1, 1)));
    }

    #[test]
    fn test_range_with_relative_bounds_is_inclusive() {
        let today = ymd(2026, 8, 23);
        let min = rule().with_param("min", "-1y");
        assert!(date_range("23/08/2025", &min, today));
        assert!(!date_range("22/08/2025", &min, today));
    }

    #[test]
    fn test_combined_offsets_apply_in_order() {
        assert_eq!(
            apply_offsets(ymd(2026, 8, 23), "-1y 2m -3d"),
            ymd(2025, 10, 20)
        );
    }

    #[test]
    fn test_offset_rollover() {
        // Feb 29 plus a year rolls into March.
        assert_eq!(apply_offsets(ymd(2024, 2, 29), "1y"), ymd(2025, 3, 1));
        // Jan 31 plus a month rolls over Feb's end.
        assert_eq!(apply_offsets(ymd(2026, 1, 31), "1m"), ymd(2026, 3, 3));
    }

    #[test]
    fn test_unparseable_value_is_not_this_rules_problem() {
        let bounded = rule().with_param("min", "-1y");
        assert!(date_range("", &bounded, ymd(2026, 1, 1)));
        assert!(date_range("soon", &bounded, ymd(2026, 1, 1)));
    }

    #[test]
    fn test_garbage_bound_fails_containment() {
        let poisoned = rule().with_param("min", "whenever");
        assert!(!date_range("01/01/2026", &poisoned, ymd(2026, 1, 1)));
    }

    #[test]
    fn test_absent_bounds_are_unbounded() {
        assert!(date_range("01/01/1900", &rule(), ymd(2026, 1, 1)));
        assert!(date_range("01/01/3000", &rule(), ymd(2026, 1, 1)));
    }
}
