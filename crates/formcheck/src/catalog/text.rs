// File: src/catalog/text.rs
// Purpose: Required, mask, length and email predicates

use once_cell::sync::Lazy;
use regex::Regex;

use formcheck_expr::parse_number;

use crate::form::Form;
use crate::rule::{normalize_map_syntax, Rule};
use crate::value::FieldValue;

// Deliberately loose: the unescaped dot before the domain tail is
// longstanding behavior the declared rules rely on.
static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^[\w.\-']+@[\w\-]+(.[\w\-]+)+$").unwrap());

/// The one category an empty value fails.
pub fn required(value: &FieldValue) -> bool {
    !value.is_blank()
}

/// Regex mask, tested as a search like the page did it. An uncompilable or
/// missing mask means the rule does not apply here.
pub fn mask(value: &str, rule: &Rule) -> bool {
    if value.is_empty() {
        return true;
    }

    let Some(mask) = rule.param("mask") else {
        return true;
    };

    match Regex::new(mask) {
        Ok(pattern) => pattern.is_match(value),
        Err(_) => true,
    }
}

pub fn email(value: &str) -> bool {
    value.is_empty() || EMAIL.is_match(value)
}

// Effective length: strip line endings and trim, then charge lineEndLength
// per line.
fn effective_length(value: &str, line_end_length: f64) -> f64 {
    let lines = value.split('\n').count() as f64;
    let stripped: String = value.chars().filter(|c| *c != '\n' && *c != '\r').collect();

    stripped.trim().chars().count() as f64 + lines * line_end_length
}

fn line_end_length(rule: &Rule) -> f64 {
    match rule.param("lineEndLength") {
        None | Some("") => 0.0,
        Some(text) => parse_number(text).unwrap_or(f64::NAN),
    }
}

pub fn max_length(value: &str, rule: &Rule) -> bool {
    let Some(max) = rule.param("maxlength").and_then(parse_number) else {
        return false;
    };

    effective_length(value, line_end_length(rule)) <= max
}

pub fn min_length(value: &str, rule: &Rule) -> bool {
    if value.is_empty() {
        return true;
    }

    let Some(min) = rule.param("minlength").and_then(parse_number) else {
        return false;
    };

    effective_length(value, line_end_length(rule)) >= min
}

/// Applies the mask to this field only while the cross field holds the
/// trigger value. A missing cross field or parameter means no error here.
pub fn cross_field_mask(form: &Form, value: &str, rule: &Rule) -> bool {
    let (Some(name), Some(expected), Some(mask)) = (
        rule.param("crossFieldName"),
        rule.param("crossFieldValue"),
        rule.param("crossFieldMask"),
    ) else {
        return true;
    };

    let name = normalize_map_syntax(name);

    if !form.is_form_field(&name) {
        return true; // No such field, no error displayed.
    }

    let actual = form.field_value(&name).unwrap_or_default().join();

    if actual != expected {
        return true;
    }

    match Regex::new(mask) {
        Ok(pattern) => pattern.is_match(value),
        Err(_) => true,
    }
}

/// At least one of the listed fields must hold a non-blank value. Fields the
/// form does not have are ignored; an absent list fails the rule outright.
pub fn require_at_least_one(form: &Form, rule: &Rule) -> bool {
    let Some(list) = rule.param("list") else {
        return false;
    };

    let list = normalize_map_syntax(list);

    list.split(',').map(str::trim).any(|name| {
        form.field_value(name)
            .map(|value| !value.is_blank())
            .unwrap_or(false)
    })
}
