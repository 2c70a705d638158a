// File: src/catalog/expression.rs
// Purpose: EL-expression and valid-when predicates over the closed evaluator

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use formcheck_expr::{evaluate, normalize, parse_number, quote_operand};

use crate::form::Form;
use crate::rule::{normalize_map_syntax, Rule};
use crate::value::FieldValue;

static EL_DELIMITERS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(^\$\{|\}$)").unwrap());

// EL words to evaluator symbols, replaced in this order so `not empty` wins
// over `not` and `empty`. div/mod/not have no counterpart in the closed
// grammar; their symbols fall through to the defined-false outcome.
static EL_REWRITES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        ("div", "/"),
        ("mod", "%"),
        ("eq", "==="),
        ("ne", "!="),
        ("lt", "<"),
        ("gt", ">"),
        ("le", "<="),
        ("ge", ">="),
        ("and", "&&"),
        ("or", "||"),
        ("not empty", "\"\"!="),
        ("not", "!"),
        ("empty", "\"\"==="),
    ]
    .into_iter()
    .map(|(word, symbol)| {
        (
            Regex::new(&format!(r"\b{word}\b")).expect("fixed word pattern"),
            symbol,
        )
    })
    .collect()
});

// Candidate field tokens: identifier-shaped words, possibly quoted.
static EL_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r#"['"]?[A-Za-z]\w*['"]?"#).unwrap());

static THIS_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*this\*").unwrap());
static NULL_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bnull\b").unwrap());
static OR_GROUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"\)\s*or\s*\(").unwrap());
static AND_GROUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"\)\s*and\s*\(").unwrap());

// valid-when tokens include the bracket lookup form fields['x'].
static VALIDWHEN_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[A-Za-z_][\w\['\]]*").unwrap());

// Substitution text for a field value: canonical number form when the value
// prefers a number, otherwise the quoted percent-escaped string.
fn operand_text(value: &str) -> String {
    match parse_number(value) {
        Some(number) => {
            if number.fract() == 0.0 && number.abs() < 1e15 {
                format!("{}", number as i64)
            } else {
                number.to_string()
            }
        }
        None => quote_operand(value),
    }
}

fn is_string_literal(token: &str) -> bool {
    let bytes = token.as_bytes();
    bytes.len() >= 2 && (bytes[0] == b'\'' || bytes[0] == b'"') && bytes[bytes.len() - 1] == bytes[0]
}

fn substitute_field(form: &Form, token: &str, expression: &str) -> String {
    let bracket_form = format!("fields['{token}']");

    let field_name = if form.is_form_field(token) {
        token
    } else if form.is_form_field(&bracket_form) {
        bracket_form.as_str()
    } else {
        return expression.to_string();
    };

    let value = form.field_value(field_name).unwrap_or_default().join();
    let replacement = operand_text(&value);

    match Regex::new(&format!(r"\b{}\b", regex::escape(token))) {
        Ok(pattern) => pattern
            .replace_all(expression, replacement.as_str())
            .into_owned(),
        Err(_) => expression.to_string(),
    }
}

/// Evaluates a narrow EL expression against the form: `${...}` stripped, EL
/// words rewritten to evaluator symbols, field tokens substituted with their
/// escaped current values, then handed to the closed evaluator.
pub fn evaluate_el(form: &Form, expression: &str) -> bool {
    let mut expression = EL_DELIMITERS.replace_all(expression, "").into_owned();

    for (pattern, symbol) in EL_REWRITES.iter() {
        expression = pattern.replace_all(&expression, *symbol).into_owned();
    }

    // Token candidates are fixed up front; substitution rewrites the
    // expression as it goes.
    let tokens: Vec<String> = EL_TOKEN
        .find_iter(&expression)
        .map(|m| m.as_str().to_string())
        .collect();

    for token in tokens {
        if !is_string_literal(&token) {
            expression = substitute_field(form, &token, &expression);
        }
    }

    evaluate(&normalize(&expression))
}

/// The elExpression category: an optional precondition gates the test. A
/// rule without a test could be a server-side-only multi-expression rule and
/// does not apply here.
pub fn el_expression(form: &Form, rule: &Rule) -> bool {
    let test = match rule.param("elExpressionTest") {
        Some(test) if !test.is_empty() => test,
        _ => return true,
    };

    if let Some(precondition) = rule.param("elExpressionPrecondition") {
        if !precondition.is_empty() && !evaluate_el(form, precondition) {
            return true;
        }
    }

    evaluate_el(form, test)
}

/// Evaluates a valid-when test: map syntax normalized, `*this*` replaced by
/// the current value, `null` by the empty string literal, grouped `or`/`and`
/// rewritten, field tokens substituted, then the closed evaluator decides.
pub fn evaluate_valid_when(form: &Form, value: &FieldValue, test: &str) -> bool {
    let test = normalize_map_syntax(test);
    let test = THIS_TOKEN.replace_all(&test, quote_operand(&value.join()).as_str());
    let test = NULL_WORD.replace_all(&test, "\"\"");
    let test = OR_GROUP.replace(&test, ")||(");
    let test = AND_GROUP.replace(&test, ")&&(");

    let resolved = VALIDWHEN_TOKEN.replace_all(&test, |caps: &Captures| {
        let token = &caps[0];
        if form.is_form_field(token) {
            operand_text(&form.field_value(token).unwrap_or_default().join())
        } else {
            token.to_string()
        }
    });

    evaluate(&normalize(&resolved))
}

/// The validwhen category. A rule without a test does not apply here.
pub fn valid_when(form: &Form, value: &FieldValue, rule: &Rule) -> bool {
    match rule.param("test") {
        Some(test) if !test.is_empty() => evaluate_valid_when(form, value, test),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::Control;

    fn form() -> Form {
        Form::new("f")
            .control(Control::text("age", "21"))
            .control(Control::text("city", "Cardiff"))
            .control(Control::text("other", ""))
            .control(Control::text("fields['ref']", "AB12"))
    }

    #[test]
    fn test_el_words_and_fields() {
        let form = form();
        assert!(evaluate_el(&form, "${age ge 18}"));
        assert!(!evaluate_el(&form, "${age lt 18}"));
        assert!(evaluate_el(&form, "${city eq 'Cardiff'}"));
        assert!(evaluate_el(&form, "${age ge 18 and city ne ''}"));
    }

    #[test]
    fn test_el_empty_words() {
        let form = form();
        assert!(evaluate_el(&form, "${empty other}"));
        assert!(evaluate_el(&form, "${not empty city}"));
        assert!(!evaluate_el(&form, "${empty city}"));
    }

    #[test]
    fn test_el_bracket_field_lookup() {
        let form = form();
        assert!(evaluate_el(&form, "${ref eq 'AB12'}"));
    }

    #[test]
    fn test_el_unsupported_words_are_false() {
        let form = form();
        assert!(!evaluate_el(&form, "${age mod 2 eq 1}"));
        assert!(!evaluate_el(&form, "${not empty_other}"));
    }

    #[test]
    fn test_el_precondition_gates_test() {
        let form = form();
        let gated = Rule::new("city", "m")
            .with_param("elExpressionPrecondition", "${age lt 18}")
            .with_param("elExpressionTest", "${city eq 'London'}");
        assert!(el_expression(&form, &gated));

        let applied = Rule::new("city", "m")
            .with_param("elExpressionPrecondition", "${age ge 18}")
            .with_param("elExpressionTest", "${city eq 'London'}");
        assert!(!el_expression(&form, &applied));
    }

    #[test]
    fn test_el_missing_test_does_not_apply() {
        let rule = Rule::new("city", "m").with_param("elExpressionPrecondition", "${age ge 18}");
        assert!(el_expression(&form(), &rule));
    }

    #[test]
    fn test_valid_when_this_substitution() {
        let form = form();
        assert!(evaluate_valid_when(&form, &FieldValue::from("yes"), "(*this* == yes)"));
        assert!(!evaluate_valid_when(&form, &FieldValue::from("no"), "(*this* == yes)"));
    }

    #[test]
    fn test_valid_when_null_and_grouping() {
        let form = form();
        assert!(evaluate_valid_when(
            &form,
            &FieldValue::from(""),
            "(*this* == null) or (age == 21)"
        ));
        assert!(evaluate_valid_when(
            &form,
            &FieldValue::from("x"),
            "(*this* != null) and (age == 21)"
        ));
    }

    #[test]
    fn test_valid_when_cross_field() {
        let form = form();
        assert!(evaluate_valid_when(&form, &FieldValue::from(""), "(city == Cardiff)"));
        assert!(!evaluate_valid_when(&form, &FieldValue::from(""), "(city == London)"));
    }

    #[test]
    fn test_valid_when_field_values_cannot_inject_structure() {
        let form = Form::new("f").control(Control::text("sneaky", "x)||(1==1"));
        // The injected text is escaped into a single operand, so the
        // comparison stays a comparison.
        assert!(!evaluate_valid_when(&form, &FieldValue::from(""), "(sneaky == safe)"));
    }

    #[test]
    fn test_valid_when_missing_test_does_not_apply() {
        assert!(valid_when(&form(), &FieldValue::from("x"), &Rule::new("f", "m")));
    }
}
