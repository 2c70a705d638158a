// File: src/lib.rs
// Purpose: Evaluate the closed boolean expression grammar used by display
// conditions and the expression-based validation rules

use once_cell::sync::Lazy;
use regex::Regex;

// Innermost parenthesis group: a group containing no nested parentheses.
static PAREN_GROUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(([^()]*)\)").unwrap());

// Single binary comparison with a lazy left operand, so the leftmost
// operator wins and longer operators are preferred at that position.
static COMPARISON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*?)(===|==|!=|>=|<=|>|<)(.*?)$").unwrap());

/// Evaluates a boolean expression over already-substituted operands.
///
/// The grammar is closed: parenthesis grouping, `&&`, `||`, one binary
/// comparison per clause, and the literal `true`. Anything the grammar does
/// not recognize evaluates to false, so a malformed expression can never
/// abort a caller. Operands prefer numeric interpretation ([`parse_number`])
/// and fall back to their literal text.
///
/// # Examples
///
/// ```
/// assert!(formcheck_expr::evaluate("(1==1)&&(2==2)"));
/// assert!(formcheck_expr::evaluate("1!=2"));
/// assert!(!formcheck_expr::evaluate("not true"));
/// ```
pub fn evaluate(expression: &str) -> bool {
    let mut expression = expression.to_string();

    // Reduce parenthesis groups innermost-first, re-scanning after each
    // substitution so freshly exposed groups are picked up.
    while let Some(found) = PAREN_GROUP.find(&expression) {
        let group = found.range();
        let result = evaluate(&expression[group.start + 1..group.end - 1]);
        expression.replace_range(group, bool_text(result));
    }

    if let Some((left, right)) = split_operands(&expression, "&&") {
        return evaluate(left) && evaluate(right);
    }

    if let Some((left, right)) = split_operands(&expression, "||") {
        return evaluate(left) || evaluate(right);
    }

    if let Some(captures) = COMPARISON.captures(&expression) {
        return compare(&captures[1], &captures[2], &captures[3]);
    }

    expression == "true"
}

/// Strips whitespace and quote characters, the caller-side normalization
/// applied to an expression after operand substitution and before
/// [`evaluate`].
pub fn normalize(expression: &str) -> String {
    expression
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\'' && *c != '"')
        .collect()
}

/// Percent-escapes a substituted operand so field content can never carry
/// whitespace, quotes, parentheses or operator characters into the grammar.
/// Two escaped operands compare equal iff the original strings do.
pub fn escape_operand(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Escapes a value and wraps it in double quotes, the substitution form for
/// string operands. The quotes are removed again by [`normalize`].
pub fn quote_operand(value: &str) -> String {
    format!("\"{}\"", escape_operand(value))
}

/// Converts a string to a number when it parses cleanly as one.
///
/// The empty string stays a string (`None`). A blank string collapses to
/// zero, matching the host-language numeric conversion the original rule
/// declarations were written against.
pub fn parse_number(value: &str) -> Option<f64> {
    if value.is_empty() {
        return None;
    }

    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Some(0.0);
    }

    // Keep the accepted spellings to plain decimal/exponent forms.
    let lowered = trimmed.to_ascii_lowercase();
    if lowered.contains("inf") || lowered.contains("nan") {
        return None;
    }

    trimmed.parse::<f64>().ok()
}

fn bool_text(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

// Splits at the first operator occurrence that leaves both operand slices
// non-empty. An operator with nothing on one side falls through to the
// comparison/literal stages instead.
fn split_operands<'a>(expression: &'a str, operator: &str) -> Option<(&'a str, &'a str)> {
    for (index, _) in expression.match_indices(operator) {
        let (left, rest) = expression.split_at(index);
        let right = &rest[operator.len()..];

        if !left.is_empty() && !right.is_empty() {
            return Some((left, right));
        }
    }

    None
}

fn compare(left: &str, operator: &str, right: &str) -> bool {
    let left_number = parse_number(left);
    let right_number = parse_number(right);

    match operator {
        "!=" => !loose_equals(left, left_number, right, right_number),
        "==" => loose_equals(left, left_number, right, right_number),
        // Kept deliberately loose: string-coerced equality without the
        // membership form, not strict-type equality.
        "===" => coerced_equals(left, left_number, right, right_number),
        ">=" => ordered(left, left_number, right, right_number, |o| o.is_ge()),
        "<=" => ordered(left, left_number, right, right_number, |o| o.is_le()),
        ">" => ordered(left, left_number, right, right_number, |o| o.is_gt()),
        "<" => ordered(left, left_number, right, right_number, |o| o.is_lt()),
        _ => false,
    }
}

// `==`/`!=` treat a comma-holding side as a delimited set and test the other
// side for membership, anchored on commas or the ends of the set.
fn loose_equals(
    left: &str,
    left_number: Option<f64>,
    right: &str,
    right_number: Option<f64>,
) -> bool {
    if left.contains(',') {
        return set_contains(left, &operand_text(right, right_number));
    }

    if right.contains(',') {
        return set_contains(right, &operand_text(left, left_number));
    }

    coerced_equals(left, left_number, right, right_number)
}

fn coerced_equals(
    left: &str,
    left_number: Option<f64>,
    right: &str,
    right_number: Option<f64>,
) -> bool {
    match (left_number, right_number) {
        (Some(l), Some(r)) => l == r,
        _ => left == right,
    }
}

fn set_contains(set: &str, member: &str) -> bool {
    match Regex::new(&format!("(^|,){member}(,|$)")) {
        Ok(pattern) => pattern.is_match(set),
        Err(_) => false,
    }
}

// A coerced number is interpolated in its canonical form, so "05" matches a
// set entry "5".
fn operand_text(text: &str, number: Option<f64>) -> String {
    match number {
        Some(n) => number_to_text(n),
        None => text.to_string(),
    }
}

fn number_to_text(number: f64) -> String {
    if number.fract() == 0.0 && number.abs() < 1e15 {
        format!("{}", number as i64)
    } else {
        number.to_string()
    }
}

fn ordered(
    left: &str,
    left_number: Option<f64>,
    right: &str,
    right_number: Option<f64>,
    test: impl Fn(std::cmp::Ordering) -> bool,
) -> bool {
    match (left_number, right_number) {
        (Some(l), Some(r)) => l.partial_cmp(&r).map(&test).unwrap_or(false),
        (None, None) => test(left.cmp(right)),
        // A number ordered against a non-number never holds.
        _ => false,
    }
}
