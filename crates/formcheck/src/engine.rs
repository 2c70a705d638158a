// File: src/engine.rs
// Purpose: Rule engine: iterate a rule set, evaluate, aggregate failures

use std::collections::HashSet;

use tracing::debug;

use crate::form::Form;
use crate::presenter::ErrorPresenter;
use crate::registry::RuleRegistry;
use crate::rule::{normalize_map_syntax, Category, Rule};
use crate::value::FieldValue;

/// A recorded validation failure: the element id of the failing field, the
/// message as rendered inline (paragraph-wrapped), and the raw message used
/// for the error summary links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field_id: String,
    pub display_message: String,
    pub raw_message: String,
}

impl ValidationError {
    pub fn new(field_id: &str, message: &str) -> Self {
        // Legacy rule declarations sometimes arrive pre-wrapped; collapse the
        // doubled wrap to a single one.
        let display_message = format!("<p>{message}</p>")
            .replace("<p><p>", "<p>")
            .replace("</p></p>", "</p>");

        Self {
            field_id: field_id.to_string(),
            display_message,
            raw_message: message.to_string(),
        }
    }
}

/// Error-state for one validation pass (one submit attempt).
///
/// Owns the set of fields already marked errored, so a field failing several
/// rules across any number of categories is reported once per pass. Dropped
/// with the pass; nothing clings to the form or the page.
#[derive(Debug, Default)]
pub struct Pass {
    errored_fields: HashSet<String>,
}

impl Pass {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_errored(&self, field_name: &str) -> bool {
        self.errored_fields.contains(field_name)
    }
}

/// Validates every rule in the form's set for one category.
///
/// Missing or empty rule set means the category does not apply: trivially
/// valid, no side effects. Malformed rules and rules naming fields not on
/// this form are skipped silently; declarations are shared across form
/// variants and must degrade gracefully.
///
/// At most one error is recorded per field per pass (the first failing rule
/// wins), but every failure still counts toward the overall boolean. When
/// any error was recorded, the presenter renders the per-field errors, moves
/// focus to the first failing field, and appends to the page error summary.
pub fn validate_fields<F>(
    form: &Form,
    registry: &RuleRegistry,
    category: Category,
    pass: &mut Pass,
    presenter: &mut dyn ErrorPresenter,
    is_valid: F,
) -> bool
where
    F: Fn(&FieldValue, &Rule) -> bool,
{
    let Some(rules) = registry.rules(form.name(), category) else {
        return true;
    };

    let mut valid = true;
    let mut errors: Vec<ValidationError> = Vec::new();
    let mut focus: Option<String> = None;

    for rule in rules {
        if !rule.is_well_formed() {
            debug!(category = %category, "skipping malformed rule");
            continue;
        }

        let field_name = normalize_map_syntax(rule.field());

        if !form.is_form_field(&field_name) {
            debug!(category = %category, field = %field_name, "field not on form, skipping rule");
            continue;
        }

        // Absent reads (radio group with nothing checked) validate as the
        // empty value.
        let value = form.field_value(&field_name).unwrap_or_default();

        if !is_valid(&value, rule) {
            let anchor = form.anchor_id(&field_name).unwrap_or_default();

            if focus.is_none() {
                focus = Some(anchor.to_string());
            }

            if pass.errored_fields.insert(field_name.clone()) {
                errors.push(ValidationError::new(anchor, rule.message()));
            }

            valid = false;
        }
    }

    if !errors.is_empty() {
        presenter.present_field_errors(form, &errors, focus.as_deref());
        presenter.present_error_summary(&errors);
    }

    valid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::Control;
    use crate::presenter::PageView;
    use pretty_assertions::assert_eq;

    fn form() -> Form {
        Form::new("f")
            .control(Control::text("a", ""))
            .control(Control::text("b", "x"))
    }

    #[test]
    fn test_missing_rule_set_is_trivially_valid() {
        let form = form();
        let registry = RuleRegistry::new();
        let mut view = PageView::for_form(&form);

        assert!(validate_fields(
            &form,
            &registry,
            Category::Required,
            &mut Pass::new(),
            &mut view,
            |_, _| false
        ));
        assert!(view.summary_entries().is_empty());
    }

    #[test]
    fn test_malformed_and_missing_field_rules_are_skipped() {
        let form = form();
        let mut registry = RuleRegistry::new();
        registry.register(
            "f",
            Category::Required,
            vec![
                Rule::new("", "stray entry"),
                Rule::new("not_on_form", "missing"),
                Rule::new("b", "fine"),
            ],
        );
        let mut view = PageView::for_form(&form);

        assert!(validate_fields(
            &form,
            &registry,
            Category::Required,
            &mut Pass::new(),
            &mut view,
            |value, _| !value.is_blank()
        ));
    }

    #[test]
    fn test_first_failing_rule_wins_per_field() {
        let form = form();
        let mut registry = RuleRegistry::new();
        registry.register(
            "f",
            Category::Mask,
            vec![
                Rule::new("a", "first message"),
                Rule::new("a", "second message"),
                Rule::new("b", "other field"),
            ],
        );
        let mut view = PageView::for_form(&form);

        let mut pass = Pass::new();
        let valid = validate_fields(&form, &registry, Category::Mask, &mut pass, &mut view, |_, _| {
            false
        });

        assert!(!valid);
        assert!(pass.is_errored("a"));
        let entries = view.summary_entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].message, "first message");
        assert_eq!(entries[1].message, "other field");
        assert_eq!(view.focused(), Some("a"));
    }

    #[test]
    fn test_message_wrapping_collapses_legacy_double_wrap() {
        let error = ValidationError::new("a", "<p>already wrapped</p>");
        assert_eq!(error.display_message, "<p>already wrapped</p>");
        assert_eq!(error.raw_message, "<p>already wrapped</p>");

        let error = ValidationError::new("a", "plain");
        assert_eq!(error.display_message, "<p>plain</p>");
    }

    #[test]
    fn test_map_syntax_reference_resolves_bracket_field() {
        let form = Form::new("f").control(Control::text("fields['code']", ""));
        let mut registry = RuleRegistry::new();
        registry.register(
            "f",
            Category::Required,
            vec![Rule::new("fields(code)", "enter the code")],
        );
        let mut view = PageView::for_form(&form);

        let valid = validate_fields(
            &form,
            &registry,
            Category::Required,
            &mut Pass::new(),
            &mut view,
            |value, _| !value.is_blank(),
        );

        assert!(!valid);
        assert_eq!(view.summary_entries().len(), 1);
    }

    #[test]
    fn test_errored_state_spans_categories_within_a_pass() {
        let form = form();
        let mut registry = RuleRegistry::new();
        registry.register("f", Category::Required, vec![Rule::new("a", "required")]);
        registry.register("f", Category::Byte, vec![Rule::new("a", "not a byte")]);
        let mut view = PageView::for_form(&form);
        let mut pass = Pass::new();

        assert!(!validate_fields(
            &form,
            &registry,
            Category::Required,
            &mut pass,
            &mut view,
            |_, _| false
        ));
        assert!(!validate_fields(
            &form,
            &registry,
            Category::Byte,
            &mut pass,
            &mut view,
            |_, _| false
        ));

        // Both categories failed but the field is reported once.
        assert_eq!(view.summary_entries().len(), 1);
        assert_eq!(view.summary_entries()[0].message, "required");
    }
}
