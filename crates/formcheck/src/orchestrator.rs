// File: src/orchestrator.rs
// Purpose: Form-level validation entry point (the submit gate)

use chrono::{Local, NaiveDate};
use tracing::debug;

use crate::catalog;
use crate::engine::Pass;
use crate::form::Form;
use crate::messages::Language;
use crate::presenter::ErrorPresenter;
use crate::registry::RuleRegistry;
use crate::rule::Category;

/// Runs a form's registered rule categories and drives the error display.
///
/// The boolean it returns is the submit gate: `false` means the submission
/// must not proceed. Every category always runs, whatever failed before it,
/// so all errors surface together.
#[derive(Debug, Clone)]
pub struct FormValidator<'a> {
    registry: &'a RuleRegistry,
    language: Language,
    today: NaiveDate,
}

impl<'a> FormValidator<'a> {
    pub fn new(registry: &'a RuleRegistry) -> Self {
        Self {
            registry,
            language: Language::default(),
            today: Local::now().date_naive(),
        }
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Pins "today" for relative date-range bounds, keeping validation
    /// deterministic under test or consistent with a server-supplied clock.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// One rule category, without clearing or the page banner. Building
    /// block for [`validate_form`](Self::validate_form).
    pub fn validate_category(
        &self,
        form: &Form,
        category: Category,
        presenter: &mut dyn ErrorPresenter,
    ) -> bool {
        let mut pass = Pass::new();
        catalog::run_category(form, self.registry, category, self.today, &mut pass, presenter)
    }

    /// Clears prior error state, runs the given categories in order, and on
    /// any failure shows and anchors the page-level error banner.
    pub fn validate_form(
        &self,
        form: &Form,
        categories: &[Category],
        presenter: &mut dyn ErrorPresenter,
    ) -> bool {
        presenter.clear_form_errors(form);

        // One pass state for the whole attempt: a field reported under an
        // earlier category stays silent under the later ones.
        let mut state = Pass::new();
        let mut pass = true;

        for &category in categories {
            let ok = catalog::run_category(
                form,
                self.registry,
                category,
                self.today,
                &mut state,
                presenter,
            );
            pass = ok && pass;
        }

        if !pass {
            presenter.present_page_error(form, self.language.messages().this_page_contains_errors);
        }

        debug!(form = form.name(), pass, "validation pass complete");

        pass
    }

    /// The submit-time entry point: every category with rules registered for
    /// this form, in catalogue order.
    pub fn validate(&self, form: &Form, presenter: &mut dyn ErrorPresenter) -> bool {
        let categories = self.registry.categories(form.name());
        self.validate_form(form, &categories, presenter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::Control;
    use crate::presenter::PageView;
    use crate::rule::Rule;
    use pretty_assertions::assert_eq;

    fn registry() -> RuleRegistry {
        let mut registry = RuleRegistry::new();
        registry.add_rule("f", Category::Required, Rule::new("email", "Enter your email"));
        registry.add_rule(
            "f",
            Category::Mask,
            Rule::new("code", "Code must be three digits").with_param("mask", r"^\d{3}$"),
        );
        registry
    }

    #[test]
    fn test_all_categories_run_even_after_a_failure() {
        let registry = registry();
        let form = Form::new("f")
            .control(Control::text("email", ""))
            .control(Control::text("code", "12"));
        let mut view = PageView::for_form(&form);

        let pass = FormValidator::new(&registry).validate(&form, &mut view);

        assert!(!pass);
        assert_eq!(view.summary_entries().len(), 2);
        assert!(view.page_error("f").unwrap().starts_with("<p>ERROR:"));
        assert_eq!(view.anchor(), Some("pageError.f"));
    }

    #[test]
    fn test_passing_form_leaves_no_error_state() {
        let registry = registry();
        let form = Form::new("f")
            .control(Control::text("email", "a@b.com"))
            .control(Control::text("code", "123"));
        let mut view = PageView::for_form(&form);

        assert!(FormValidator::new(&registry).validate(&form, &mut view));
        assert_eq!(view.page_error("f"), Some(""));
        assert!(!view.summary_visible());
    }

    #[test]
    fn test_revalidation_clears_previous_pass() {
        let registry = registry();
        let mut form = Form::new("f")
            .control(Control::text("email", ""))
            .control(Control::text("code", "123"));
        let mut view = PageView::for_form(&form);
        let validator = FormValidator::new(&registry);

        assert!(!validator.validate(&form, &mut view));
        form.set_value("email", "a@b.com");
        assert!(validator.validate(&form, &mut view));

        assert!(view.summary_entries().is_empty());
        assert_eq!(view.field_error("email"), Some(""));
    }

    #[test]
    fn test_welsh_banner() {
        let registry = registry();
        let form = Form::new("f")
            .control(Control::text("email", ""))
            .control(Control::text("code", "123"));
        let mut view = PageView::for_form(&form);

        FormValidator::new(&registry)
            .with_language(Language::Welsh)
            .validate(&form, &mut view);

        assert!(view.page_error("f").unwrap().starts_with("<p>GWALL:"));
    }
}
