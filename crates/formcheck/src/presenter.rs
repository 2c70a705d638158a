// File: src/presenter.rs
// Purpose: Error display boundary and the in-memory page view

use std::collections::{BTreeMap, BTreeSet};

use crate::engine::ValidationError;
use crate::form::{ControlKind, Form};

/// The display collaborator the engine and orchestrator report to.
///
/// The engine owns the validation logic; implementations of this trait own
/// the displayed state (error slots, summary, banners, focus) until the next
/// pass clears it.
pub trait ErrorPresenter {
    /// Hides the error summary, blanks the page banners, and clears every
    /// field error for the form. Always runs before rule evaluation.
    fn clear_form_errors(&mut self, form: &Form);

    /// Writes each error into its field's error slot, marks the form group
    /// errored, and moves focus to the candidate unless it is hidden.
    fn present_field_errors(&mut self, form: &Form, errors: &[ValidationError], focus: Option<&str>);

    /// Appends one anchor-link entry per error and reveals the summary.
    fn present_error_summary(&mut self, errors: &[ValidationError]);

    /// Writes the page-level error banner and anchors the page to it.
    fn present_page_error(&mut self, form: &Form, html: &str);
}

/// One error summary entry: an anchor link to the failing field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryEntry {
    pub field_id: String,
    pub message: String,
}

impl SummaryEntry {
    pub fn to_html(&self) -> String {
        format!(
            "<li><a href=\"#{}\">{}</a></li>",
            self.field_id, self.message
        )
    }
}

/// Derives the error slot id for a field name: bracket syntax becomes dots,
/// anything that would not survive as an HTML id is stripped, as is any
/// leading non-letter run.
pub fn error_slot_id(field_name: &str) -> String {
    format!("fieldError.{}", cleanse_name(field_name))
}

fn cleanse_name(field_name: &str) -> String {
    let converted = field_name.replace("['", ".");

    converted
        .chars()
        .skip_while(|c| !c.is_ascii_alphabetic())
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
        .collect()
}

/// In-memory stand-in for the page state the presenter writes.
///
/// Slots exist only where the page declared them: [`PageView::for_form`]
/// seeds one error slot per control plus the three page banners. A field
/// whose slot is missing keeps its summary entry but drops the inline
/// message.
#[derive(Debug, Clone, Default)]
pub struct PageView {
    slots: BTreeMap<String, String>,
    errored_groups: BTreeSet<String>,
    summary: Vec<SummaryEntry>,
    summary_visible: bool,
    focused: Option<String>,
    anchor: Option<String>,
}

impl PageView {
    /// Builds a page with the conventional slots for the form: one
    /// `fieldError.<name>` per control and the `pageError` / `pageWarning` /
    /// `pageInformation` banners.
    pub fn for_form(form: &Form) -> Self {
        let mut view = Self::default();

        for prefix in ["pageError", "pageWarning", "pageInformation"] {
            view.slots
                .insert(format!("{prefix}.{}", form.name()), String::new());
        }

        for control in &form.controls {
            view.slots.insert(error_slot_id(&control.name), String::new());
        }

        view
    }

    /// Declares an extra slot, for pages whose markup deviates from the id
    /// derivation convention.
    pub fn with_slot(mut self, id: &str) -> Self {
        self.slots.insert(id.to_string(), String::new());
        self
    }

    // Slot resolution: the cleansed id first, the raw field name second.
    fn slot_for(&self, field_name: &str) -> Option<String> {
        let cleansed = error_slot_id(field_name);

        if self.slots.contains_key(&cleansed) {
            return Some(cleansed);
        }

        let raw = format!("fieldError.{field_name}");
        self.slots.contains_key(&raw).then_some(raw)
    }

    pub fn slot(&self, id: &str) -> Option<&str> {
        self.slots.get(id).map(|s| s.as_str())
    }

    /// The inline error message currently shown for a field, by field name.
    pub fn field_error(&self, field_name: &str) -> Option<&str> {
        let slot = self.slot_for(field_name)?;
        self.slots.get(&slot).map(|s| s.as_str())
    }

    /// True when the field's form group carries the error-state class.
    pub fn field_has_error(&self, field_name: &str) -> bool {
        self.slot_for(field_name)
            .map(|slot| self.errored_groups.contains(&slot))
            .unwrap_or(false)
    }

    pub fn summary_visible(&self) -> bool {
        self.summary_visible
    }

    pub fn summary_entries(&self) -> &[SummaryEntry] {
        &self.summary
    }

    pub fn page_error(&self, form_name: &str) -> Option<&str> {
        self.slot(&format!("pageError.{form_name}"))
    }

    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    pub fn anchor(&self) -> Option<&str> {
        self.anchor.as_deref()
    }
}

impl ErrorPresenter for PageView {
    fn clear_form_errors(&mut self, form: &Form) {
        self.summary_visible = false;
        self.summary.clear();
        self.focused = None;
        self.anchor = None;

        for prefix in ["pageError", "pageWarning", "pageInformation"] {
            let id = format!("{prefix}.{}", form.name());
            if let Some(slot) = self.slots.get_mut(&id) {
                slot.clear();
            }
        }

        for control in &form.controls {
            if let Some(slot) = self.slot_for(&control.name) {
                self.errored_groups.remove(&slot);
                if let Some(content) = self.slots.get_mut(&slot) {
                    content.clear();
                }
            }
        }
    }

    fn present_field_errors(
        &mut self,
        form: &Form,
        errors: &[ValidationError],
        focus: Option<&str>,
    ) {
        for error in errors {
            let Some(control) = form.control_by_id(&error.field_id) else {
                continue;
            };

            let Some(slot) = self.slot_for(&control.name) else {
                continue; // No slot on this page variant; summary still lists it.
            };

            // A rule declared without a message still gets a visible error.
            let message = if error.raw_message.is_empty() {
                format!("Field {} is invalid.", error.field_id)
            } else {
                error.display_message.clone()
            };

            self.slots.insert(slot.clone(), message);
            self.errored_groups.insert(slot);
        }

        if let Some(focus_id) = focus {
            if let Some(control) = form.control_by_id(focus_id) {
                if control.kind != ControlKind::Hidden {
                    self.focused = Some(focus_id.to_string());
                }
            }
        }
    }

    fn present_error_summary(&mut self, errors: &[ValidationError]) {
        for error in errors {
            self.summary.push(SummaryEntry {
                field_id: error.field_id.clone(),
                message: error.raw_message.clone(),
            });
        }

        self.summary_visible = true;
    }

    fn present_page_error(&mut self, form: &Form, html: &str) {
        let id = format!("pageError.{}", form.name());
        self.slots.insert(id.clone(), html.to_string());
        self.anchor = Some(id);
    }
}
