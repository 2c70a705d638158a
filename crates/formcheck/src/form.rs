// File: src/form.rs
// Purpose: In-memory form model and field accessor

use serde::{Deserialize, Serialize};

use crate::value::FieldValue;

/// Control types the validation engine distinguishes.
///
/// Everything not listed here reads like a text control. `Hidden` matters
/// only when choosing a focus target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ControlKind {
    #[default]
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "textarea")]
    TextArea,
    #[serde(rename = "password")]
    Password,
    #[serde(rename = "hidden")]
    Hidden,
    #[serde(rename = "select-one")]
    SelectOne,
    #[serde(rename = "radio")]
    Radio,
    #[serde(rename = "checkbox")]
    Checkbox,
}

/// One form control. Controls sharing a name form a group (radio groups,
/// checkbox groups); the group's behavior is keyed off its first member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Control {
    #[serde(default)]
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub kind: ControlKind,

    #[serde(default)]
    pub value: String,

    #[serde(default)]
    pub checked: bool,

    /// Option values, `SelectOne` only.
    #[serde(default)]
    pub options: Vec<String>,

    #[serde(default)]
    pub selected_index: usize,
}

impl Control {
    fn new(name: &str, kind: ControlKind) -> Self {
        Self {
            id: name.to_string(),
            name: name.to_string(),
            kind,
            value: String::new(),
            checked: false,
            options: Vec::new(),
            selected_index: 0,
        }
    }

    pub fn text(name: &str, value: &str) -> Self {
        let mut control = Self::new(name, ControlKind::Text);
        control.value = value.to_string();
        control
    }

    pub fn textarea(name: &str, value: &str) -> Self {
        let mut control = Self::new(name, ControlKind::TextArea);
        control.value = value.to_string();
        control
    }

    pub fn password(name: &str, value: &str) -> Self {
        let mut control = Self::new(name, ControlKind::Password);
        control.value = value.to_string();
        control
    }

    pub fn hidden(name: &str, value: &str) -> Self {
        let mut control = Self::new(name, ControlKind::Hidden);
        control.value = value.to_string();
        control
    }

    pub fn select_one(name: &str, options: &[&str], selected_index: usize) -> Self {
        let mut control = Self::new(name, ControlKind::SelectOne);
        control.options = options.iter().map(|o| o.to_string()).collect();
        control.selected_index = selected_index;
        control
    }

    pub fn radio(name: &str, value: &str, checked: bool) -> Self {
        let mut control = Self::new(name, ControlKind::Radio);
        control.value = value.to_string();
        control.checked = checked;
        control
    }

    pub fn checkbox(name: &str, value: &str, checked: bool) -> Self {
        let mut control = Self::new(name, ControlKind::Checkbox);
        control.value = value.to_string();
        control.checked = checked;
        control
    }

    /// Overrides the element id (builders default it to the control name).
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }
}

/// An in-memory form: a name and its controls in document order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Form {
    pub name: String,

    #[serde(default, rename = "control")]
    pub controls: Vec<Control>,
}

impl Form {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            controls: Vec::new(),
        }
    }

    /// Builder-style control registration.
    pub fn control(mut self, control: Control) -> Self {
        self.controls.push(control);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// All controls sharing the given name, in document order.
    pub fn members(&self, name: &str) -> Vec<&Control> {
        self.controls.iter().filter(|c| c.name == name).collect()
    }

    pub fn control_by_id(&self, id: &str) -> Option<&Control> {
        self.controls.iter().find(|c| c.id == id)
    }

    /// True iff the named lookup resolves to a real field: the control (or,
    /// for a group, its first member) is named exactly `name`.
    pub fn is_form_field(&self, name: &str) -> bool {
        self.members(name)
            .first()
            .map(|c| c.name == name)
            .unwrap_or(false)
    }

    /// Element id errors and focus anchor on: the control's own id, or the
    /// first member's id for a group reference.
    pub fn anchor_id(&self, name: &str) -> Option<&str> {
        self.members(name).first().map(|c| c.id.as_str())
    }

    /// Reads the current value of the named field.
    ///
    /// `None` covers the absent cases: field not on the form, a radio group
    /// with nothing checked, a selection index pointing at no option.
    pub fn field_value(&self, name: &str) -> Option<FieldValue> {
        let members = self.members(name);
        let first = members.first()?;

        match first.kind {
            ControlKind::SelectOne => first
                .options
                .get(first.selected_index)
                .map(|option| FieldValue::Single(option.clone())),

            ControlKind::Radio => members
                .iter()
                .find(|c| c.checked)
                .map(|c| FieldValue::Single(c.value.clone())),

            ControlKind::Checkbox => {
                if members.len() == 1 {
                    let value = if first.checked {
                        first.value.clone()
                    } else {
                        String::new()
                    };
                    Some(FieldValue::Single(value))
                } else {
                    Some(FieldValue::Multiple(
                        members
                            .iter()
                            .filter(|c| c.checked)
                            .map(|c| c.value.clone())
                            .collect(),
                    ))
                }
            }

            _ => Some(FieldValue::Single(first.value.clone())),
        }
    }

    /// Sets the value of every control sharing the name. Convenience for
    /// mutating a form between validation passes.
    pub fn set_value(&mut self, name: &str, value: &str) {
        for control in self.controls.iter_mut().filter(|c| c.name == name) {
            control.value = value.to_string();
        }
    }
}
