// File: src/value.rs
// Purpose: Form field value types

/// Value read from a form field.
///
/// Text-like controls and single selections yield `Single`; multi-selects and
/// checkbox groups yield `Multiple`. An absent value (radio group with nothing
/// checked, field not on the form) is `None` at the accessor level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Single(String),
    Multiple(Vec<String>),
}

impl FieldValue {
    /// Flattens the value to the text the rule predicates operate on.
    /// Multiple values join on commas, the way a checkbox group stringifies.
    pub fn join(&self) -> String {
        match self {
            FieldValue::Single(value) => value.clone(),
            FieldValue::Multiple(values) => values.join(","),
        }
    }

    /// True when the flattened value is empty or whitespace.
    pub fn is_blank(&self) -> bool {
        self.join().trim().is_empty()
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Single(String::new())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Single(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Single(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(values: Vec<String>) -> Self {
        FieldValue::Multiple(values)
    }
}
