// File: src/config.rs
// Purpose: Rule configuration parsing from TOML

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::registry::RuleRegistry;
use crate::rule::{Category, Rule};

/// Root of a rule configuration document.
///
/// ```toml
/// [[form]]
/// name = "myForm"
///
///   [[form.rule]]
///   category = "required"
///   field = "email"
///   message = "Enter your email address"
///
///   [[form.rule]]
///   category = "maxlength"
///   field = "notes"
///   message = "Notes must be 10 characters or fewer"
///     [form.rule.params]
///     maxlength = "10"
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RuleDocument {
    #[serde(default, rename = "form")]
    pub forms: Vec<FormRules>,
}

/// All declared rules for one form.
#[derive(Debug, Clone, Deserialize)]
pub struct FormRules {
    pub name: String,

    #[serde(default, rename = "rule")]
    pub rules: Vec<RuleEntry>,
}

/// One declared rule. Parameter values are strings; the accessor contract is
/// string-or-absent, never typed.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleEntry {
    pub category: Category,

    #[serde(default)]
    pub field: String,

    #[serde(default)]
    pub message: String,

    #[serde(default)]
    pub params: HashMap<String, String>,
}

impl RuleDocument {
    /// Builds the typed registry the engine consumes. Declaration order
    /// within a (form, category) pair is preserved.
    pub fn into_registry(self) -> RuleRegistry {
        let mut registry = RuleRegistry::new();

        for form in self.forms {
            for entry in form.rules {
                let rule = Rule::new(&entry.field, &entry.message).with_params(entry.params);
                registry.add_rule(&form.name, entry.category, rule);
            }
        }

        registry
    }
}

/// Loads a rule registry from an explicitly named TOML file. A missing file
/// is an error here; use [`load_default`] for the optional well-known path.
pub fn load(path: impl AsRef<Path>) -> Result<RuleRegistry> {
    let path = path.as_ref();

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read rule configuration: {:?}", path))?;

    from_str(&content).with_context(|| format!("Failed to parse rule configuration: {:?}", path))
}

/// Loads `./formcheck.toml` when present, otherwise an empty registry.
pub fn load_default() -> Result<RuleRegistry> {
    let path = Path::new("formcheck.toml");

    if !path.exists() {
        return Ok(RuleRegistry::new());
    }

    load(path)
}

/// Parses a rule configuration document from TOML text.
pub fn from_str(content: &str) -> Result<RuleRegistry> {
    if content.trim().is_empty() {
        return Ok(RuleRegistry::new());
    }

    let document: RuleDocument =
        toml::from_str(content).context("Invalid rule configuration document")?;

    Ok(document.into_registry())
}
