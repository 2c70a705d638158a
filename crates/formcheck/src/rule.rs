// File: src/rule.rs
// Purpose: Validation rule model and rule categories

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

// Legacy map syntax: map(key). Normalized form: map['key'].
static MAP_SYNTAX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\w+)\((\w+)\)").unwrap());

/// Rewrites legacy map-syntax field references to bracket syntax before form
/// lookup, e.g. `fields(postcode)` to `fields['postcode']`.
pub fn normalize_map_syntax(reference: &str) -> String {
    MAP_SYNTAX
        .replace_all(reference, "${1}['${2}']")
        .into_owned()
}

/// The rule categories the engine dispatches on. Each maps to one predicate
/// in the catalogue; a form opts into a category by registering a rule set
/// for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Required,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    IntRange,
    FloatRange,
    DoubleRange,
    Mask,
    #[serde(rename = "minlength")]
    MinLength,
    #[serde(rename = "maxlength")]
    MaxLength,
    Date,
    DateRange,
    CrossFieldMask,
    RequireAtLeastOne,
    ElExpression,
    #[serde(rename = "validwhen")]
    ValidWhen,
    CreditCard,
    TaxReference,
    ExciseReference,
    VatRegistration,
    Email,
}

impl Category {
    /// Every category, in catalogue order. This is the order the
    /// orchestrator's convenience pass runs them in.
    pub const ALL: [Category; 24] = [
        Category::Required,
        Category::Byte,
        Category::Short,
        Category::Int,
        Category::Long,
        Category::Float,
        Category::Double,
        Category::IntRange,
        Category::FloatRange,
        Category::DoubleRange,
        Category::Mask,
        Category::MinLength,
        Category::MaxLength,
        Category::Date,
        Category::DateRange,
        Category::CrossFieldMask,
        Category::RequireAtLeastOne,
        Category::ElExpression,
        Category::ValidWhen,
        Category::CreditCard,
        Category::TaxReference,
        Category::ExciseReference,
        Category::VatRegistration,
        Category::Email,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Required => "required",
            Category::Byte => "byte",
            Category::Short => "short",
            Category::Int => "int",
            Category::Long => "long",
            Category::Float => "float",
            Category::Double => "double",
            Category::IntRange => "intRange",
            Category::FloatRange => "floatRange",
            Category::DoubleRange => "doubleRange",
            Category::Mask => "mask",
            Category::MinLength => "minlength",
            Category::MaxLength => "maxlength",
            Category::Date => "date",
            Category::DateRange => "dateRange",
            Category::CrossFieldMask => "crossFieldMask",
            Category::RequireAtLeastOne => "requireAtLeastOne",
            Category::ElExpression => "elExpression",
            Category::ValidWhen => "validwhen",
            Category::CreditCard => "creditCard",
            Category::TaxReference => "taxReference",
            Category::ExciseReference => "exciseReference",
            Category::VatRegistration => "vatRegistration",
            Category::Email => "email",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One declarative validation constraint: the field it applies to, the
/// message shown when it fails, and its named parameters.
///
/// A parameter that was never declared resolves to `None`, distinct from one
/// declared as the empty string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rule {
    field: String,
    message: String,
    params: HashMap<String, String>,
}

impl Rule {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
            params: HashMap::new(),
        }
    }

    pub fn with_param(mut self, name: &str, value: &str) -> Self {
        self.params.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_params(mut self, params: HashMap<String, String>) -> Self {
        self.params = params;
        self
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(|v| v.as_str())
    }

    /// A rule without a field reference is not a rule. Shared declarations
    /// sometimes carry stray entries; the engine skips them rather than
    /// erroring.
    pub fn is_well_formed(&self) -> bool {
        !self.field.is_empty()
    }
}

/// All rules for one form and one category, in declaration order.
pub type RuleSet = Vec<Rule>;
