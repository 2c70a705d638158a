// formcheck - rule-based form field validation engine
// Client-side re-validation mirroring server-side rules: declarative
// per-field rule sets, checksum and expression predicates, error display
// orchestration.

pub mod catalog;
pub mod config;
pub mod engine;
pub mod form;
pub mod messages;
pub mod orchestrator;
pub mod presenter;
pub mod registry;
pub mod rule;
pub mod value;

// Core types
pub use engine::{validate_fields, Pass, ValidationError};
pub use form::{Control, ControlKind, Form};
pub use messages::Language;
pub use orchestrator::FormValidator;
pub use presenter::{error_slot_id, ErrorPresenter, PageView, SummaryEntry};
pub use registry::RuleRegistry;
pub use rule::{normalize_map_syntax, Category, Rule, RuleSet};
pub use value::FieldValue;

// Re-export the leaf crates the catalogue builds on
pub use formcheck_checksum as checksum;
pub use formcheck_expr as expr;
