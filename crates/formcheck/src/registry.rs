// File: src/registry.rs
// Purpose: Typed registry of rule sets per (form, category)

use std::collections::HashMap;

use crate::rule::{Category, Rule, RuleSet};

/// Owns every declared rule set, keyed by form name and rule category.
///
/// Forms register their bindings explicitly at setup time, programmatically
/// or from a TOML document. The engine treats a missing set as "category not
/// applicable" and skips it without side effects.
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    sets: HashMap<(String, Category), RuleSet>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a whole rule set, replacing any previous set for the pair.
    pub fn register(&mut self, form: &str, category: Category, rules: RuleSet) {
        self.sets.insert((form.to_string(), category), rules);
    }

    /// Appends one rule to the pair's set, creating it if needed.
    pub fn add_rule(&mut self, form: &str, category: Category, rule: Rule) {
        self.sets
            .entry((form.to_string(), category))
            .or_default()
            .push(rule);
    }

    pub fn rules(&self, form: &str, category: Category) -> Option<&[Rule]> {
        self.sets
            .get(&(form.to_string(), category))
            .map(|set| set.as_slice())
    }

    /// Categories with a non-empty set for the form, in catalogue order.
    pub fn categories(&self, form: &str) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|category| {
                self.rules(form, *category)
                    .map(|rules| !rules.is_empty())
                    .unwrap_or(false)
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_set_is_none() {
        let registry = RuleRegistry::new();
        assert_eq!(registry.rules("myForm", Category::Required), None);
    }

    #[test]
    fn test_categories_follow_catalogue_order() {
        let mut registry = RuleRegistry::new();
        registry.add_rule("myForm", Category::Email, Rule::new("email", "bad email"));
        registry.add_rule("myForm", Category::Required, Rule::new("email", "enter email"));
        registry.register("myForm", Category::Mask, vec![]);

        // The empty mask set does not count as applicable.
        assert_eq!(
            registry.categories("myForm"),
            vec![Category::Required, Category::Email]
        );
    }

    #[test]
    fn test_sets_are_per_form() {
        let mut registry = RuleRegistry::new();
        registry.add_rule("a", Category::Required, Rule::new("f", "m"));
        assert!(registry.rules("b", Category::Required).is_none());
    }
}
