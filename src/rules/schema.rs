//! Ordered mapping from field name to rule.

use crate::rules::spec::RuleSpec;

/// Field rules in declaration order.
///
/// Errors are reported in this order, so it is kept explicitly rather than
/// delegated to a hash map.
///
/// # Example
///
/// ```rust
/// use strainer::core::RuleKind;
/// use strainer::rules::{RuleSchema, RuleSpec};
///
/// let schema = RuleSchema::new()
///     .field("name", RuleKind::String)
///     .field("id", RuleSpec::integer().required());
///
/// let names: Vec<&str> = schema.names().collect();
/// assert_eq!(names, vec!["name", "id"]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RuleSchema {
    fields: Vec<(String, RuleSpec)>,
}

impl RuleSchema {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Declare a field. Re-declaring a field replaces its rule in place.
    pub fn field(mut self, name: impl Into<String>, rule: impl Into<RuleSpec>) -> Self {
        self.insert(name, rule);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, rule: impl Into<RuleSpec>) {
        let name = name.into();
        let rule = rule.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = rule,
            None => self.fields.push((name, rule)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&RuleSpec> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, rule)| rule)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RuleSpec)> {
        self.fields.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, R: Into<RuleSpec>> FromIterator<(K, R)> for RuleSchema {
    fn from_iter<I: IntoIterator<Item = (K, R)>>(iter: I) -> Self {
        let mut schema = RuleSchema::new();
        for (name, rule) in iter {
            schema.insert(name, rule);
        }
        schema
    }
}
