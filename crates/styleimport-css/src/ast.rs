//! Parsed stylesheet model.
//!
//! Selectors and values are kept as the raw strings found in the source.
//! Nothing is deduplicated: a rule that lists the same property twice
//! carries both declarations, in order.

/// A parsed stylesheet: its top-level style rules in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stylesheet {
    /// Source hint the stylesheet was parsed from (usually a file path).
    pub source: String,
    pub rules: Vec<Rule>,
}

/// A style rule: one or more selectors and the declarations they share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub selectors: Vec<String>,
    pub declarations: Vec<Declaration>,
}

/// A `property: value` pair inside a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Property name as written, e.g. `background-color`.
    pub property: String,
    /// Raw value text, trimmed. `!important` is kept.
    pub value: String,
}

impl Declaration {
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
        }
    }
}

impl Rule {
    /// Whether any of this rule's selectors satisfies `predicate`.
    pub fn matches(&self, mut predicate: impl FnMut(&str) -> bool) -> bool {
        self.selectors.iter().any(|s| predicate(s.as_str()))
    }
}

impl Stylesheet {
    /// Every selector of every rule, in source order.
    pub fn selectors(&self) -> impl Iterator<Item = &str> {
        self.rules
            .iter()
            .flat_map(|rule| rule.selectors.iter().map(String::as_str))
    }
}
