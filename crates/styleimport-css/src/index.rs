//! Selector queries over a parsed stylesheet.

use crate::ast::{Rule, Stylesheet};

/// Read-only view answering selector queries against a [`Stylesheet`].
///
/// A rule matches a predicate when at least one of its selectors satisfies
/// it. Results always follow source order.
#[derive(Debug, Clone, Copy)]
pub struct StylesheetIndex<'a> {
    rules: &'a [Rule],
}

impl<'a> StylesheetIndex<'a> {
    pub fn new(stylesheet: &'a Stylesheet) -> Self {
        Self::from_rules(&stylesheet.rules)
    }

    pub fn from_rules(rules: &'a [Rule]) -> Self {
        Self { rules }
    }

    /// The first rule with a selector satisfying `predicate`.
    pub fn find_first(&self, mut predicate: impl FnMut(&str) -> bool) -> Option<&'a Rule> {
        self.rules.iter().find(|rule| rule.matches(&mut predicate))
    }

    /// Every rule with a selector satisfying `predicate`.
    pub fn find_all(&self, mut predicate: impl FnMut(&str) -> bool) -> Vec<&'a Rule> {
        self.rules
            .iter()
            .filter(|rule| rule.matches(&mut predicate))
            .collect()
    }
}
