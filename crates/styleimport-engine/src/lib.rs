//! styleimport engine
//!
//! Resolves a matcher against a parsed stylesheet and formats the matched
//! rules into literal data for the importing source.
//!
//! ```text
//! Stylesheet + MatcherSpec + FormatChoice → resolve() → Resolution → literal::to_js()
//! ```
//!
//! A lookup that finds nothing is not an error: it produces `None` in the
//! position the rule would have taken. Only a malformed matcher (bad regex
//! flags or pattern) fails.

pub mod format;
pub mod literal;
pub mod matcher;

use serde::ser::{Serialize, SerializeMap, Serializer};
use styleimport_css::{Rule, Stylesheet, StylesheetIndex};

pub use format::{format_declarations, to_camel_case, Formatted};
pub use matcher::{FormatChoice, MatcherSpec, RegexFlags, UnknownFormat};

/// Resolution error. Raised only for matchers that cannot be evaluated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("invalid regex flags '{flags}': {reason}")]
    InvalidFlags { flags: String, reason: String },

    #[error("invalid regex pattern /{pattern}/: {message}")]
    InvalidPattern { pattern: String, message: String },

    /// The host could not map a call-site argument onto any matcher shape.
    #[error("unrecognized matcher: {0}")]
    UnrecognizedMatcher(String),
}

/// The literal value produced for one reference site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Selector or non-global pattern: the first matching rule, if any.
    Single(Option<Formatted>),
    /// List matcher (one entry per item) or global pattern (one entry per
    /// matching rule, never `None`).
    Sequence(Vec<Option<Formatted>>),
    /// Map matcher: the matcher's keys in order, each with its rule.
    Mapping(Vec<(String, Option<Formatted>)>),
}

/// Resolves matchers against one stylesheet with one output format.
pub struct Resolver<'a> {
    index: StylesheetIndex<'a>,
    format: FormatChoice,
}

impl<'a> Resolver<'a> {
    pub fn new(stylesheet: &'a Stylesheet, format: FormatChoice) -> Self {
        Self {
            index: StylesheetIndex::new(stylesheet),
            format,
        }
    }

    #[tracing::instrument(level = "debug", skip_all, fields(matcher = matcher.kind(), format = %self.format))]
    pub fn resolve(&self, matcher: &MatcherSpec) -> Result<Resolution, ResolveError> {
        let resolution = match matcher {
            MatcherSpec::Selector(selector) => Resolution::Single(self.by_selector(selector)),
            MatcherSpec::List(items) => Resolution::Sequence(self.by_list(items)),
            MatcherSpec::Pattern { pattern, flags } => self.by_pattern(pattern, flags)?,
            MatcherSpec::Map(entries) => Resolution::Mapping(self.by_map(entries)),
        };
        tracing::debug!(found = resolution.found(), "matcher resolved");
        Ok(resolution)
    }

    pub fn by_selector(&self, selector: &str) -> Option<Formatted> {
        let rule = self.index.find_first(|s| s == selector);
        if rule.is_none() {
            tracing::trace!(selector, "no rule for selector");
        }
        self.format_rule(rule)
    }

    pub fn by_list(&self, items: &[String]) -> Vec<Option<Formatted>> {
        items.iter().map(|item| self.by_selector(item)).collect()
    }

    pub fn by_pattern(&self, pattern: &str, flags: &str) -> Result<Resolution, ResolveError> {
        let flags = RegexFlags::parse(flags)?;
        let regex = flags.compile(pattern)?;

        if !flags.global {
            let rule = self.index.find_first(|s| regex.is_match(s));
            return Ok(Resolution::Single(self.format_rule(rule)));
        }

        let rules = self.index.find_all(|s| regex.is_match(s));
        Ok(Resolution::Sequence(
            rules
                .into_iter()
                .map(|rule| Some(format_declarations(rule, self.format)))
                .collect(),
        ))
    }

    pub fn by_map(&self, entries: &[(String, String)]) -> Vec<(String, Option<Formatted>)> {
        entries
            .iter()
            .map(|(key, selector)| (key.clone(), self.by_selector(selector)))
            .collect()
    }

    fn format_rule(&self, rule: Option<&Rule>) -> Option<Formatted> {
        rule.map(|rule| format_declarations(rule, self.format))
    }
}

/// Resolve `matcher` against `stylesheet`, formatting every matched rule
/// with `format`.
pub fn resolve(
    stylesheet: &Stylesheet,
    matcher: &MatcherSpec,
    format: FormatChoice,
) -> Result<Resolution, ResolveError> {
    Resolver::new(stylesheet, format).resolve(matcher)
}

impl Resolution {
    /// Number of rules that were found.
    pub fn found(&self) -> usize {
        match self {
            Resolution::Single(value) => usize::from(value.is_some()),
            Resolution::Sequence(items) => items.iter().flatten().count(),
            Resolution::Mapping(entries) => entries.iter().filter(|(_, v)| v.is_some()).count(),
        }
    }
}

impl Serialize for Resolution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Resolution::Single(value) => value.serialize(serializer),
            Resolution::Sequence(items) => items.serialize(serializer),
            Resolution::Mapping(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sheet(css: &str) -> Stylesheet {
        styleimport_css::parse(css, "test.css").unwrap()
    }

    fn text(s: &str) -> Option<Formatted> {
        Some(Formatted::Text(s.into()))
    }

    fn object(entries: &[(&str, &str)]) -> Option<Formatted> {
        Some(Formatted::Object(
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ))
    }

    const CARDS: &str = ".card-1 { x: 1 }\n.nav { x: 2 }\n.card-2 { x: 3 }";

    // =========================================================================
    // Selector
    // =========================================================================

    #[test]
    fn test_selector_string_form() {
        let sheet = sheet(".btn{color:red;padding:1px}");
        let result = resolve(
            &sheet,
            &MatcherSpec::Selector(".btn".into()),
            FormatChoice::String,
        )
        .unwrap();
        assert_eq!(result, Resolution::Single(text("color: red;\npadding: 1px;")));
    }

    #[test]
    fn test_selector_missing_is_none() {
        let sheet = sheet(".btn{color:red;padding:1px}");
        let result = resolve(
            &sheet,
            &MatcherSpec::Selector(".missing".into()),
            FormatChoice::String,
        )
        .unwrap();
        assert_eq!(result, Resolution::Single(None));
    }

    #[test]
    fn test_selector_matches_any_selector_of_a_rule() {
        let sheet = sheet(".a, .b { x: 1 }\n.b { x: 2 }");
        let result = resolve(&sheet, &MatcherSpec::Selector(".b".into()), FormatChoice::Object)
            .unwrap();
        assert_eq!(result, Resolution::Single(object(&[("x", "1")])));
    }

    #[test]
    fn test_selector_is_compared_verbatim() {
        let sheet = sheet(".a > .b { x: 1 }");
        let exact = resolve(&sheet, &MatcherSpec::Selector(".a > .b".into()), FormatChoice::String);
        let loose = resolve(&sheet, &MatcherSpec::Selector(".a>.b".into()), FormatChoice::String);
        assert_eq!(exact.unwrap(), Resolution::Single(text("x: 1;")));
        assert_eq!(loose.unwrap(), Resolution::Single(None));
    }

    // =========================================================================
    // List
    // =========================================================================

    #[test]
    fn test_list_follows_input_order() {
        let sheet = sheet(".a{x:1}\n.b{x:2}");
        let result = resolve(
            &sheet,
            &MatcherSpec::List(vec![".b".into(), ".a".into()]),
            FormatChoice::Object,
        )
        .unwrap();
        assert_eq!(
            result,
            Resolution::Sequence(vec![object(&[("x", "2")]), object(&[("x", "1")])])
        );
    }

    #[test]
    fn test_list_keeps_alignment_for_missing_items() {
        let sheet = sheet(".a{x:1}\n.b{x:2}");
        let items: Vec<String> = vec![".nope".into(), ".a".into(), ".gone".into(), ".a".into()];
        let result = resolve(&sheet, &MatcherSpec::List(items.clone()), FormatChoice::String)
            .unwrap();
        match result {
            Resolution::Sequence(values) => {
                assert_eq!(values.len(), items.len());
                assert_eq!(values, vec![None, text("x: 1;"), None, text("x: 1;")]);
            }
            other => panic!("Expected Sequence, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_list() {
        let sheet = sheet(".a{x:1}");
        let result = resolve(&sheet, &MatcherSpec::List(Vec::new()), FormatChoice::String)
            .unwrap();
        assert_eq!(result, Resolution::Sequence(Vec::new()));
    }

    // =========================================================================
    // Pattern
    // =========================================================================

    #[test]
    fn test_global_pattern_returns_all_in_stylesheet_order() {
        let sheet = sheet(CARDS);
        let result = resolve(&sheet, &MatcherSpec::pattern(r"^\.card", "g"), FormatChoice::String)
            .unwrap();
        assert_eq!(result, Resolution::Sequence(vec![text("x: 1;"), text("x: 3;")]));
    }

    #[test]
    fn test_pattern_without_global_returns_first() {
        let sheet = sheet(CARDS);
        let result = resolve(&sheet, &MatcherSpec::pattern(r"^\.card", ""), FormatChoice::String)
            .unwrap();
        assert_eq!(result, Resolution::Single(text("x: 1;")));
    }

    #[test]
    fn test_pattern_without_match() {
        let sheet = sheet(CARDS);
        let single = resolve(&sheet, &MatcherSpec::pattern("^#", "i"), FormatChoice::String);
        let global = resolve(&sheet, &MatcherSpec::pattern("^#", "gi"), FormatChoice::String);
        assert_eq!(single.unwrap(), Resolution::Single(None));
        assert_eq!(global.unwrap(), Resolution::Sequence(Vec::new()));
    }

    #[test]
    fn test_global_pattern_tests_every_selector_independently() {
        // A stateful global regex would skip `.card-2` after matching `.card-1`.
        let sheet = sheet(".card-1 { x: 1 }\n.card-2 { x: 2 }\n.card-3 { x: 3 }");
        let result = resolve(&sheet, &MatcherSpec::pattern("card", "g"), FormatChoice::String)
            .unwrap();
        assert_eq!(result.found(), 3);
    }

    #[test]
    fn test_pattern_flags_apply() {
        let sheet = sheet(".Card { x: 1 }");
        let result = resolve(&sheet, &MatcherSpec::pattern(r"^\.card$", "i"), FormatChoice::String)
            .unwrap();
        assert_eq!(result, Resolution::Single(text("x: 1;")));
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        let sheet = sheet(CARDS);
        let err = resolve(&sheet, &MatcherSpec::pattern("[", "g"), FormatChoice::String)
            .unwrap_err();
        assert!(matches!(err, ResolveError::InvalidPattern { .. }));
    }

    #[test]
    fn test_invalid_flags_are_an_error() {
        let sheet = sheet(CARDS);
        let err = resolve(&sheet, &MatcherSpec::pattern("card", "q"), FormatChoice::String)
            .unwrap_err();
        assert!(matches!(err, ResolveError::InvalidFlags { .. }));
    }

    // =========================================================================
    // Map
    // =========================================================================

    #[test]
    fn test_map_keeps_keys_and_order() {
        let sheet = sheet(".btn { background-color: blue; }");
        let result = resolve(
            &sheet,
            &MatcherSpec::Map(vec![
                ("primary".into(), ".btn".into()),
                ("missing".into(), ".nope".into()),
            ]),
            FormatChoice::Object,
        )
        .unwrap();
        assert_eq!(
            result,
            Resolution::Mapping(vec![
                ("primary".into(), object(&[("backgroundColor", "blue")])),
                ("missing".into(), None),
            ])
        );
    }

    #[test]
    fn test_map_keys_are_not_sorted() {
        let sheet = sheet(".a { x: 1 }");
        let result = resolve(
            &sheet,
            &MatcherSpec::Map(vec![
                ("zeta".into(), ".a".into()),
                ("alpha".into(), ".a".into()),
            ]),
            FormatChoice::String,
        )
        .unwrap();
        match result {
            Resolution::Mapping(entries) => {
                let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
                assert_eq!(keys, vec!["zeta", "alpha"]);
            }
            other => panic!("Expected Mapping, got {other:?}"),
        }
    }

    // =========================================================================
    // Determinism and serialization
    // =========================================================================

    #[test]
    fn test_repeated_resolution_is_identical() {
        let sheet = sheet(CARDS);
        let matcher = MatcherSpec::pattern("card", "g");
        let first = resolve(&sheet, &matcher, FormatChoice::Object).unwrap();
        let second = resolve(&sheet, &matcher, FormatChoice::Object).unwrap();
        assert_eq!(first, second);
        assert_eq!(literal::to_js(&first), literal::to_js(&second));
    }

    #[test]
    fn test_serialize_resolution_json() {
        let sheet = sheet(".btn { font-size: 12px }");
        let result = resolve(
            &sheet,
            &MatcherSpec::Map(vec![
                ("primary".into(), ".btn".into()),
                ("missing".into(), ".nope".into()),
            ]),
            FormatChoice::Object,
        )
        .unwrap();
        assert_eq!(
            serde_json::to_string(&result).unwrap(),
            r#"{"primary":{"fontSize":"12px"},"missing":null}"#
        );
    }

    #[test]
    fn test_serialize_single_none_is_null() {
        assert_eq!(
            serde_json::to_string(&Resolution::Single(None)).unwrap(),
            "null"
        );
    }
}
