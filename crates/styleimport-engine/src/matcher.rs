//! Matcher specifications and format selection.
//!
//! A style import names the rules it wants in one of four shapes. The host
//! decides which shape a call site uses; this crate only ever sees the
//! explicit [`MatcherSpec`].

use std::fmt;
use std::str::FromStr;

use regex::{Regex, RegexBuilder};

use crate::ResolveError;

/// Which rules a reference site asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatcherSpec {
    /// First rule having a selector equal to the string.
    Selector(String),
    /// One lookup per item, results aligned with the items.
    List(Vec<String>),
    /// Selectors tested against a regular expression. The `g` flag asks
    /// for every matching rule instead of the first.
    Pattern { pattern: String, flags: String },
    /// One lookup per entry, keyed by the entry's output key.
    Map(Vec<(String, String)>),
}

impl MatcherSpec {
    pub fn pattern(pattern: impl Into<String>, flags: impl Into<String>) -> Self {
        Self::Pattern {
            pattern: pattern.into(),
            flags: flags.into(),
        }
    }

    /// Short name of the shape, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Selector(_) => "selector",
            Self::List(_) => "list",
            Self::Pattern { .. } => "pattern",
            Self::Map(_) => "map",
        }
    }
}

/// Output representation for every rule resolved at one reference site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatChoice {
    /// `property: value;` lines joined with `\n`.
    #[default]
    String,
    /// Ordered `camelCaseProperty -> value` entries.
    Object,
}

impl FormatChoice {
    /// Format implied by how the import was called.
    ///
    /// A bare call (`styledImport(...)`) and the `string` accessor produce
    /// strings; any other accessor (`styledImport.react(...)`) produces
    /// objects.
    pub fn from_accessor(accessor: Option<&str>) -> Self {
        match accessor {
            None | Some("string") => Self::String,
            Some(_) => Self::Object,
        }
    }
}

/// Returned when a format name is neither `string` nor `object`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown format '{0}', expected 'string' or 'object'")]
pub struct UnknownFormat(pub String);

impl FromStr for FormatChoice {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(Self::String),
            "object" => Ok(Self::Object),
            other => Err(UnknownFormat(other.to_owned())),
        }
    }
}

impl fmt::Display for FormatChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => f.write_str("string"),
            Self::Object => f.write_str("object"),
        }
    }
}

/// Regular expression flags, in JavaScript's flag alphabet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegexFlags {
    pub global: bool,
    pub ignore_case: bool,
    pub multi_line: bool,
    pub dot_all: bool,
    pub unicode: bool,
    pub sticky: bool,
    pub has_indices: bool,
}

impl RegexFlags {
    /// Parse a flag string such as `"gi"`. Unknown and repeated flags are
    /// rejected.
    pub fn parse(flags: &str) -> Result<Self, ResolveError> {
        let mut parsed = Self::default();
        for flag in flags.chars() {
            let slot = match flag {
                'g' => &mut parsed.global,
                'i' => &mut parsed.ignore_case,
                'm' => &mut parsed.multi_line,
                's' => &mut parsed.dot_all,
                'u' => &mut parsed.unicode,
                'y' => &mut parsed.sticky,
                'd' => &mut parsed.has_indices,
                other => {
                    return Err(ResolveError::InvalidFlags {
                        flags: flags.to_owned(),
                        reason: format!("unknown flag '{other}'"),
                    })
                }
            };
            if *slot {
                return Err(ResolveError::InvalidFlags {
                    flags: flags.to_owned(),
                    reason: format!("repeated flag '{flag}'"),
                });
            }
            *slot = true;
        }
        Ok(parsed)
    }

    /// Compile `pattern` under these flags.
    ///
    /// Sticky patterns only match at the start of the tested text. The
    /// `g` flag does not change what a single test matches. Classes such
    /// as `\d`, `\w` and `\b` are always Unicode-aware, with or without `u`.
    pub fn compile(&self, pattern: &str) -> Result<Regex, ResolveError> {
        let source = if self.sticky {
            format!(r"\A(?:{pattern})")
        } else {
            pattern.to_owned()
        };
        RegexBuilder::new(&source)
            .case_insensitive(self.ignore_case)
            .multi_line(self.multi_line)
            .dot_matches_new_line(self.dot_all)
            .build()
            .map_err(|e| ResolveError::InvalidPattern {
                pattern: pattern.to_owned(),
                message: e.to_string(),
            })
    }
}
