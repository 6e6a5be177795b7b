//! Declaration formatting.

use serde::ser::{Serialize, SerializeMap, Serializer};
use styleimport_css::{Declaration, Rule};

use crate::matcher::FormatChoice;

/// The declarations of one resolved rule, in the site's chosen format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Formatted {
    /// `property: value;` lines joined with `\n`.
    Text(String),
    /// `(camelCaseProperty, value)` entries in declaration order.
    ///
    /// Repeated properties produce repeated keys; consumers that build a
    /// real map keep the last one.
    Object(Vec<(String, String)>),
}

pub fn format_declarations(rule: &Rule, format: FormatChoice) -> Formatted {
    match format {
        FormatChoice::String => Formatted::Text(stringify_declarations(&rule.declarations)),
        FormatChoice::Object => Formatted::Object(objectify_declarations(&rule.declarations)),
    }
}

pub fn stringify_declarations(declarations: &[Declaration]) -> String {
    declarations
        .iter()
        .map(|d| format!("{}: {};", d.property, d.value))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn objectify_declarations(declarations: &[Declaration]) -> Vec<(String, String)> {
    declarations
        .iter()
        .map(|d| (to_camel_case(&d.property), d.value.clone()))
        .collect()
}

/// Convert a kebab-case property name to camelCase.
///
/// Every hyphen followed by a character is replaced by that character in
/// upper case, so `background-color` becomes `backgroundColor` and
/// `-webkit-box-flex` becomes `WebkitBoxFlex`. A trailing hyphen is kept.
pub fn to_camel_case(property: &str) -> String {
    let mut out = String::with_capacity(property.len());
    let mut chars = property.chars();
    while let Some(c) = chars.next() {
        if c != '-' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(next) => out.extend(next.to_uppercase()),
            None => out.push('-'),
        }
    }
    out
}

impl Serialize for Formatted {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Formatted::Text(text) => serializer.serialize_str(text),
            Formatted::Object(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}
