//! JavaScript literal output.
//!
//! Renders a [`Resolution`] as an expression that can replace the import
//! call in the calling source. Strings are double-quoted with JSON escapes,
//! absence is `null`, object keys are quoted string literals.

use crate::format::Formatted;
use crate::Resolution;

/// Render a resolution as a JavaScript expression.
pub fn to_js(resolution: &Resolution) -> String {
    match resolution {
        Resolution::Single(value) => optional_to_js(value.as_ref()),
        Resolution::Sequence(items) => {
            let parts: Vec<String> = items
                .iter()
                .map(|item| optional_to_js(item.as_ref()))
                .collect();
            format!("[{}]", parts.join(", "))
        }
        Resolution::Mapping(entries) => object_literal(
            entries
                .iter()
                .map(|(key, value)| (key.as_str(), optional_to_js(value.as_ref()))),
        ),
    }
}

/// Render one formatted rule.
pub fn formatted_to_js(formatted: &Formatted) -> String {
    match formatted {
        Formatted::Text(text) => string_literal(text),
        Formatted::Object(entries) => object_literal(
            entries
                .iter()
                .map(|(key, value)| (key.as_str(), string_literal(value))),
        ),
    }
}

fn optional_to_js(value: Option<&Formatted>) -> String {
    value.map_or_else(|| "null".to_owned(), formatted_to_js)
}

fn object_literal<'a>(entries: impl Iterator<Item = (&'a str, String)>) -> String {
    let parts: Vec<String> = entries
        .map(|(key, value)| format!("{}: {value}", string_literal(key)))
        .collect();
    if parts.is_empty() {
        "{}".into()
    } else {
        format!("{{ {} }}", parts.join(", "))
    }
}

/// Quote `s` as a double-quoted JavaScript string literal.
pub fn string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            // Line terminators in JS source, even though JSON allows them.
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(s: &str) -> Option<Formatted> {
        Some(Formatted::Text(s.into()))
    }

    #[test]
    fn test_single_string() {
        let js = to_js(&Resolution::Single(text("color: red;\npadding: 1px;")));
        assert_eq!(js, r#""color: red;\npadding: 1px;""#);
    }

    #[test]
    fn test_single_none() {
        assert_eq!(to_js(&Resolution::Single(None)), "null");
    }

    #[test]
    fn test_sequence_with_nulls() {
        let js = to_js(&Resolution::Sequence(vec![text("x: 1;"), None]));
        assert_eq!(js, r#"["x: 1;", null]"#);
        assert_eq!(to_js(&Resolution::Sequence(Vec::new())), "[]");
    }

    #[test]
    fn test_mapping_of_objects() {
        let js = to_js(&Resolution::Mapping(vec![
            (
                "primary".into(),
                Some(Formatted::Object(vec![(
                    "backgroundColor".into(),
                    "blue".into(),
                )])),
            ),
            ("missing".into(), None),
        ]));
        assert_eq!(
            js,
            r#"{ "primary": { "backgroundColor": "blue" }, "missing": null }"#
        );
    }

    #[test]
    fn test_empty_object() {
        let js = formatted_to_js(&Formatted::Object(Vec::new()));
        assert_eq!(js, "{}");
    }

    #[test]
    fn test_duplicate_keys_emitted_in_order() {
        let js = formatted_to_js(&Formatted::Object(vec![
            ("color".into(), "red".into()),
            ("color".into(), "blue".into()),
        ]));
        assert_eq!(js, r#"{ "color": "red", "color": "blue" }"#);
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            string_literal("font-family: \"A\\B\";\u{2028}\u{1}"),
            r#""font-family: \"A\\B\";\u2028\u0001""#
        );
    }
}
