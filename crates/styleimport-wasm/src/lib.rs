//! WASM bindings for styleimport.
//!
//! Exposes `resolve()` to JavaScript build tooling (for instance a Babel
//! macro) via wasm-bindgen. The JavaScript side passes the stylesheet text
//! and the raw matcher argument from the call site; this shim maps the
//! argument's shape onto a `MatcherSpec` and returns a plain JS value
//! (string, object, array, or `null`) ready to be turned into a literal.

use js_sys::{Array, Object, RegExp};
use serde::Serialize;
use styleimport_engine::{FormatChoice, MatcherSpec, Resolution, ResolveError};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// Resolve a matcher against CSS source text.
///
/// `matcher` may be a selector string, an array of selector strings, a
/// `RegExp`, or a plain object mapping output keys to selector strings.
/// `accessor` is the property used on the import (`styledImport.react`);
/// without one, rules are formatted as strings.
///
/// Throws a JS error if the CSS cannot be parsed or the matcher is invalid.
#[wasm_bindgen]
pub fn resolve(css: &str, matcher: JsValue, accessor: Option<String>) -> Result<JsValue, JsError> {
    let matcher = matcher_from_js(&matcher).map_err(|e| JsError::new(&e.to_string()))?;
    let format = FormatChoice::from_accessor(accessor.as_deref());

    let resolution = resolve_source(css, &matcher, format).map_err(|e| JsError::new(&e))?;

    resolution
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsError::new(&e.to_string()))
}

/// Resolve a matcher and render the result as JavaScript source text.
#[wasm_bindgen(js_name = resolveToSource)]
pub fn resolve_to_source(
    css: &str,
    matcher: JsValue,
    accessor: Option<String>,
) -> Result<String, JsError> {
    let matcher = matcher_from_js(&matcher).map_err(|e| JsError::new(&e.to_string()))?;
    let format = FormatChoice::from_accessor(accessor.as_deref());

    let resolution = resolve_source(css, &matcher, format).map_err(|e| JsError::new(&e))?;
    Ok(styleimport_engine::literal::to_js(&resolution))
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Parse and resolve without touching any JS values.
fn resolve_source(
    css: &str,
    matcher: &MatcherSpec,
    format: FormatChoice,
) -> Result<Resolution, String> {
    let stylesheet = styleimport_css::parse(css, "<inline>").map_err(|e| e.to_string())?;
    styleimport_engine::resolve(&stylesheet, matcher, format).map_err(|e| e.to_string())
}

/// A call-site argument as read from JavaScript, before it is checked.
/// Non-string items and values are `None`.
#[derive(Debug, Clone, PartialEq)]
enum Argument {
    String(String),
    Array(Vec<Option<String>>),
    RegExp { source: String, flags: String },
    Object(Vec<(String, Option<String>)>),
    /// Any other value, with its `typeof`.
    Other(String),
}

fn matcher_from_js(value: &JsValue) -> Result<MatcherSpec, ResolveError> {
    matcher_from_argument(read_argument(value))
}

fn read_argument(value: &JsValue) -> Argument {
    if let Some(selector) = value.as_string() {
        return Argument::String(selector);
    }

    if Array::is_array(value) {
        let items = value
            .unchecked_ref::<Array>()
            .iter()
            .map(|item| item.as_string())
            .collect();
        return Argument::Array(items);
    }

    if let Some(regex) = value.dyn_ref::<RegExp>() {
        return Argument::RegExp {
            source: regex.source().into(),
            flags: regex.flags().into(),
        };
    }

    if value.is_object() && !value.is_function() {
        let entries = Object::entries(value.unchecked_ref::<Object>())
            .iter()
            .map(|entry| {
                let pair = entry.unchecked_into::<Array>();
                let key = pair.get(0).as_string().unwrap_or_default();
                (key, pair.get(1).as_string())
            })
            .collect();
        return Argument::Object(entries);
    }

    Argument::Other(value.js_typeof().as_string().unwrap_or_default())
}

fn matcher_from_argument(argument: Argument) -> Result<MatcherSpec, ResolveError> {
    match argument {
        Argument::String(selector) => Ok(MatcherSpec::Selector(selector)),
        Argument::Array(items) => {
            let items = items
                .into_iter()
                .map(|item| expect_string(item, "list items"))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(MatcherSpec::List(items))
        }
        Argument::RegExp { source, flags } => Ok(MatcherSpec::Pattern {
            pattern: source,
            flags,
        }),
        Argument::Object(entries) => {
            let entries = entries
                .into_iter()
                .map(|(key, value)| Ok((key, expect_string(value, "map values")?)))
                .collect::<Result<Vec<_>, ResolveError>>()?;
            Ok(MatcherSpec::Map(entries))
        }
        Argument::Other(kind) => Err(ResolveError::UnrecognizedMatcher(format!(
            "expected a string, array, RegExp, or object, got {kind}"
        ))),
    }
}

fn expect_string(value: Option<String>, what: &str) -> Result<String, ResolveError> {
    value.ok_or_else(|| ResolveError::UnrecognizedMatcher(format!("{what} must be strings")))
}
