//! styleimport stylesheet layer
//!
//! Turns raw CSS text into an ordered list of rules (selectors plus
//! declarations) and answers selector queries against it. Parsing is
//! delegated to `cssparser`; this crate only keeps what a style import
//! needs: top-level rules, their selector strings, and their raw
//! declarations, all in source order.
//!
//! # Example
//!
//! ```
//! use styleimport_css::{parse, StylesheetIndex};
//!
//! let sheet = parse(".btn { color: red }", "inline.css").unwrap();
//! let index = StylesheetIndex::new(&sheet);
//! assert!(index.find_first(|s| s == ".btn").is_some());
//! ```

pub mod ast;
pub mod index;
pub mod loader;
pub mod parser;

pub use ast::{Declaration, Rule, Stylesheet};
pub use index::StylesheetIndex;
pub use loader::LoadError;
pub use parser::parse;

/// Stylesheet parse error with position information.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("CSS parse error in {file} at line {line}, column {column}: {message}")]
pub struct ParseError {
    pub message: String,
    pub file: String,
    pub line: u32,
    pub column: u32,
}
