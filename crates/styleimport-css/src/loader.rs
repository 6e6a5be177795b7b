//! Locating and reading stylesheets referenced from source files.
//!
//! A style import names its stylesheet relative to the file that contains
//! the import: absolute paths are used as-is, `.`-prefixed paths are joined
//! to the importing file's directory, and anything else is looked up as a
//! package under `node_modules`, nearest directory first.

use std::fs;
use std::path::{Path, PathBuf};

use crate::ast::Stylesheet;
use crate::parser::parse;
use crate::ParseError;

/// Failure to locate, read, or parse a stylesheet.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot find package stylesheet '{specifier}' from {}", .base.display())]
    PackageNotFound { specifier: String, base: PathBuf },

    #[error("failed to read {}: {error}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Directory that relative stylesheet specifiers are resolved against.
///
/// A relative `caller` is taken relative to `cwd`.
pub fn base_dir(caller: &Path, cwd: &Path) -> PathBuf {
    let dir = caller.parent().unwrap_or_else(|| Path::new(""));
    if caller.is_absolute() {
        dir.to_path_buf()
    } else {
        cwd.join(dir)
    }
}

/// Resolve a stylesheet specifier to a concrete path.
pub fn resolve_specifier(base: &Path, specifier: &str) -> Result<PathBuf, LoadError> {
    let path = Path::new(specifier);
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    if specifier.starts_with('.') {
        return Ok(base.join(path));
    }

    base.ancestors()
        .map(|dir| dir.join("node_modules").join(path))
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| LoadError::PackageNotFound {
            specifier: specifier.to_owned(),
            base: base.to_path_buf(),
        })
}

/// Read and parse the stylesheet at `path`.
#[tracing::instrument(level = "debug")]
pub fn load(path: &Path) -> Result<Stylesheet, LoadError> {
    let text = fs::read_to_string(path).map_err(|error| LoadError::Read {
        path: path.to_path_buf(),
        error,
    })?;
    Ok(parse(&text, &path.display().to_string())?)
}

/// Resolve `specifier` as imported from `caller` and load it.
pub fn load_import(caller: &Path, specifier: &str, cwd: &Path) -> Result<Stylesheet, LoadError> {
    let resolved = resolve_specifier(&base_dir(caller, cwd), specifier)?;
    tracing::debug!(specifier, path = %resolved.display(), "resolved stylesheet");
    load(&resolved)
}
