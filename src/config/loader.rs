// src/config/loader.rs

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{RawSizzlefile, Sizzlefile};
use crate::errors::{Result, SizzleError};
use crate::fs::FileSystem;

/// File names tried, in order, when no explicit Sizzlefile is given.
pub const SEARCH_ORDER: [&str; 4] = [
    "Sizzlefile",
    "Sizzlefile.toml",
    ".Sizzlefile",
    ".Sizzlefile.toml",
];

/// Parse TOML into a `RawSizzlefile` without semantic validation.
pub fn parse_raw(contents: &str) -> Result<RawSizzlefile> {
    let raw: RawSizzlefile = toml::from_str(contents)?;
    Ok(raw)
}

/// Parse and validate Sizzlefile contents that did not come from disk.
pub fn parse_and_validate(contents: &str) -> Result<Sizzlefile> {
    Sizzlefile::try_from(parse_raw(contents)?)
}

/// Locate the Sizzlefile to use.
///
/// An explicit path must exist. Otherwise the first of [`SEARCH_ORDER`]
/// that exists in `cwd` wins.
pub fn find_sizzlefile(
    fs: &dyn FileSystem,
    cwd: &Path,
    explicit: Option<&Path>,
) -> Result<PathBuf> {
    if let Some(path) = explicit {
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            cwd.join(path)
        };
        if fs.is_file(&path) {
            return Ok(path);
        }
        return Err(SizzleError::ConfigNotFound(path));
    }

    SEARCH_ORDER
        .iter()
        .map(|name| cwd.join(name))
        .find(|candidate| fs.is_file(candidate))
        .ok_or_else(|| SizzleError::ConfigNotFound(cwd.join(SEARCH_ORDER[0])))
}

/// Load a Sizzlefile from `path` and run validation.
///
/// This is the recommended entry point for the rest of the application:
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks that every target has something to watch and something to run,
///   and that every glob compiles.
pub fn load_and_validate(fs: &dyn FileSystem, path: &Path) -> Result<Sizzlefile> {
    debug!(path = %path.display(), "loading Sizzlefile");
    let contents = fs.read_to_string(path)?;
    let file = parse_and_validate(&contents)?;
    Ok(file.with_source(path))
}
