// src/errors.rs

//! Crate-wide error type and result alias.
//!
//! Anything in here is fatal to a watch session: it unwinds to `main` and
//! ends the process with a non-zero status. A user command that exits
//! non-zero is *not* an error at this level; it only flips the verdict of
//! the run it belongs to.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SizzleError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Sizzlefile not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("Sizzlefile target not found: {0}")]
    TargetNotFound(String),

    #[error("invalid glob pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("no paths to watch were matched")]
    NoTargets,

    #[error("file watch error: {0}")]
    Watch(#[from] notify::Error),

    #[error("file watch stream ended unexpectedly")]
    WatchStreamClosed,

    #[error("watched directory was removed: {}", .0.display())]
    WatchRootRemoved(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, SizzleError>;
