// src/config/model.rs

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Sizzlefile as read from TOML, before validation.
///
/// ```toml
/// [target.default]
/// dir = "backend"
/// watch = ["src/**/*.rs"]
/// exclude = ["target/**"]
/// command = ["cargo test"]
/// pass = ["echo ok"]
/// fail = ["echo broken"]
/// shell = "bash"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RawSizzlefile {
    /// Optional format version; informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// All targets from `[target.<name>]`, keyed by name.
    #[serde(default)]
    pub target: BTreeMap<String, TargetConfig>,
}

/// `[target.<name>]` section.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    /// Working directory, relative to the Sizzlefile's own directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,

    /// Include globs. At least one is required.
    #[serde(default)]
    pub watch: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,

    /// Main command list. At least one is required.
    #[serde(default, alias = "run")]
    pub command: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pass: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fail: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shell: Option<String>,
}

/// A validated Sizzlefile.
///
/// Only constructed through `TryFrom<RawSizzlefile>`, so every target has
/// at least one watch pattern and one command.
#[derive(Debug, Clone)]
pub struct Sizzlefile {
    targets: BTreeMap<String, TargetConfig>,
    source: Option<PathBuf>,
}

impl Sizzlefile {
    pub(crate) fn new_unchecked(targets: BTreeMap<String, TargetConfig>) -> Self {
        Self {
            targets,
            source: None,
        }
    }

    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(path.into());
        self
    }

    /// Path the file was loaded from, if it came from disk.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Directory relative target `dir`s are resolved against.
    pub fn base_dir(&self) -> Option<&Path> {
        self.source.as_deref().and_then(Path::parent)
    }

    pub fn targets(&self) -> &BTreeMap<String, TargetConfig> {
        &self.targets
    }

    pub fn target(&self, name: &str) -> Option<&TargetConfig> {
        self.targets.get(name)
    }

    pub fn target_names(&self) -> impl Iterator<Item = &str> {
        self.targets.keys().map(String::as_str)
    }
}
