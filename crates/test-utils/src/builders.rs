#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::PathBuf;

use sizzle::config::{RawSizzlefile, Sizzlefile, TargetConfig};

/// Builder for `Sizzlefile` to simplify test setup.
pub struct SizzlefileBuilder {
    raw: RawSizzlefile,
}

impl SizzlefileBuilder {
    pub fn new() -> Self {
        Self {
            raw: RawSizzlefile {
                version: None,
                target: BTreeMap::new(),
            },
        }
    }

    pub fn with_target(mut self, name: &str, target: TargetConfig) -> Self {
        self.raw.target.insert(name.to_string(), target);
        self
    }

    /// The unvalidated form, for exercising validation errors.
    pub fn build_raw(self) -> RawSizzlefile {
        self.raw
    }

    pub fn build(self) -> Sizzlefile {
        Sizzlefile::try_from(self.raw).expect("Failed to build valid Sizzlefile from builder")
    }
}

impl Default for SizzlefileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `TargetConfig`.
pub struct TargetConfigBuilder {
    target: TargetConfig,
}

impl TargetConfigBuilder {
    /// A target watching `watch` and running `cmd`.
    pub fn new(watch: &str, cmd: &str) -> Self {
        Self {
            target: TargetConfig {
                watch: vec![watch.to_string()],
                command: vec![cmd.to_string()],
                ..TargetConfig::default()
            },
        }
    }

    pub fn watch(mut self, pattern: &str) -> Self {
        self.target.watch.push(pattern.to_string());
        self
    }

    pub fn exclude(mut self, pattern: &str) -> Self {
        self.target.exclude.push(pattern.to_string());
        self
    }

    pub fn command(mut self, cmd: &str) -> Self {
        self.target.command.push(cmd.to_string());
        self
    }

    pub fn pass(mut self, cmd: &str) -> Self {
        self.target.pass.push(cmd.to_string());
        self
    }

    pub fn fail(mut self, cmd: &str) -> Self {
        self.target.fail.push(cmd.to_string());
        self
    }

    pub fn dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.target.dir = Some(dir.into());
        self
    }

    pub fn shell(mut self, shell: &str) -> Self {
        self.target.shell = Some(shell.to_string());
        self
    }

    pub fn build(self) -> TargetConfig {
        self.target
    }
}
