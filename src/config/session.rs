// src/config/session.rs

//! Flattening a target (or ad-hoc CLI flags) into what one watch session
//! needs: where to look, what to watch and what to run.

use std::path::{Path, PathBuf};

use crate::config::model::TargetConfig;
use crate::errors::Result;
use crate::exec::{substitute_all, PipelineConfig};
use crate::types::ShellSpec;
use crate::watch::path_utils::resolve_working_dir;
use crate::watch::Selector;

/// Fully resolved settings for one watch (or one-shot) session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSpec {
    /// Target name, `None` for ad-hoc sessions.
    pub name: Option<String>,
    /// Absolute directory globs are rooted at.
    pub working_dir: PathBuf,
    pub includes: Vec<String>,
    pub excludes: Vec<String>,
    pub pipeline: PipelineConfig,
    /// Target arguments; already applied to the globs, applied to commands
    /// at run time.
    pub args: Vec<String>,
}

impl SessionSpec {
    /// Resolve a Sizzlefile target.
    ///
    /// `base_dir` is the Sizzlefile's directory; the target's `dir` is
    /// resolved against it and becomes the commands' working directory.
    pub fn from_target(
        name: &str,
        target: &TargetConfig,
        base_dir: &Path,
        args: Vec<String>,
    ) -> Result<Self> {
        let dir = match &target.dir {
            Some(dir) => base_dir.join(dir),
            None => base_dir.to_path_buf(),
        };
        let working_dir = resolve_working_dir(Some(&dir))?;

        let pipeline = PipelineConfig {
            commands: target.command.clone(),
            pass_commands: target.pass.clone(),
            fail_commands: target.fail.clone(),
            shell: ShellSpec::from_override(target.shell.as_deref()),
            dir: Some(working_dir.clone()),
            show_output: false,
        };

        Ok(Self {
            name: Some(name.to_string()),
            includes: substitute_all(&target.watch, &args),
            excludes: substitute_all(&target.exclude, &args),
            working_dir,
            pipeline,
            args,
        })
    }

    /// Session built from command-line flags, rooted at `cwd`.
    ///
    /// Commands run in the inherited working directory.
    pub fn ad_hoc(
        cwd: &Path,
        includes: Vec<String>,
        excludes: Vec<String>,
        pipeline: PipelineConfig,
    ) -> Result<Self> {
        Ok(Self {
            name: None,
            working_dir: resolve_working_dir(Some(cwd))?,
            includes,
            excludes,
            pipeline,
            args: Vec::new(),
        })
    }

    pub fn with_show_output(mut self, show_output: bool) -> Self {
        self.pipeline.show_output = show_output;
        self
    }

    pub fn compile_selector(&self) -> Result<Selector> {
        Selector::compile(&self.working_dir, &self.includes, &self.excludes)
    }
}
