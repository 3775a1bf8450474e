use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Local};

/// A single accepted filesystem change.
///
/// Produced by the change source after selection and debouncing; consumed
/// exactly once by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub path: PathBuf,
    pub observed_at: DateTime<Local>,
}

impl ChangeEvent {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            observed_at: Local::now(),
        }
    }
}

/// Why a pipeline run was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerReason {
    /// The synthetic run at session start (or a one-shot invocation).
    Initial,
    /// A debounced filesystem change.
    FileChange,
}

/// Everything a single pipeline run needs to know about why it runs.
///
/// Each run owns its trigger, so overlapping runs never share arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    pub reason: TriggerReason,
    pub changed: Option<PathBuf>,
    pub args: Vec<String>,
    pub observed_at: DateTime<Local>,
}

impl Trigger {
    pub fn initial(args: Vec<String>) -> Self {
        Self {
            reason: TriggerReason::Initial,
            changed: None,
            args,
            observed_at: Local::now(),
        }
    }

    pub fn from_change(event: ChangeEvent, args: Vec<String>) -> Self {
        Self {
            reason: TriggerReason::FileChange,
            changed: Some(event.path),
            args,
            observed_at: event.observed_at,
        }
    }

    /// Path that caused this run, if any.
    pub fn changed_path(&self) -> Option<&Path> {
        self.changed.as_deref()
    }
}

/// Verdict of executing the command lists, before any bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOutcome {
    pub passing: bool,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
}

impl PipelineOutcome {
    pub fn duration(&self) -> Duration {
        (self.finished_at - self.started_at)
            .to_std()
            .unwrap_or_default()
    }
}

/// A completed run, classified against the run before it.
///
/// `is_first_run` is true exactly once per tracker. Afterwards `was_passing`
/// is the `passing` value of the previously recorded run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunResult {
    pub passing: bool,
    pub was_passing: bool,
    pub is_first_run: bool,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
}

impl RunResult {
    pub fn duration(&self) -> Duration {
        (self.finished_at - self.started_at)
            .to_std()
            .unwrap_or_default()
    }
}

/// Shell used to interpret command strings.
///
/// Commands are run as `<program> -c <cmd>`, or `<program> /C <cmd>` when the
/// program is Windows' `cmd`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellSpec {
    program: String,
}

impl ShellSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn platform_default() -> Self {
        if cfg!(windows) {
            Self::new("cmd")
        } else {
            Self::new("sh")
        }
    }

    /// Use `shell` when it is set and non-blank, the platform default otherwise.
    pub fn from_override(shell: Option<&str>) -> Self {
        match shell.map(str::trim) {
            Some(s) if !s.is_empty() => Self::new(s),
            _ => Self::platform_default(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn command_flag(&self) -> &'static str {
        let stem = Path::new(&self.program)
            .file_stem()
            .map(|s| s.to_string_lossy().to_lowercase());
        match stem.as_deref() {
            Some("cmd") => "/C",
            _ => "-c",
        }
    }
}

impl Default for ShellSpec {
    fn default() -> Self {
        ShellSpec::platform_default()
    }
}

impl FromStr for ShellSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("shell must not be empty".to_string());
        }
        Ok(ShellSpec::new(s))
    }
}
