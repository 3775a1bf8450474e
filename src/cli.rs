// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Command-line arguments for `sizzle`.
///
/// Without a subcommand, sizzle watches the `--watch` globs and re-runs the
/// `--cmd` pipeline on every change.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "sizzle",
    version,
    about = "Re-run commands when files change, and tell you when they break or recover.",
    long_about = None,
    subcommand_negates_reqs = true
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub watch: WatchArgs,

    #[command(flatten)]
    pub pipeline: PipelineArgs,

    #[command(flatten)]
    pub global: GlobalArgs,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Execute commands once and exit. Useful for testing a command chain.
    Command {
        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// Create a Sizzlefile by asking you questions.
    Init,

    /// Print effective files to watch given inclusion and exclusion globs and exit.
    List {
        #[command(flatten)]
        watch: WatchArgs,
    },

    /// Load configuration from a Sizzlefile target. The default target name is "default".
    Run {
        /// The PATH to the Sizzlefile to load (default: Sizzlefile, Sizzlefile.toml, .Sizzlefile, .Sizzlefile.toml).
        #[arg(short = 'b', long = "sizzlefile", value_name = "PATH")]
        sizzlefile: Option<PathBuf>,

        /// Target to run.
        #[arg(value_name = "TARGET")]
        target: Option<String>,

        /// Arguments substituted for `$1`, `$2`, ... in the target.
        #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

/// What to watch.
#[derive(Debug, Clone, Default, Args)]
pub struct WatchArgs {
    /// Watch the path GLOB. Can be repeated. (default: "**/*")
    #[arg(short = 'w', long = "watch", value_name = "GLOB")]
    pub watch: Vec<String>,

    /// Exclude path GLOB matches from being watched. Can be repeated. (default: "**/.*")
    #[arg(short = 'e', long = "exclude", value_name = "GLOB")]
    pub exclude: Vec<String>,
}

/// What to run.
#[derive(Debug, Clone, Default, Args)]
pub struct PipelineArgs {
    /// Shell CMD to execute. Required. Can be repeated.
    #[arg(short = 'c', long = "cmd", value_name = "CMD", required = true)]
    pub cmd: Vec<String>,

    /// Run the CMD when commands pass. Can be repeated.
    #[arg(short = 'p', long = "pass", value_name = "CMD")]
    pub pass: Vec<String>,

    /// Run the CMD when commands fail. Can be repeated.
    #[arg(short = 'f', long = "fail", value_name = "CMD")]
    pub fail: Vec<String>,

    /// The shell with which to interpret commands. (default: "sh", "cmd" on Windows)
    #[arg(long, value_name = "SHELL")]
    pub shell: Option<String>,
}

/// Flags accepted by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// Show command output as it is produced.
    #[arg(short = 'o', long, global = true)]
    pub show_output: bool,

    /// Disable notifications.
    #[arg(long, global = true)]
    pub no_notify: bool,

    /// Clear the screen before each run.
    #[arg(long, global = true)]
    pub clear: bool,

    /// Ignore repeat changes to the same file within this many milliseconds.
    #[arg(long, value_name = "MS", default_value_t = 100, global = true)]
    pub debounce_ms: u64,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SIZZLE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,
}

impl GlobalArgs {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
