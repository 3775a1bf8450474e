// src/logging.rs

//! Logging setup for `sizzle` using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the filter:
//! 1. `--log-level` CLI flag (if provided), applied to every target
//! 2. `SIZZLE_LOG` environment variable, read as `EnvFilter` directives
//!    (e.g. "info", "sizzle::watch=debug,warn")
//! 3. default to `warn`
//!
//! Logs are sent to STDERR so that stdout carries nothing but command output
//! and the status lines printed by the reporter.

use anyhow::Result;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

/// Environment variable consulted when no `--log-level` is given.
pub const LOG_ENV_VAR: &str = "SIZZLE_LOG";

/// Level used when neither the flag nor the environment say otherwise.
pub const DEFAULT_LEVEL: LevelFilter = LevelFilter::WARN;

/// Initialise global logging subscriber.
///
/// Safe to call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env = std::env::var(LOG_ENV_VAR).ok();
    let filter = build_filter(cli_level, env.as_deref());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Resolve the effective filter from the CLI flag and the raw env value.
///
/// Invalid directives in `env` are skipped (with a note on stderr) rather
/// than failing startup; an empty or unusable value falls back to
/// [`DEFAULT_LEVEL`].
pub fn build_filter(cli_level: Option<LogLevel>, env: Option<&str>) -> EnvFilter {
    match cli_level {
        Some(lvl) => EnvFilter::builder()
            .with_default_directive(level_from_log_level(lvl).into())
            .parse_lossy(""),
        None => EnvFilter::builder()
            .with_default_directive(DEFAULT_LEVEL.into())
            .parse_lossy(env.map(str::trim).unwrap_or_default()),
    }
}

fn level_from_log_level(lvl: LogLevel) -> LevelFilter {
    match lvl {
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Trace => LevelFilter::TRACE,
    }
}
