// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually running the configured commands,
//! using `tokio::process::Command`, and deciding a run's pass/fail verdict.
//!
//! - [`placeholders`] substitutes `$N` tokens from target arguments.
//! - [`command`] runs one command and applies the output capture policy.
//! - [`output`] defines where output goes ([`OutputSink`]).
//! - [`pipeline`] owns the main / pass / fail sequencing ([`Executor`]).
//! - [`backend`] provides the `PipelineBackend` trait the orchestrator uses,
//!   and which tests can replace with a fake implementation.

pub mod backend;
pub mod command;
pub mod output;
pub mod pipeline;
pub mod placeholders;

pub use backend::{lock_tracker, PipelineBackend};
pub use command::{run_command, CommandSpec, CHANGED_ENV};
pub use output::{OutputSink, StdioSink};
pub use pipeline::{Executor, PipelineConfig};
pub use placeholders::{substitute_all, substitute_placeholders};
