// src/engine/core.rs

//! Pure core runtime state machine.
//!
//! This module contains a synchronous, deterministic "core runtime" that
//! consumes [`RuntimeEvent`]s and produces:
//! - an updated core state
//! - a list of "commands" describing what the IO shell should do next
//!
//! The async/IO-heavy shell (`engine::runtime::Runtime`) is responsible for:
//! - reading events from channels
//! - spawning pipeline runs on the backend
//! - reporting, notification and shutdown
//!
//! The core can be tested without any Tokio, channels, filesystem, or
//! processes.

use crate::engine::event_handlers::{
    handle_file_change, handle_run_completed, handle_watch_failure, CoreCommand, CoreStep,
};
use crate::engine::RuntimeEvent;
use crate::types::Trigger;

/// Pure core runtime state.
///
/// It has **no** channels, no Tokio types, and does not perform any IO.
#[derive(Debug, Default)]
pub struct CoreRuntime {
    args: Vec<String>,
    active_runs: usize,
    completed_runs: u64,
}

impl CoreRuntime {
    pub fn new(args: Vec<String>) -> Self {
        Self {
            args,
            ..Self::default()
        }
    }

    /// Target arguments every trigger carries.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn active_runs(&self) -> usize {
        self.active_runs
    }

    pub fn completed_runs(&self) -> u64 {
        self.completed_runs
    }

    /// The synthetic initial run every session starts with.
    pub fn start(&mut self) -> CoreStep {
        self.active_runs += 1;
        CoreStep::continue_with(vec![CoreCommand::StartRun(Trigger::initial(
            self.args.clone(),
        ))])
    }

    /// Handle a single runtime event, updating core state and returning the
    /// resulting commands for the IO shell.
    pub fn step(&mut self, event: RuntimeEvent) -> CoreStep {
        match event {
            RuntimeEvent::FileChanged(change) => {
                handle_file_change(&self.args, &mut self.active_runs, change)
            }
            RuntimeEvent::RunCompleted(record) => {
                handle_run_completed(&mut self.active_runs, &mut self.completed_runs, record)
            }
            RuntimeEvent::WatchFailed(err) => handle_watch_failure(err),
            RuntimeEvent::ShutdownRequested => CoreStep::stop_with(Vec::new()),
        }
    }
}
