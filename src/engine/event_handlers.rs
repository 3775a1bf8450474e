// src/engine/event_handlers.rs

//! Event handling logic for the core runtime.

use tracing::{debug, error, warn};

use crate::engine::report::RunRecord;
use crate::errors::SizzleError;
use crate::types::{ChangeEvent, Trigger};

/// Command produced by the pure core, to be executed by the outer IO shell.
#[derive(Debug)]
pub enum CoreCommand {
    /// Start an independent pipeline run for this trigger.
    StartRun(Trigger),
    /// Hand a finished run to the reporter and notifier.
    Report(RunRecord),
    /// End the session with this error.
    Abort(SizzleError),
}

/// Decision returned by the core after handling a single `RuntimeEvent`.
#[derive(Debug)]
pub struct CoreStep {
    /// Commands the IO shell should execute, in order.
    pub commands: Vec<CoreCommand>,
    /// Whether the outer runtime loop should keep running.
    pub keep_running: bool,
}

impl CoreStep {
    pub fn continue_with(commands: Vec<CoreCommand>) -> Self {
        Self {
            commands,
            keep_running: true,
        }
    }

    pub fn stop_with(commands: Vec<CoreCommand>) -> Self {
        Self {
            commands,
            keep_running: false,
        }
    }
}

/// Handle an accepted file change.
///
/// Runs are never queued or cancelled: every change starts a new run with
/// its own copy of the target arguments, even while others are in flight.
pub fn handle_file_change(
    args: &[String],
    active_runs: &mut usize,
    change: ChangeEvent,
) -> CoreStep {
    if *active_runs > 0 {
        debug!(
            path = %change.path.display(),
            active_runs = *active_runs,
            "change while a run is in flight; starting an overlapping run"
        );
    }
    *active_runs += 1;
    CoreStep::continue_with(vec![CoreCommand::StartRun(Trigger::from_change(
        change,
        args.to_vec(),
    ))])
}

/// Handle a run that finished its bookkeeping.
pub fn handle_run_completed(
    active_runs: &mut usize,
    completed_runs: &mut u64,
    record: RunRecord,
) -> CoreStep {
    match active_runs.checked_sub(1) {
        Some(n) => *active_runs = n,
        None => warn!("run completion without a matching start"),
    }
    *completed_runs += 1;
    CoreStep::continue_with(vec![CoreCommand::Report(record)])
}

/// The change source failed; the session cannot keep watching.
pub fn handle_watch_failure(err: SizzleError) -> CoreStep {
    error!(error = %err, "file watching failed; ending session");
    CoreStep::stop_with(vec![CoreCommand::Abort(err)])
}
