// src/engine/mod.rs

//! Orchestration engine for sizzle.
//!
//! This module ties together:
//! - the result tracker (pass/fail transitions between runs)
//! - presentation collaborators (reporter, notifier)
//! - the main runtime event loop that reacts to:
//!   - accepted file changes
//!   - finished pipeline runs
//!   - watch failures
//!   - shutdown signals
//!
//! The pure core state machine lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`].

use crate::errors::SizzleError;
use crate::types::ChangeEvent;

/// Events flowing into the runtime from the watcher, runs and signals.
#[derive(Debug)]
pub enum RuntimeEvent {
    /// A debounced, selected file change.
    FileChanged(ChangeEvent),
    /// A pipeline run finished and was classified.
    RunCompleted(RunRecord),
    /// The change source hit a fatal error and stopped.
    WatchFailed(SizzleError),
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

pub mod core;
pub mod event_handlers;
pub mod report;
pub mod runtime;
pub mod tracker;

pub use core::CoreRuntime;
pub use event_handlers::{CoreCommand, CoreStep};
pub use report::{
    notification_line, Notifier, NullNotifier, Reporter, RunRecord, TerminalNotifier,
    TerminalReporter,
};
pub use runtime::Runtime;
pub use tracker::{Classification, ResultTracker, TrackerState};
