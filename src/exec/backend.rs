// src/exec/backend.rs

//! Pluggable pipeline backend abstraction.
//!
//! The orchestrator talks to a `PipelineBackend` instead of the concrete
//! [`Executor`](super::Executor). This makes it easy to swap in a fake in
//! tests while keeping process spawning in the production executor.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Mutex, MutexGuard};

use crate::engine::tracker::ResultTracker;
use crate::types::{PipelineOutcome, RunResult, Trigger};

/// Trait abstracting how a pipeline run is executed.
///
/// Production code uses [`Executor`](super::Executor); tests can provide an
/// implementation that doesn't spawn real processes.
pub trait PipelineBackend: Send + Sync {
    /// Execute the command lists once for `trigger`.
    fn run_pipeline(
        &self,
        trigger: Trigger,
    ) -> Pin<Box<dyn Future<Output = PipelineOutcome> + Send + '_>>;

    /// Execute once and classify the outcome against `tracker`.
    ///
    /// The lock is held for the two bookkeeping steps only.
    fn run_tracked<'a>(
        &'a self,
        trigger: Trigger,
        tracker: &'a Mutex<ResultTracker>,
    ) -> Pin<Box<dyn Future<Output = RunResult> + Send + 'a>> {
        Box::pin(async move {
            lock_tracker(tracker).begin_run();
            let outcome = self.run_pipeline(trigger).await;
            lock_tracker(tracker).record(outcome)
        })
    }
}

/// Lock the tracker, recovering from poisoning: the tracker's state is two
/// plain values and stays consistent even if a holder panicked.
pub fn lock_tracker(tracker: &Mutex<ResultTracker>) -> MutexGuard<'_, ResultTracker> {
    tracker.lock().unwrap_or_else(|e| e.into_inner())
}
