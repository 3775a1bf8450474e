// src/engine/tracker.rs

//! Pass/fail transition tracking.
//!
//! The tracker is the only state shared between overlapping runs. It is
//! kept behind a `std::sync::Mutex` by the orchestrator and touched only for
//! the short bookkeeping steps around a run.

use std::fmt;

use crate::types::{PipelineOutcome, RunResult};

/// Coarse state of the tracker, for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    Uninitialized,
    Running,
    Passing,
    Failing,
}

/// Transition category of a completed run relative to the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    FirstPass,
    FirstFail,
    StillPassing,
    NewlyFailing,
    StillFailing,
    Recovered,
}

impl Classification {
    pub fn of(result: &RunResult) -> Self {
        match (result.is_first_run, result.was_passing, result.passing) {
            (true, _, true) => Classification::FirstPass,
            (true, _, false) => Classification::FirstFail,
            (false, true, true) => Classification::StillPassing,
            (false, true, false) => Classification::NewlyFailing,
            (false, false, false) => Classification::StillFailing,
            (false, false, true) => Classification::Recovered,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::FirstPass => "first pass",
            Classification::FirstFail => "first fail",
            Classification::StillPassing => "still passing",
            Classification::NewlyFailing => "newly failing",
            Classification::StillFailing => "still failing",
            Classification::Recovered => "recovered",
        }
    }

    /// Message for the notification side channel; `None` when nothing changed.
    pub fn notification(&self) -> Option<&'static str> {
        match self {
            Classification::FirstPass => Some("✓ Passed"),
            Classification::FirstFail | Classification::NewlyFailing => Some("✗ Failed"),
            Classification::Recovered => Some("✓ Back to normal"),
            Classification::StillPassing | Classification::StillFailing => None,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Remembers the previous verdict and turns outcomes into [`RunResult`]s.
///
/// "First run" means first run to *finish*: with overlapping runs the
/// ordering is completion order, not start order.
#[derive(Debug, Default)]
pub struct ResultTracker {
    last: Option<bool>,
    in_flight: usize,
}

impl ResultTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> TrackerState {
        if self.in_flight > 0 {
            return TrackerState::Running;
        }
        match self.last {
            None => TrackerState::Uninitialized,
            Some(true) => TrackerState::Passing,
            Some(false) => TrackerState::Failing,
        }
    }

    pub fn is_first_run(&self) -> bool {
        self.last.is_none()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Mark a run as started.
    pub fn begin_run(&mut self) {
        self.in_flight += 1;
    }

    /// Record a finished run and classify it against the previous one.
    ///
    /// Before any run has been recorded the previous verdict counts as
    /// passing, so a first failure still reports `was_passing == true`.
    pub fn record(&mut self, outcome: PipelineOutcome) -> RunResult {
        self.in_flight = self.in_flight.saturating_sub(1);

        let result = RunResult {
            passing: outcome.passing,
            was_passing: self.last.unwrap_or(true),
            is_first_run: self.last.is_none(),
            started_at: outcome.started_at,
            finished_at: outcome.finished_at,
        };
        self.last = Some(outcome.passing);
        result
    }
}
