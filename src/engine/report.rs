// src/engine/report.rs

//! Presentation collaborators: status lines and notifications.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use colored::Colorize;
use tracing::debug;

use crate::engine::tracker::Classification;
use crate::exec::{OutputSink, StdioSink};
use crate::types::{RunResult, Trigger};

/// Everything presentation needs to know about a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRecord {
    pub trigger: Trigger,
    pub result: RunResult,
    pub classification: Classification,
    pub finished_at: DateTime<Local>,
    pub duration: Duration,
}

impl RunRecord {
    pub fn new(trigger: Trigger, result: RunResult) -> Self {
        Self {
            classification: Classification::of(&result),
            finished_at: result.finished_at,
            duration: result.duration(),
            trigger,
            result,
        }
    }

    pub fn passing(&self) -> bool {
        self.result.passing
    }
}

/// Receives run lifecycle events for display.
pub trait Reporter: Send + Sync {
    fn run_started(&self, trigger: &Trigger);
    fn run_finished(&self, record: &RunRecord);
}

/// Receives the classification message for notifying transitions only.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Default notifier: a highlighted banner on the error channel, so it stays
/// visible next to (but apart from) the status lines on stdout.
#[derive(Clone)]
pub struct TerminalNotifier {
    sink: Arc<dyn OutputSink>,
}

impl TerminalNotifier {
    pub fn new() -> Self {
        Self::with_sink(Arc::new(StdioSink))
    }

    pub fn with_sink(sink: Arc<dyn OutputSink>) -> Self {
        Self { sink }
    }
}

impl Default for TerminalNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TerminalNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalNotifier").finish_non_exhaustive()
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, message: &str) {
        debug!(target: "sizzle::notify", "{message}");
        self.sink
            .stderr(format!("{}\n", notification_line(message)).as_bytes());
    }
}

/// `--no-notify`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _message: &str) {}
}

/// Prints timestamped status lines to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalReporter {
    clear_screen: bool,
}

impl TerminalReporter {
    pub fn new(clear_screen: bool) -> Self {
        Self { clear_screen }
    }
}

impl Reporter for TerminalReporter {
    fn run_started(&self, trigger: &Trigger) {
        let mut out = std::io::stdout().lock();
        if self.clear_screen {
            // Full terminal reset; also drops scrollback on most emulators.
            let _ = write!(out, "\x1bc");
        }
        let _ = writeln!(out, "{}", running_line(trigger));
        let _ = out.flush();
    }

    fn run_finished(&self, record: &RunRecord) {
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "{}", finished_line(record));
        let _ = out.flush();
    }
}

/// `[HH:MM:SS] → Running`, naming the changed file when there is one.
pub fn running_line(trigger: &Trigger) -> String {
    let stamp = timestamp(&trigger.observed_at);
    match trigger.changed_path() {
        Some(path) => format!(
            "{} {} {}",
            stamp.dimmed(),
            "→ Running".cyan().bold(),
            format!("({} changed)", path.display()).dimmed()
        ),
        None => format!("{} {}", stamp.dimmed(), "→ Running".cyan().bold()),
    }
}

/// `[HH:MM:SS] ✓ Passed (1.23s)` or the failing equivalent.
pub fn finished_line(record: &RunRecord) -> String {
    let stamp = timestamp(&record.finished_at);
    let status = if record.passing() {
        "✓ Passed".green().bold()
    } else {
        "✗ Failed".red().bold()
    };
    format!(
        "{} {} {}",
        stamp.dimmed(),
        status,
        format!("({:.2}s)", record.duration.as_secs_f64()).dimmed()
    )
}

/// `sizzle: ✓ Back to normal`, green for good news and red otherwise.
pub fn notification_line(message: &str) -> String {
    let body = if message.starts_with('✓') {
        message.green().bold()
    } else {
        message.red().bold()
    };
    format!("{} {}", "sizzle:".bold(), body)
}

fn timestamp(at: &DateTime<Local>) -> String {
    format!("[{}]", at.format("%H:%M:%S"))
}
