// src/watch/debounce.rs

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Default window within which repeated events for one path collapse.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);

/// Forget stale entries once the table grows past this many paths.
const PRUNE_THRESHOLD: usize = 1024;

/// Per-path burst suppression.
///
/// An event is suppressed when the previous *delivered* event for the same
/// path is less than `interval` old. Suppressed events don't move the
/// window, so a steady stream of writes still gets through once per
/// interval.
#[derive(Debug)]
pub struct Debouncer {
    interval: Duration,
    last_delivered: HashMap<PathBuf, Instant>,
}

impl Debouncer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_delivered: HashMap::new(),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Decide whether an event for `path` observed at `now` is delivered.
    pub fn accept(&mut self, path: &Path, now: Instant) -> bool {
        if let Some(last) = self.last_delivered.get(path) {
            if now.saturating_duration_since(*last) < self.interval {
                return false;
            }
        }

        if self.last_delivered.len() >= PRUNE_THRESHOLD {
            let interval = self.interval;
            self.last_delivered
                .retain(|_, seen| now.saturating_duration_since(*seen) < interval);
        }

        self.last_delivered.insert(path.to_path_buf(), now);
        true
    }

    pub fn tracked_paths(&self) -> usize {
        self.last_delivered.len()
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}
