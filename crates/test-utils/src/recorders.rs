use std::sync::{Arc, Mutex};

use sizzle::engine::{Notifier, Reporter, RunRecord};
use sizzle::exec::OutputSink;
use sizzle::types::Trigger;

/// Which stream a captured chunk was written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// In-memory `OutputSink` that keeps the order chunks arrived in.
#[derive(Debug, Clone, Default)]
pub struct CaptureSink {
    chunks: Arc<Mutex<Vec<(Stream, Vec<u8>)>>>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written, both streams, in arrival order.
    pub fn combined(&self) -> String {
        self.collect(|_| true)
    }

    pub fn stdout_text(&self) -> String {
        self.collect(|s| s == Stream::Stdout)
    }

    pub fn stderr_text(&self) -> String {
        self.collect(|s| s == Stream::Stderr)
    }

    fn collect(&self, keep: impl Fn(Stream) -> bool) -> String {
        let chunks = self.chunks.lock().unwrap();
        let bytes: Vec<u8> = chunks
            .iter()
            .filter(|(s, _)| keep(*s))
            .flat_map(|(_, b)| b.iter().copied())
            .collect();
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl OutputSink for CaptureSink {
    fn stdout(&self, bytes: &[u8]) {
        self.chunks
            .lock()
            .unwrap()
            .push((Stream::Stdout, bytes.to_vec()));
    }

    fn stderr(&self, bytes: &[u8]) {
        self.chunks
            .lock()
            .unwrap()
            .push((Stream::Stderr, bytes.to_vec()));
    }
}

/// Reporter that remembers what it was shown.
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    pub started: Arc<Mutex<Vec<Trigger>>>,
    pub finished: Arc<Mutex<Vec<RunRecord>>>,
}

impl Reporter for RecordingReporter {
    fn run_started(&self, trigger: &Trigger) {
        self.started.lock().unwrap().push(trigger.clone());
    }

    fn run_finished(&self, record: &RunRecord) {
        self.finished.lock().unwrap().push(record.clone());
    }
}

/// Notifier that remembers every message.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    pub messages: Arc<Mutex<Vec<String>>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}
