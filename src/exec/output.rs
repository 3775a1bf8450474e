// src/exec/output.rs

use std::io::Write;

/// Where command output ends up.
///
/// The executor streams live stdout through `stdout` and sends everything
/// diagnostic (captured stderr, replayed stdout of failing commands, spawn
/// errors) through `stderr`. Writes are best-effort.
pub trait OutputSink: Send + Sync {
    fn stdout(&self, bytes: &[u8]);
    fn stderr(&self, bytes: &[u8]);
}

/// Writes to the process' own stdout / stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdioSink;

impl OutputSink for StdioSink {
    fn stdout(&self, bytes: &[u8]) {
        let mut out = std::io::stdout().lock();
        let _ = out.write_all(bytes);
        let _ = out.flush();
    }

    fn stderr(&self, bytes: &[u8]) {
        let mut err = std::io::stderr().lock();
        let _ = err.write_all(bytes);
        let _ = err.flush();
    }
}
