#![allow(dead_code, unused_imports)]

pub use sizzle_test_utils::builders;
pub use sizzle_test_utils::fake_backend::FakeBackend;
pub use sizzle_test_utils::recorders::{CaptureSink, RecordingNotifier, RecordingReporter};
pub use sizzle_test_utils::{init_tracing, with_timeout};

use std::path::{Path, PathBuf};

/// Canonical path of a temp dir, so it lines up with what the OS reports.
pub fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Create `rel` (and its parents) below `root` with `content`.
pub fn write_file(root: &Path, rel: &str, content: &str) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
}
