// src/watch/watcher.rs

use std::path::PathBuf;
use std::time::{Duration, Instant};

use notify::event::ModifyKind;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, error, info, trace};

use crate::engine::RuntimeEvent;
use crate::errors::{Result, SizzleError};
use crate::fs::RealFileSystem;
use crate::types::ChangeEvent;
use crate::watch::debounce::{Debouncer, DEFAULT_DEBOUNCE};
use crate::watch::path_utils::strip_editor_suffix;
use crate::watch::patterns::Selector;

/// Tunables for the change source.
#[derive(Debug, Clone, Copy)]
pub struct WatchOptions {
    pub debounce: Duration,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

/// Handle for the filesystem watcher.
///
/// This exists mainly so the underlying `RecommendedWatcher` is kept alive for
/// as long as needed. Dropping this handle will stop file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
    dirs: Vec<PathBuf>,
}

impl WatcherHandle {
    /// Directories subscribed to (recursively).
    pub fn watched_dirs(&self) -> &[PathBuf] {
        &self.dirs
    }
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle")
            .field("dirs", &self.dirs)
            .finish_non_exhaustive()
    }
}

/// Turns raw notify events into accepted [`ChangeEvent`]s.
///
/// Owned by the watcher task; the debounce table is never shared.
#[derive(Debug)]
pub struct EventFilter {
    selector: Selector,
    debouncer: Debouncer,
    roots: Vec<PathBuf>,
}

impl EventFilter {
    pub fn new(selector: Selector, debounce: Duration) -> Self {
        Self {
            selector,
            debouncer: Debouncer::new(debounce),
            roots: Vec::new(),
        }
    }

    /// Subscribed base directories whose disappearance ends the session.
    pub fn with_roots(mut self, roots: Vec<PathBuf>) -> Self {
        self.roots = roots;
        self
    }

    /// The subscribed root this event shows to be gone, if any.
    ///
    /// Only removals and renames are checked. A root counts as lost when the
    /// event touches it (or something below it) and it no longer exists on
    /// disk; inotify reports the root itself with `Remove(Folder)`.
    pub fn lost_root(&self, event: &Event) -> Option<PathBuf> {
        if !is_removal(&event.kind) {
            return None;
        }
        self.roots
            .iter()
            .find(|root| event.paths.iter().any(|p| p.starts_with(root)) && !root.is_dir())
            .cloned()
    }

    /// Filter one raw event observed at `now`.
    ///
    /// Only content modifications count. Each path has editor temp suffixes
    /// stripped, then must be selected, then must get past the debouncer.
    pub fn accept(&mut self, event: &Event, now: Instant) -> Vec<ChangeEvent> {
        if !is_content_change(&event.kind) {
            trace!(kind = ?event.kind, "ignoring non-write event");
            return Vec::new();
        }

        let mut accepted = Vec::new();
        for raw in &event.paths {
            let path = strip_editor_suffix(raw);
            if !self.selector.is_selected(&path) {
                trace!(?path, "path not selected");
                continue;
            }
            if !self.debouncer.accept(&path, now) {
                debug!(?path, "debounced duplicate event");
                continue;
            }
            accepted.push(ChangeEvent::new(path));
        }
        accepted
    }
}

/// Create, remove, rename and metadata events never trigger a run.
pub fn is_content_change(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Modify(ModifyKind::Data(_)) | EventKind::Modify(ModifyKind::Any)
    )
}

fn is_removal(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Remove(_) | EventKind::Modify(ModifyKind::Name(_))
    )
}

/// Subscribe to the selector's base directories and forward accepted changes
/// to the runtime as `RuntimeEvent::FileChanged`.
///
/// Fails with [`SizzleError::NoTargets`] when no base directory exists. A
/// watcher error after startup is forwarded once as
/// `RuntimeEvent::WatchFailed` and ends the forwarding task; so is the
/// removal of a subscribed base directory, which notify doesn't report as
/// an error.
pub fn spawn_watcher(
    selector: Selector,
    options: WatchOptions,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) -> Result<WatcherHandle> {
    let dirs = selector.base_directories(&RealFileSystem)?;
    if dirs.is_empty() {
        return Err(SizzleError::NoTargets);
    }

    // Channel from the blocking notify callback into the async world.
    let (event_tx, event_rx) = mpsc::unbounded_channel::<notify::Result<Event>>();

    // Closure called synchronously by notify whenever an event arrives.
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| {
            // The receiver only goes away once the session is over.
            let _ = event_tx.send(res);
        },
        Config::default(),
    )?;

    for dir in &dirs {
        watcher.watch(dir, RecursiveMode::Recursive)?;
        info!("watching {:?}", dir);
    }

    let filter = EventFilter::new(selector, options.debounce).with_roots(dirs.clone());
    tokio::spawn(forward_events(event_rx, filter, runtime_tx));

    Ok(WatcherHandle {
        _inner: watcher,
        dirs,
    })
}

async fn forward_events(
    mut event_rx: mpsc::UnboundedReceiver<notify::Result<Event>>,
    mut filter: EventFilter,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) {
    while let Some(res) = event_rx.recv().await {
        let event = match res {
            Ok(event) => event,
            Err(err) => {
                error!(error = %err, "file watcher failed");
                let _ = runtime_tx
                    .send(RuntimeEvent::WatchFailed(SizzleError::Watch(err)))
                    .await;
                return;
            }
        };

        trace!(?event, "received notify event");

        if let Some(root) = filter.lost_root(&event) {
            error!(root = ?root, "watched directory disappeared");
            let _ = runtime_tx
                .send(RuntimeEvent::WatchFailed(SizzleError::WatchRootRemoved(root)))
                .await;
            return;
        }

        for change in filter.accept(&event, Instant::now()) {
            debug!(path = ?change.path, "accepted change");
            if runtime_tx.send(RuntimeEvent::FileChanged(change)).await.is_err() {
                debug!("runtime channel closed; stopping watcher loop");
                return;
            }
        }
    }

    debug!("watcher event loop finished");
    let _ = runtime_tx
        .send(RuntimeEvent::WatchFailed(SizzleError::WatchStreamClosed))
        .await;
}
