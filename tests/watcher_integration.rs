// tests/watcher_integration.rs

mod common;
use crate::common::{canonical, init_tracing, write_file};

use std::error::Error;
use std::time::Duration;

use sizzle::engine::RuntimeEvent;
use sizzle::errors::SizzleError;
use sizzle::watch::{spawn_watcher, Selector, WatchOptions};
use tokio::sync::mpsc;
use tokio::time::timeout;

type TestResult = Result<(), Box<dyn Error>>;

/// Next `FileChanged` path, skipping nothing else; `None` on timeout.
async fn next_change(rx: &mut mpsc::Receiver<RuntimeEvent>, wait: Duration) -> Option<RuntimeEvent> {
    timeout(wait, rx.recv()).await.ok().flatten()
}

#[tokio::test]
async fn selected_write_is_forwarded_once() -> TestResult {
    init_tracing();
    let tmp = tempfile::tempdir()?;
    let root = canonical(tmp.path());
    let file = write_file(&root, "src/lib.rs", "one");
    write_file(&root, "notes.txt", "");

    let selector = Selector::compile(&root, &["src/**/*.rs".to_string()], &[])?;
    let (tx, mut rx) = mpsc::channel(16);
    let handle = spawn_watcher(selector, WatchOptions::default(), tx)?;
    assert_eq!(handle.watched_dirs(), &[root.join("src")]);

    // Give the backend a moment to register the watches.
    tokio::time::sleep(Duration::from_millis(200)).await;

    std::fs::write(&file, "two")?;

    match next_change(&mut rx, Duration::from_secs(5)).await {
        Some(RuntimeEvent::FileChanged(change)) => assert_eq!(change.path, file),
        other => panic!("expected FileChanged, got {other:?}"),
    }

    // An unselected file in a watched tree stays silent.
    write_file(&root, "src/README.md", "x");
    match next_change(&mut rx, Duration::from_millis(400)).await {
        None => {}
        Some(RuntimeEvent::FileChanged(change)) => assert_eq!(change.path, file),
        other => panic!("unexpected event {other:?}"),
    }

    drop(handle);
    Ok(())
}

#[tokio::test]
async fn nothing_to_watch_is_an_error() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let root = canonical(tmp.path());

    let selector = Selector::compile(&root, &["missing/**".to_string()], &[])?;
    let (tx, _rx) = mpsc::channel(1);

    match spawn_watcher(selector, WatchOptions::default(), tx) {
        Err(SizzleError::NoTargets) => Ok(()),
        other => panic!("expected NoTargets, got {other:?}"),
    }
}

#[tokio::test]
async fn dropping_the_handle_ends_the_stream() -> TestResult {
    init_tracing();
    let tmp = tempfile::tempdir()?;
    let root = canonical(tmp.path());
    write_file(&root, "a.txt", "");

    let selector = Selector::compile(&root, &[], &[])?;
    let (tx, mut rx) = mpsc::channel(16);
    let handle = spawn_watcher(selector, WatchOptions::default(), tx)?;
    drop(handle);

    loop {
        match next_change(&mut rx, Duration::from_secs(5)).await {
            Some(RuntimeEvent::WatchFailed(SizzleError::WatchStreamClosed)) => break,
            Some(RuntimeEvent::FileChanged(_)) => continue,
            other => panic!("expected WatchStreamClosed, got {other:?}"),
        }
    }
    Ok(())
}

#[tokio::test]
async fn removing_the_watched_dir_ends_the_session() -> TestResult {
    init_tracing();
    let tmp = tempfile::tempdir()?;
    let root = canonical(tmp.path());
    write_file(&root, "src/lib.rs", "one");
    let src = root.join("src");

    let selector = Selector::compile(&root, &["src/**/*.rs".to_string()], &[])?;
    let (tx, mut rx) = mpsc::channel(64);
    let handle = spawn_watcher(selector, WatchOptions::default(), tx)?;
    assert_eq!(handle.watched_dirs(), &[src.clone()]);

    tokio::time::sleep(Duration::from_millis(200)).await;
    std::fs::remove_dir_all(&src)?;

    loop {
        match next_change(&mut rx, Duration::from_secs(5)).await {
            Some(RuntimeEvent::WatchFailed(SizzleError::WatchRootRemoved(dir))) => {
                assert_eq!(dir, src);
                break;
            }
            Some(RuntimeEvent::FileChanged(_)) => continue,
            other => panic!("expected WatchRootRemoved, got {other:?}"),
        }
    }

    // Nothing follows the terminal error.
    assert!(next_change(&mut rx, Duration::from_millis(200)).await.is_none());
    drop(handle);
    Ok(())
}
