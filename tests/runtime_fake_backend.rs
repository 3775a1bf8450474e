// tests/runtime_fake_backend.rs

mod common;
use crate::common::{init_tracing, with_timeout, FakeBackend, RecordingNotifier, RecordingReporter};

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use sizzle::engine::{
    Classification, CoreCommand, CoreRuntime, RunRecord, Runtime, RuntimeEvent, TrackerState,
};
use sizzle::errors::SizzleError;
use sizzle::types::{ChangeEvent, RunResult, Trigger, TriggerReason};

type TestResult = Result<(), Box<dyn Error>>;

fn args(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn core_starts_with_initial_run() {
    let mut core = CoreRuntime::new(args(&["x"]));
    let step = core.start();

    assert!(step.keep_running);
    match step.commands.as_slice() {
        [CoreCommand::StartRun(trigger)] => {
            assert_eq!(trigger.reason, TriggerReason::Initial);
            assert_eq!(trigger.args, args(&["x"]));
            assert!(trigger.changed.is_none());
        }
        other => panic!("unexpected commands: {other:?}"),
    }
    assert_eq!(core.active_runs(), 1);
}

#[test]
fn core_starts_overlapping_runs_without_queueing() {
    let mut core = CoreRuntime::new(Vec::new());
    core.start();

    for name in ["/p/a.rs", "/p/b.rs"] {
        let step = core.step(RuntimeEvent::FileChanged(ChangeEvent::new(name)));
        assert!(step.keep_running);
        assert!(matches!(
            step.commands.as_slice(),
            [CoreCommand::StartRun(t)] if t.changed.as_deref() == Some(std::path::Path::new(name))
        ));
    }
    assert_eq!(core.active_runs(), 3);
}

#[test]
fn core_reports_completed_runs() {
    let mut core = CoreRuntime::new(Vec::new());
    core.start();

    let now = chrono::Local::now();
    let result = RunResult {
        passing: false,
        was_passing: true,
        is_first_run: true,
        started_at: now,
        finished_at: now,
    };
    let step = core.step(RuntimeEvent::RunCompleted(RunRecord::new(
        Trigger::initial(Vec::new()),
        result,
    )));

    assert!(step.keep_running);
    match step.commands.as_slice() {
        [CoreCommand::Report(record)] => {
            assert_eq!(record.classification, Classification::FirstFail);
            assert!(!record.passing());
        }
        other => panic!("unexpected commands: {other:?}"),
    }
    assert_eq!(core.active_runs(), 0);
    assert_eq!(core.completed_runs(), 1);
}

#[test]
fn core_stops_on_watch_failure_and_shutdown() {
    let mut core = CoreRuntime::new(Vec::new());

    let step = core.step(RuntimeEvent::WatchFailed(SizzleError::WatchStreamClosed));
    assert!(!step.keep_running);
    assert!(matches!(
        step.commands.as_slice(),
        [CoreCommand::Abort(SizzleError::WatchStreamClosed)]
    ));

    let step = core.step(RuntimeEvent::ShutdownRequested);
    assert!(!step.keep_running);
    assert!(step.commands.is_empty());
}

#[tokio::test]
async fn run_once_reports_and_notifies() -> TestResult {
    init_tracing();
    let backend = FakeBackend::new([false]);
    let reporter = RecordingReporter::default();
    let notifier = RecordingNotifier::default();

    let runtime = Runtime::new(CoreRuntime::new(args(&["t"])), backend.clone())
        .with_reporter(Arc::new(reporter.clone()))
        .with_notifier(Arc::new(notifier.clone()));

    let record = with_timeout(runtime.run_once()).await;

    assert!(!record.passing());
    assert_eq!(record.classification, Classification::FirstFail);
    assert_eq!(reporter.started.lock().unwrap().len(), 1);
    assert_eq!(reporter.finished.lock().unwrap().len(), 1);
    assert_eq!(*notifier.messages.lock().unwrap(), vec!["✗ Failed".to_string()]);
    assert_eq!(backend.triggers().lock().unwrap()[0].args, args(&["t"]));
    Ok(())
}

#[tokio::test]
async fn watch_session_classifies_each_change() -> TestResult {
    init_tracing();
    let backend = FakeBackend::new([false, true, true]);
    let reporter = RecordingReporter::default();
    let notifier = RecordingNotifier::default();

    let runtime = Runtime::new(CoreRuntime::new(Vec::new()), backend.clone())
        .with_reporter(Arc::new(reporter.clone()))
        .with_notifier(Arc::new(notifier.clone()));
    let tracker = runtime.tracker();
    let tx = runtime.event_sender();
    let handle = tokio::spawn(runtime.run());

    // Wait for each run to be reported before sending the next change so
    // the completion order is deterministic.
    let wait_for = |n: usize| {
        let finished = Arc::clone(&reporter.finished);
        async move {
            while finished.lock().unwrap().len() < n {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        }
    };

    with_timeout(wait_for(1)).await;
    tx.send(RuntimeEvent::FileChanged(ChangeEvent::new("/p/a.rs"))).await?;
    with_timeout(wait_for(2)).await;
    tx.send(RuntimeEvent::FileChanged(ChangeEvent::new("/p/a.rs"))).await?;
    with_timeout(wait_for(3)).await;

    tx.send(RuntimeEvent::ShutdownRequested).await?;
    with_timeout(handle).await??;

    let classes: Vec<_> = reporter
        .finished
        .lock()
        .unwrap()
        .iter()
        .map(|r| r.classification)
        .collect();
    assert_eq!(
        classes,
        vec![
            Classification::FirstFail,
            Classification::Recovered,
            Classification::StillPassing
        ]
    );
    assert_eq!(
        *notifier.messages.lock().unwrap(),
        vec!["✗ Failed".to_string(), "✓ Back to normal".to_string()]
    );

    let triggers = backend.triggers();
    let triggers = triggers.lock().unwrap();
    assert_eq!(triggers[0].reason, TriggerReason::Initial);
    assert_eq!(triggers[1].reason, TriggerReason::FileChange);
    assert_eq!(tracker.lock().unwrap().state(), TrackerState::Passing);
    Ok(())
}

#[tokio::test]
async fn overlapping_runs_all_complete() -> TestResult {
    init_tracing();
    let backend = FakeBackend::default().with_delay(Duration::from_millis(100));
    let reporter = RecordingReporter::default();

    let runtime = Runtime::new(CoreRuntime::new(Vec::new()), backend.clone())
        .with_reporter(Arc::new(reporter.clone()))
        .with_notifier(Arc::new(RecordingNotifier::default()));
    let tx = runtime.event_sender();
    let handle = tokio::spawn(runtime.run());

    tx.send(RuntimeEvent::FileChanged(ChangeEvent::new("/p/a.rs"))).await?;
    tx.send(RuntimeEvent::FileChanged(ChangeEvent::new("/p/b.rs"))).await?;

    let finished = Arc::clone(&reporter.finished);
    with_timeout(async move {
        while finished.lock().unwrap().len() < 3 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await;

    // The initial run plus one per change, none queued.
    assert_eq!(reporter.started.lock().unwrap().len(), 3);
    let firsts = reporter
        .finished
        .lock()
        .unwrap()
        .iter()
        .filter(|r| r.result.is_first_run)
        .count();
    assert_eq!(firsts, 1);

    tx.send(RuntimeEvent::ShutdownRequested).await?;
    with_timeout(handle).await??;
    Ok(())
}

#[tokio::test]
async fn watch_failure_ends_session_with_error() -> TestResult {
    init_tracing();
    let runtime = Runtime::new(CoreRuntime::new(Vec::new()), FakeBackend::default())
        .with_reporter(Arc::new(RecordingReporter::default()))
        .with_notifier(Arc::new(RecordingNotifier::default()));
    let tx = runtime.event_sender();
    let handle = tokio::spawn(runtime.run());

    tx.send(RuntimeEvent::WatchFailed(SizzleError::WatchStreamClosed))
        .await?;

    match with_timeout(handle).await? {
        Err(SizzleError::WatchStreamClosed) => {}
        other => panic!("expected WatchStreamClosed, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn shutdown_aborts_in_flight_runs() -> TestResult {
    init_tracing();
    let backend = FakeBackend::default().with_delay(Duration::from_secs(60));
    let reporter = RecordingReporter::default();

    let runtime = Runtime::new(CoreRuntime::new(Vec::new()), backend)
        .with_reporter(Arc::new(reporter.clone()))
        .with_notifier(Arc::new(RecordingNotifier::default()));
    let tx = runtime.event_sender();
    let handle = tokio::spawn(runtime.run());

    tx.send(RuntimeEvent::ShutdownRequested).await?;
    with_timeout(handle).await??;

    assert_eq!(reporter.started.lock().unwrap().len(), 1);
    assert!(reporter.finished.lock().unwrap().is_empty());
    Ok(())
}
