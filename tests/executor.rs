// tests/executor.rs
#![cfg(unix)]

mod common;
use crate::common::{init_tracing, CaptureSink};

use std::error::Error;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use sizzle::engine::ResultTracker;
use sizzle::exec::{run_command, CommandSpec, Executor, PipelineConfig, CHANGED_ENV};
use sizzle::types::{ChangeEvent, ShellSpec, Trigger};

type TestResult = Result<(), Box<dyn Error>>;

fn list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn executor(
    commands: &[&str],
    pass: &[&str],
    fail: &[&str],
    show_output: bool,
) -> (Executor, CaptureSink) {
    let sink = CaptureSink::new();
    let config = PipelineConfig {
        commands: list(commands),
        pass_commands: list(pass),
        fail_commands: list(fail),
        shell: ShellSpec::new("sh"),
        dir: None,
        show_output,
    };
    (Executor::with_sink(config, Arc::new(sink.clone())), sink)
}

#[tokio::test]
async fn run_commands_table() -> TestResult {
    init_tracing();

    let cases: &[(&[&str], &[&str], &[&str], bool, bool, &str)] = &[
        // Output visibility
        (&["echo foo"], &[], &[], false, true, ""),
        (&["echo foo"], &[], &[], true, true, "foo\n"),
        (&["echo foo", "echo bar"], &[], &[], true, true, "foo\nbar\n"),
        (&["echo foo 1>&2"], &[], &[], false, true, "foo\n"),
        (&["echo foo 1>&2"], &[], &[], true, true, "foo\n"),
        (&["echo foo; echo bar 1>&2"], &[], &[], true, true, "foo\nbar\n"),
        // Output comes before error
        (&["echo foo; echo bar 1>&2; echo baz"], &[], &[], true, true, "foo\nbaz\nbar\n"),
        // Failures
        (&["exit 1"], &[], &[], false, false, ""),
        (&["echo foo; exit 1"], &[], &[], false, false, "sizzle: output of `echo foo; exit 1`:\nfoo\n"),
        (
            &["echo foo; echo bar 1>&2; exit 1"],
            &[],
            &[],
            false,
            false,
            "sizzle: output of `echo foo; echo bar 1>&2; exit 1`:\nfoo\nbar\n",
        ),
        // Pass / fail branches
        (&["echo foo; exit 0"], &["echo yes"], &["echo no"], true, true, "foo\nyes\n"),
        (&["echo foo; exit 1"], &["echo yes"], &["echo no"], true, false, "foo\nno\n"),
        (&["echo foo; exit 0"], &["echo yes", "echo again"], &["echo no"], true, true, "foo\nyes\nagain\n"),
        (&["echo foo; exit 1"], &["echo yes"], &["echo no", "echo again"], true, false, "foo\nno\nagain\n"),
        // Branch failures never change the verdict
        (&["echo foo; exit 0"], &["echo yes; exit 1"], &["echo no"], true, true, "foo\nyes\n"),
        (&["echo foo; exit 1"], &["echo yes"], &["echo no; exit 1"], true, false, "foo\nno\n"),
        // Branch output when hidden
        (&["echo foo; exit 0"], &["echo yes"], &["echo no"], false, true, ""),
        (&["echo foo; exit 0"], &["echo yes 1>&2"], &["echo no"], false, true, "yes\n"),
        (&["echo foo; exit 1"], &["echo yes"], &["echo no"], false, false, "sizzle: output of `echo foo; exit 1`:\nfoo\n"),
        (&["echo foo; exit 1"], &["echo yes"], &["echo no 1>&2"], false, false, "sizzle: output of `echo foo; exit 1`:\nfoo\nno\n"),
    ];

    for (i, (cmds, pass, fail, show, passing, output)) in cases.iter().enumerate() {
        let (exec, sink) = executor(cmds, pass, fail, *show);
        let tracker = Mutex::new(ResultTracker::new());

        let result = exec.run(Trigger::initial(Vec::new()), &tracker).await;

        assert_eq!(result.passing, *passing, "{i}. {cmds:?} verdict");
        assert!(result.is_first_run, "{i}. first run");
        assert!(result.was_passing, "{i}. was_passing starts true");
        assert_eq!(sink.combined(), *output, "{i}. {cmds:?} output");
    }
    Ok(())
}

#[tokio::test]
async fn stops_at_first_failing_command() -> TestResult {
    let (exec, sink) = executor(&["echo one", "exit 3", "echo three"], &[], &[], true);

    let outcome = exec.execute(&Trigger::initial(Vec::new())).await;

    assert!(!outcome.passing);
    assert_eq!(sink.combined(), "one\n");
    Ok(())
}

#[tokio::test]
async fn replayed_stdout_is_marked_apart_from_stderr() -> TestResult {
    let (exec, sink) = executor(&["echo out; echo err 1>&2; exit 2"], &[], &[], false);

    let outcome = exec.execute(&Trigger::initial(Vec::new())).await;

    assert!(!outcome.passing);
    assert_eq!(sink.stdout_text(), "");
    assert_eq!(
        sink.stderr_text(),
        "sizzle: output of `echo out; echo err 1>&2; exit 2`:\nout\nerr\n"
    );
    Ok(())
}

#[tokio::test]
async fn second_run_reports_previous_verdict() -> TestResult {
    let (exec, _sink) = executor(&["exit 1"], &[], &[], false);
    let tracker = Mutex::new(ResultTracker::new());

    let first = exec.run(Trigger::initial(Vec::new()), &tracker).await;
    let second = exec.run(Trigger::initial(Vec::new()), &tracker).await;

    assert!(first.is_first_run && first.was_passing && !first.passing);
    assert!(!second.is_first_run && !second.was_passing && !second.passing);
    Ok(())
}

#[tokio::test]
async fn arguments_fill_placeholders() -> TestResult {
    let (exec, sink) = executor(&["echo $1-$2"], &["echo ok $1"], &[], true);

    let outcome = exec.execute(&Trigger::initial(list(&["a", "b"]))).await;

    assert!(outcome.passing);
    assert_eq!(sink.combined(), "a-b\nok a\n");
    Ok(())
}

#[tokio::test]
async fn changed_path_is_exported() -> TestResult {
    let cmd = format!("echo \"${CHANGED_ENV}\"");
    let (exec, sink) = executor(&[cmd.as_str()], &[], &[], true);

    let change = ChangeEvent::new("/proj/src/lib.rs");
    exec.execute(&Trigger::from_change(change, Vec::new())).await;
    exec.execute(&Trigger::initial(Vec::new())).await;

    assert_eq!(sink.combined(), "/proj/src/lib.rs\n\n");
    Ok(())
}

#[tokio::test]
async fn commands_run_in_configured_dir() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let dir = common::canonical(tmp.path());
    let sink = CaptureSink::new();

    let spec = CommandSpec::new("pwd -P").with_dir(Some(dir.clone()));
    let status = run_command(&spec, &[], None, true, &sink).await?;

    assert!(status.success());
    assert_eq!(PathBuf::from(sink.stdout_text().trim_end()), dir);
    Ok(())
}

#[tokio::test]
async fn missing_shell_is_a_failed_run_not_an_error() -> TestResult {
    let sink = CaptureSink::new();
    let config = PipelineConfig {
        shell: ShellSpec::new("/definitely/not/a/shell"),
        ..PipelineConfig::new(list(&["echo hi"]))
    };
    let exec = Executor::with_sink(config, Arc::new(sink.clone()));

    let outcome = exec.execute(&Trigger::initial(Vec::new())).await;

    assert!(!outcome.passing);
    assert!(sink.stderr_text().starts_with("sizzle: "), "got {:?}", sink.stderr_text());
    Ok(())
}

#[tokio::test]
async fn spawn_error_surfaces_from_run_command() {
    let sink = CaptureSink::new();
    let spec = CommandSpec::new("true").with_shell(ShellSpec::new("/definitely/not/a/shell"));

    let err = run_command(&spec, &[], None, false, &sink).await.unwrap_err();
    assert!(format!("{err:#}").contains("spawning"));
}
