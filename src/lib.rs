// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod types;
pub mod watch;

use std::io::Write;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::{CliArgs, Command, GlobalArgs, PipelineArgs, WatchArgs};
use crate::config::{find_sizzlefile, load_and_validate, run_init, select_target, SessionSpec};
use crate::engine::{
    CoreRuntime, Notifier, NullNotifier, Runtime, RuntimeEvent, TerminalNotifier,
    TerminalReporter,
};
use crate::exec::{Executor, PipelineConfig};
use crate::fs::RealFileSystem;
use crate::types::ShellSpec;
use crate::watch::path_utils::resolve_working_dir;
use crate::watch::{spawn_watcher, Selector, WatchOptions};

/// High-level entry point used by `main.rs`.
///
/// Dispatches to one of:
/// - an ad-hoc watch session from flags (no subcommand)
/// - `command`: run the pipeline once
/// - `list`: print the selected files
/// - `init`: write a Sizzlefile interactively
/// - `run`: watch with a Sizzlefile target
pub async fn run(args: CliArgs) -> Result<ExitCode> {
    let cwd = resolve_working_dir(None)?;

    match args.command {
        None => {
            let pipeline = pipeline_config(&args.pipeline, args.global.show_output);
            let session =
                SessionSpec::ad_hoc(&cwd, args.watch.watch, args.watch.exclude, pipeline)?;
            watch_session(session, &args.global).await
        }
        Some(Command::Command { pipeline }) => {
            run_once(pipeline_config(&pipeline, args.global.show_output), &args.global).await
        }
        Some(Command::List { watch }) => list_files(&cwd, &watch),
        Some(Command::Init) => {
            let stdin = std::io::stdin();
            run_init(stdin.lock(), std::io::stdout(), &cwd)?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Command::Run {
            sizzlefile,
            target,
            args: target_args,
        }) => {
            let fs = RealFileSystem;
            let path = find_sizzlefile(&fs, &cwd, sizzlefile.as_deref())?;
            let file = load_and_validate(&fs, &path)?;
            let (name, target) = select_target(&file, target.as_deref())?;
            let base_dir = file.base_dir().unwrap_or(cwd.as_path());

            info!(sizzlefile = %path.display(), target = name, "loaded target");

            let session = SessionSpec::from_target(name, target, base_dir, target_args)?
                .with_show_output(args.global.show_output);
            watch_session(session, &args.global).await
        }
    }
}

fn pipeline_config(args: &PipelineArgs, show_output: bool) -> PipelineConfig {
    PipelineConfig {
        commands: args.cmd.clone(),
        pass_commands: args.pass.clone(),
        fail_commands: args.fail.clone(),
        shell: ShellSpec::from_override(args.shell.as_deref()),
        dir: None,
        show_output,
    }
}

fn notifier(global: &GlobalArgs) -> Arc<dyn Notifier> {
    if global.no_notify {
        Arc::new(NullNotifier)
    } else {
        Arc::new(TerminalNotifier::new())
    }
}

/// Watch until Ctrl-C (exit 0) or a watch failure (error).
async fn watch_session(session: SessionSpec, global: &GlobalArgs) -> Result<ExitCode> {
    let selector = session.compile_selector()?;
    debug!(?selector, "compiled selector");

    let executor = Executor::new(session.pipeline.clone());
    let runtime = Runtime::new(CoreRuntime::new(session.args.clone()), executor)
        .with_reporter(Arc::new(TerminalReporter::new(global.clear)))
        .with_notifier(notifier(global));
    let tx = runtime.event_sender();

    let watcher = spawn_watcher(
        selector,
        WatchOptions {
            debounce: global.debounce(),
        },
        tx.clone(),
    )?;
    info!(dirs = ?watcher.watched_dirs(), "watching");

    spawn_ctrl_c(tx);

    runtime.run().await?;
    Ok(ExitCode::SUCCESS)
}

/// Run the pipeline once; the exit code reflects its verdict.
async fn run_once(pipeline: PipelineConfig, global: &GlobalArgs) -> Result<ExitCode> {
    let runtime = Runtime::new(CoreRuntime::default(), Executor::new(pipeline))
        .with_reporter(Arc::new(TerminalReporter::new(global.clear)))
        .with_notifier(notifier(global));

    let record = runtime.run_once().await;
    if record.passing() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn list_files(cwd: &Path, watch: &WatchArgs) -> Result<ExitCode> {
    let selector = Selector::compile(cwd, &watch.watch, &watch.exclude)?;
    let files = selector.matching_files(&RealFileSystem)?;

    let mut out = std::io::stdout().lock();
    for file in files {
        writeln!(out, "{}", file.display())?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Ctrl-C → graceful shutdown.
fn spawn_ctrl_c(tx: mpsc::Sender<RuntimeEvent>) {
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("failed to listen for Ctrl+C: {e}");
            return;
        }
        let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
    });
}
