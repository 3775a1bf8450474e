// src/exec/pipeline.rs

//! The pipeline executor: main commands, then the pass or fail branch.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::Local;
use tracing::{debug, info, warn};

use crate::engine::tracker::ResultTracker;
use crate::exec::backend::PipelineBackend;
use crate::exec::command::{run_command, CommandSpec};
use crate::exec::output::{OutputSink, StdioSink};
use crate::types::{PipelineOutcome, RunResult, ShellSpec, Trigger};

/// Command lists and execution settings for one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub commands: Vec<String>,
    pub pass_commands: Vec<String>,
    pub fail_commands: Vec<String>,
    pub shell: ShellSpec,
    pub dir: Option<PathBuf>,
    pub show_output: bool,
}

impl PipelineConfig {
    pub fn new(commands: Vec<String>) -> Self {
        Self {
            commands,
            pass_commands: Vec::new(),
            fail_commands: Vec::new(),
            shell: ShellSpec::default(),
            dir: None,
            show_output: false,
        }
    }
}

/// Runs a [`PipelineConfig`] once per trigger.
///
/// The executor itself holds no run state, so concurrent runs only share
/// whatever [`ResultTracker`] the caller passes in.
#[derive(Clone)]
pub struct Executor {
    config: PipelineConfig,
    sink: Arc<dyn OutputSink>,
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Executor {
    pub fn new(config: PipelineConfig) -> Self {
        Self::with_sink(config, Arc::new(StdioSink))
    }

    pub fn with_sink(config: PipelineConfig, sink: Arc<dyn OutputSink>) -> Self {
        Self { config, sink }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the pipeline and record the verdict in `tracker`.
    ///
    /// The tracker lock is only taken for the bookkeeping before and after
    /// execution, never while commands run.
    pub async fn run(&self, trigger: Trigger, tracker: &Mutex<ResultTracker>) -> RunResult {
        self.run_tracked(trigger, tracker).await
    }

    /// Run main commands in order, stopping at the first failure, then the
    /// pass or fail list.
    ///
    /// Only main commands decide `passing`; the branch lists are
    /// side-effects whose failures are logged and otherwise ignored.
    pub async fn execute(&self, trigger: &Trigger) -> PipelineOutcome {
        let started_at = Local::now();
        let mut passing = true;

        for command in &self.config.commands {
            if !self.run_one(command, trigger).await {
                info!(cmd = %command, "command failed; skipping remaining commands");
                passing = false;
                break;
            }
        }

        if passing {
            self.run_best_effort(&self.config.pass_commands, trigger, "pass")
                .await;
        } else {
            self.run_best_effort(&self.config.fail_commands, trigger, "fail")
                .await;
        }

        PipelineOutcome {
            passing,
            started_at,
            finished_at: Local::now(),
        }
    }

    /// Run a branch list to completion; never reports failure to the caller.
    async fn run_best_effort(&self, commands: &[String], trigger: &Trigger, branch: &str) {
        for command in commands {
            if !self.run_one(command, trigger).await {
                warn!(branch, cmd = %command, "branch command failed; ignoring");
            }
        }
    }

    async fn run_one(&self, command: &str, trigger: &Trigger) -> bool {
        let spec = CommandSpec::new(command)
            .with_dir(self.config.dir.clone())
            .with_shell(self.config.shell.clone());

        match run_command(
            &spec,
            &trigger.args,
            trigger.changed_path(),
            self.config.show_output,
            self.sink.as_ref(),
        )
        .await
        {
            Ok(status) => status.success(),
            Err(err) => {
                debug!(cmd = %command, error = %err, "command could not be run");
                self.sink
                    .stderr(format!("sizzle: {err:#}\n").as_bytes());
                false
            }
        }
    }
}

impl PipelineBackend for Executor {
    fn run_pipeline(
        &self,
        trigger: Trigger,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = PipelineOutcome> + Send + '_>> {
        Box::pin(async move { self.execute(&trigger).await })
    }
}
