// src/engine/runtime.rs

use std::fmt;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::exec::PipelineBackend;
use crate::types::Trigger;

use super::core::CoreRuntime;
use super::report::{Notifier, Reporter, RunRecord, TerminalNotifier, TerminalReporter};
use super::tracker::ResultTracker;
use super::{CoreCommand, RuntimeEvent};

/// Capacity of the runtime's fan-in event channel.
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Drives pipeline runs in response to `RuntimeEvent`s and delegates actual
/// command execution to a `PipelineBackend`.
///
/// This is an IO shell around `CoreRuntime`, which decides what each event
/// means. Every run is spawned onto its own task; the only state runs share
/// is the [`ResultTracker`].
pub struct Runtime<B: PipelineBackend + 'static> {
    core: CoreRuntime,
    event_tx: mpsc::Sender<RuntimeEvent>,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    backend: Arc<B>,
    tracker: Arc<Mutex<ResultTracker>>,
    reporter: Arc<dyn Reporter>,
    notifier: Arc<dyn Notifier>,
    runs: JoinSet<()>,
}

impl<B: PipelineBackend + 'static> fmt::Debug for Runtime<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .field("in_flight", &self.runs.len())
            .finish_non_exhaustive()
    }
}

impl<B: PipelineBackend + 'static> Runtime<B> {
    pub fn new(core: CoreRuntime, backend: B) -> Self {
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            core,
            event_tx,
            event_rx,
            backend: Arc::new(backend),
            tracker: Arc::new(Mutex::new(ResultTracker::new())),
            reporter: Arc::new(TerminalReporter::default()),
            notifier: Arc::new(TerminalNotifier::new()),
            runs: JoinSet::new(),
        }
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Sender for producers (watcher, signal handler) to feed the loop.
    pub fn event_sender(&self) -> mpsc::Sender<RuntimeEvent> {
        self.event_tx.clone()
    }

    /// Shared tracker, for inspection.
    pub fn tracker(&self) -> Arc<Mutex<ResultTracker>> {
        Arc::clone(&self.tracker)
    }

    /// Run the pipeline exactly once for the initial trigger and report it.
    pub async fn run_once(self) -> RunRecord {
        let trigger = Trigger::initial(self.core.args().to_vec());
        self.reporter.run_started(&trigger);
        let result = self
            .backend
            .run_tracked(trigger.clone(), &self.tracker)
            .await;
        let record = RunRecord::new(trigger, result);
        self.report(&record);
        record
    }

    /// Main event loop of a watch session.
    ///
    /// - Starts the initial run.
    /// - Consumes `RuntimeEvent`s and feeds them into the core.
    /// - Executes commands returned by the core (spawn runs, report, abort).
    ///
    /// Returns `Ok` on shutdown and the watch error if the change source
    /// failed. Runs still in flight are aborted either way, which kills
    /// their child processes.
    pub async fn run(mut self) -> Result<()> {
        info!("sizzle runtime started");

        let outcome = self.event_loop().await;

        if !self.runs.is_empty() {
            info!(in_flight = self.runs.len(), "aborting in-flight runs");
        }
        self.runs.shutdown().await;

        info!("runtime exiting");
        outcome
    }

    async fn event_loop(&mut self) -> Result<()> {
        let start = self.core.start();
        for command in start.commands {
            self.execute_command(command)?;
        }

        loop {
            // The runtime holds a sender itself, so `None` cannot happen while
            // it is alive; handled for completeness.
            let event = match self.event_rx.recv().await {
                Some(e) => e,
                None => {
                    info!("runtime event channel closed; exiting");
                    return Ok(());
                }
            };

            debug!(?event, "runtime received event");

            let step = self.core.step(event);

            for command in step.commands {
                self.execute_command(command)?;
            }

            self.reap_finished();

            if !step.keep_running {
                info!("core requested exit; stopping runtime");
                return Ok(());
            }
        }
    }

    /// Execute a single command from the core.
    fn execute_command(&mut self, command: CoreCommand) -> Result<()> {
        match command {
            CoreCommand::StartRun(trigger) => self.spawn_run(trigger),
            CoreCommand::Report(record) => self.report(&record),
            CoreCommand::Abort(err) => return Err(err),
        }
        Ok(())
    }

    fn spawn_run(&mut self, trigger: Trigger) {
        debug!(reason = ?trigger.reason, changed = ?trigger.changed, "starting run");
        self.reporter.run_started(&trigger);

        let backend = Arc::clone(&self.backend);
        let tracker = Arc::clone(&self.tracker);
        let tx = self.event_tx.clone();

        self.runs.spawn(async move {
            let result = backend.run_tracked(trigger.clone(), &tracker).await;
            let record = RunRecord::new(trigger, result);
            if tx.send(RuntimeEvent::RunCompleted(record)).await.is_err() {
                debug!("runtime gone before run completed");
            }
        });
    }

    fn report(&self, record: &RunRecord) {
        info!(
            classification = %record.classification,
            duration_ms = record.duration.as_millis() as u64,
            "run finished"
        );
        self.reporter.run_finished(record);
        if let Some(message) = record.classification.notification() {
            self.notifier.notify(message);
        }
    }

    /// Drop handles of runs that already finished.
    fn reap_finished(&mut self) {
        while let Some(joined) = self.runs.try_join_next() {
            if let Err(err) = joined {
                if err.is_panic() {
                    warn!(error = %err, "pipeline run panicked");
                }
            }
        }
    }
}
