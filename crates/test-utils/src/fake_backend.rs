use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Local;
use sizzle::exec::PipelineBackend;
use sizzle::types::{PipelineOutcome, Trigger};

/// A fake pipeline backend that:
/// - records every trigger it was asked to run
/// - answers with scripted verdicts (then passes once the script runs out)
/// - optionally sleeps, so runs can overlap.
#[derive(Clone, Default)]
pub struct FakeBackend {
    verdicts: Arc<Mutex<VecDeque<bool>>>,
    triggers: Arc<Mutex<Vec<Trigger>>>,
    delay: Option<Duration>,
}

impl FakeBackend {
    pub fn new(verdicts: impl IntoIterator<Item = bool>) -> Self {
        Self {
            verdicts: Arc::new(Mutex::new(verdicts.into_iter().collect())),
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Shared handle to the triggers seen so far.
    pub fn triggers(&self) -> Arc<Mutex<Vec<Trigger>>> {
        Arc::clone(&self.triggers)
    }
}

impl PipelineBackend for FakeBackend {
    fn run_pipeline(
        &self,
        trigger: Trigger,
    ) -> Pin<Box<dyn Future<Output = PipelineOutcome> + Send + '_>> {
        Box::pin(async move {
            let started_at = Local::now();
            self.triggers.lock().unwrap().push(trigger);
            let passing = self.verdicts.lock().unwrap().pop_front().unwrap_or(true);

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            PipelineOutcome {
                passing,
                started_at,
                finished_at: Local::now(),
            }
        })
    }
}
