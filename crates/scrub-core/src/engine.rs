//! Batch scrubbing engine
//!
//! Drives the mutator over a work set and aggregates the outcome. Both
//! callers go through here: the admin bulk action runs fail-fast, the CLI
//! cleanup runs best-effort. Records are processed strictly in input order,
//! one store transaction at a time.

use crate::{RecordId, RecordMutator, Result, ScrubError};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

/// How individual failures affect the rest of the batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchMode {
    /// Abort on the first failure and report the whole batch as failed
    #[default]
    FailFast,
    /// Attempt every id and count failures
    BestEffort,
}

impl BatchMode {
    pub fn from_stop_on_first_error(stop: bool) -> Self {
        if stop {
            BatchMode::FailFast
        } else {
            BatchMode::BestEffort
        }
    }

    pub fn stops_on_first_error(self) -> bool {
        matches!(self, BatchMode::FailFast)
    }
}

/// Cooperative cancellation, checked between records
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    pub mode: BatchMode,
    pub cancel: Option<CancelFlag>,
}

impl BatchOptions {
    pub fn fail_fast() -> Self {
        Self {
            mode: BatchMode::FailFast,
            cancel: None,
        }
    }

    pub fn best_effort() -> Self {
        Self {
            mode: BatchMode::BestEffort,
            cancel: None,
        }
    }

    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

/// Aggregated result of one batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Stopped early because the cancel flag was raised
    pub cancelled: bool,
}

impl BatchOutcome {
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    pub fn is_complete_success(&self) -> bool {
        !self.cancelled && self.failed == 0
    }
}

/// Receives one tick per processed record
pub trait ProgressSink: Send {
    fn tick(&mut self, id: RecordId, ok: bool);

    fn finish(&mut self, _outcome: &BatchOutcome) {}
}

/// Sink for callers that do not report progress
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn tick(&mut self, _id: RecordId, _ok: bool) {}
}

pub struct BatchEngine {
    mutator: RecordMutator,
}

impl BatchEngine {
    pub fn new(mutator: RecordMutator) -> Self {
        Self { mutator }
    }

    pub async fn run_batch(
        &self,
        ids: &[RecordId],
        options: BatchOptions,
        progress: &mut dyn ProgressSink,
    ) -> Result<BatchOutcome> {
        if ids.is_empty() {
            return Err(ScrubError::InvalidArgument(
                "at least one comment ID is required".to_string(),
            ));
        }

        let gate = self.mutator.gate();
        if !gate.is_enabled().await {
            return Err(ScrubError::NotEnabled);
        }

        // Resolved once so comparison and writes agree for the whole batch
        let target = gate.masked_value();
        let mut outcome = BatchOutcome::default();

        for &id in ids {
            if options.cancel.as_ref().is_some_and(CancelFlag::is_cancelled) {
                outcome.cancelled = true;
                break;
            }

            outcome.attempted += 1;
            match self.mutator.write(id, &target).await {
                Ok(_) => {
                    outcome.succeeded += 1;
                    progress.tick(id, true);
                }
                Err(e) => {
                    outcome.failed += 1;
                    progress.tick(id, false);
                    warn!(%id, code = e.code(), error = %e, "comment scrub failed");

                    if options.mode.stops_on_first_error() {
                        progress.finish(&outcome);
                        return Err(e);
                    }
                }
            }
        }

        progress.finish(&outcome);
        info!(
            mode = ?options.mode,
            attempted = outcome.attempted,
            succeeded = outcome.succeeded,
            failed = outcome.failed,
            cancelled = outcome.cancelled,
            "batch scrub finished"
        );

        Ok(outcome)
    }
}
