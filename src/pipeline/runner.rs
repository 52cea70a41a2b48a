//! Streaming runner — the main pipeline execution loop.
//!
//! Each iteration:
//! 1. Pull the next instance from the reader (exhaustion → `Completed`,
//!    read error → `Failed`).
//! 2. Apply each filter in declared order.
//! 3. Ask the learner for a prediction, then update it — predict before
//!    learn, so measures reflect streaming (prequential) accuracy.
//! 4. Forward the (instance, prediction) pair to the evaluator.
//! 5. On the reporting cadence, snapshot the evaluator's measures and
//!    summary and publish them on the report channel.

use crate::pipeline::error::{PipelineError, PipelineResult};
use crate::pipeline::stage::{Evaluator, Filter, Learner, Reader};
use crate::types::{Instance, Measures};
use chrono::{DateTime, Utc};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::time::{Duration, Instant};

/// Lifecycle of a pipeline run. `Completed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Completed,
    Failed,
}

impl RunState {
    pub fn is_terminal(self) -> bool {
        matches!(self, RunState::Completed | RunState::Failed)
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RunState::Idle => "Idle",
            RunState::Running => "Running",
            RunState::Completed => "Completed",
            RunState::Failed => "Failed",
        };
        write!(f, "{}", name)
    }
}

/// The four stages of a pipeline, outside of a pipeline.
///
/// Returned by [`Pipeline::dismantle`] so a caller can reuse stages across
/// sequential runs — most commonly handing a trained learner to a second
/// pipeline. The hand-off is sequenced by ownership: the first run must be
/// over before the stages can be taken.
pub struct PipelineStages {
    pub reader: Box<dyn Reader>,
    pub filters: Vec<Box<dyn Filter>>,
    pub learner: Box<dyn Learner>,
    pub evaluator: Box<dyn Evaluator>,
}

/// An assembled Reader → Filters → Learner → Evaluator chain.
///
/// Owns its stages for its entire execution lifetime and releases them
/// exactly once — either through [`Pipeline::dismantle`] or on drop.
pub struct Pipeline {
    reader: Box<dyn Reader>,
    filters: Vec<Box<dyn Filter>>,
    learner: Box<dyn Learner>,
    evaluator: Box<dyn Evaluator>,
    state: RunState,
}

impl Pipeline {
    /// Build a pipeline directly from stages (the assembler's and tests'
    /// entry point). The pipeline starts `Idle`.
    pub fn from_stages(stages: PipelineStages) -> Self {
        Self {
            reader: stages.reader,
            filters: stages.filters,
            learner: stages.learner,
            evaluator: stages.evaluator,
            state: RunState::Idle,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Names of the stages in chain order, for logging and display.
    pub fn stage_names(&self) -> Vec<String> {
        let mut names = vec![self.reader.name().to_string()];
        names.extend(self.filters.iter().map(|f| f.name().to_string()));
        names.push(self.learner.name().to_string());
        names.push(self.evaluator.name().to_string());
        names
    }

    /// Read-only access to the evaluator (e.g. to inspect final measures).
    pub fn evaluator(&self) -> &dyn Evaluator {
        self.evaluator.as_ref()
    }

    /// Take the stages back out, consuming the pipeline.
    pub fn dismantle(self) -> PipelineStages {
        PipelineStages {
            reader: self.reader,
            filters: self.filters,
            learner: self.learner,
            evaluator: self.evaluator,
        }
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stage_names())
            .field("state", &self.state)
            .finish()
    }
}

/// Messages published by the runner on its report channel.
#[derive(Debug, Clone)]
pub enum RunnerMessage {
    /// Periodic snapshot on the reporting cadence.
    Report {
        instances_seen: u64,
        measures: Option<Measures>,
        summary: String,
    },
    /// The reader was exhausted and the run finished normally.
    Completed { instances_seen: u64 },
    /// The run stopped on an error.
    Failed {
        instances_seen: u64,
        error: String,
    },
}

/// Report channel capacity. Reports are periodic snapshots, not data; a
/// small bound is plenty and a full channel simply drops the snapshot.
const REPORT_CHANNEL_CAPACITY: usize = 256;

/// Create a bounded channel for [`RunnerMessage`] snapshots.
pub fn report_channel() -> (Sender<RunnerMessage>, Receiver<RunnerMessage>) {
    bounded(REPORT_CHANNEL_CAPACITY)
}

/// Outcome of a completed (or failed) run.
#[derive(Debug)]
pub struct RunReport {
    /// Terminal state: `Completed` or `Failed`.
    pub state: RunState,
    /// Instances fully processed (predict + train + evaluator accept).
    pub instances_seen: u64,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
    /// The evaluator's final summary string.
    pub summary: String,
    /// The evaluator's final measures, if it tracks any.
    pub measures: Option<Measures>,
    /// The error that terminated the run, when `state` is `Failed`.
    pub error: Option<PipelineError>,
}

/// Drives a [`Pipeline`] from `Idle` to a terminal state.
#[derive(Default)]
pub struct Runner {
    report_every: Option<u64>,
    report_tx: Option<Sender<RunnerMessage>>,
}

impl Runner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report every `n` instances, overriding the evaluator's own cadence.
    pub fn report_every(mut self, n: u64) -> Self {
        self.report_every = Some(n.max(1));
        self
    }

    /// Publish cadence snapshots and the terminal message on `tx`.
    pub fn with_report_channel(mut self, tx: Sender<RunnerMessage>) -> Self {
        self.report_tx = Some(tx);
        self
    }

    /// Run the pipeline to a terminal state.
    ///
    /// Returns `Err` only when the pipeline is not `Idle`; a run that stops
    /// on a reader or filter error still returns `Ok` with a `Failed` report
    /// carrying the error.
    pub fn run(&self, pipeline: &mut Pipeline) -> PipelineResult<RunReport> {
        if pipeline.state != RunState::Idle {
            return Err(PipelineError::NotIdle {
                state: pipeline.state,
            });
        }

        let cadence = self
            .report_every
            .or_else(|| pipeline.evaluator.report_frequency())
            .map(|n| n.max(1));

        pipeline.state = RunState::Running;
        let started_at = Utc::now();
        let start = Instant::now();
        let mut seen: u64 = 0;

        tracing::info!(
            "Pipeline started: {}",
            pipeline.stage_names().join(" -> ")
        );

        let error = loop {
            let instance = match pipeline.reader.next_instance() {
                Ok(Some(instance)) => instance,
                Ok(None) => break None,
                Err(e) => {
                    tracing::warn!("Reader '{}' failed: {}", pipeline.reader.name(), e);
                    break Some(PipelineError::Read(e));
                }
            };

            let instance = match apply_filters(&mut pipeline.filters, instance) {
                Ok(instance) => instance,
                Err(e) => {
                    tracing::warn!("Filter failed: {}", e);
                    break Some(e);
                }
            };

            // Predict before learn: measures must reflect the model state
            // prior to seeing this instance.
            let prediction = pipeline.learner.predict(&instance);
            pipeline.learner.train(&instance);
            pipeline.evaluator.add_result(&instance, &prediction);
            seen += 1;

            if let Some(every) = cadence {
                if seen % every == 0 {
                    self.publish_report(pipeline, seen);
                }
            }
        };

        let elapsed = start.elapsed();
        let state = match &error {
            None => RunState::Completed,
            Some(_) => RunState::Failed,
        };
        pipeline.state = state;

        match &error {
            None => {
                tracing::info!("Pipeline completed: {} instances in {:?}", seen, elapsed);
                self.try_send(RunnerMessage::Completed {
                    instances_seen: seen,
                });
            }
            Some(e) => {
                tracing::error!("Pipeline failed after {} instances: {}", seen, e);
                self.try_send(RunnerMessage::Failed {
                    instances_seen: seen,
                    error: e.to_string(),
                });
            }
        }

        Ok(RunReport {
            state,
            instances_seen: seen,
            started_at,
            elapsed,
            summary: pipeline.evaluator.summary(),
            measures: pipeline.evaluator.measures(),
            error,
        })
    }

    fn publish_report(&self, pipeline: &Pipeline, seen: u64) {
        let measures = pipeline.evaluator.measures();
        let summary = pipeline.evaluator.summary();
        tracing::debug!(
            "Report at {} instances: {}",
            seen,
            measures
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| "no measures".to_string())
        );
        self.try_send(RunnerMessage::Report {
            instances_seen: seen,
            measures,
            summary,
        });
    }

    /// Non-blocking send: a full or disconnected channel must never stall or
    /// fail the run.
    fn try_send(&self, msg: RunnerMessage) {
        if let Some(tx) = &self.report_tx {
            let _ = tx.try_send(msg);
        }
    }
}

/// Run one instance through the filter chain in declared order.
fn apply_filters(
    filters: &mut [Box<dyn Filter>],
    mut instance: Instance,
) -> PipelineResult<Instance> {
    for filter in filters {
        instance = filter.apply(instance)?;
    }
    Ok(instance)
}
