//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use streammine_rs::pipeline::{
    Evaluator, Filter, Learner, PipelineResult, ReadError, Reader,
};
use streammine_rs::types::{Instance, Measures, Prediction};

/// A reader that replays a scripted sequence of outcomes, then reports
/// exhaustion.
pub struct ScriptedReader {
    outcomes: VecDeque<Result<Instance, ReadError>>,
}

impl ScriptedReader {
    pub fn new(outcomes: Vec<Result<Instance, ReadError>>) -> Self {
        Self {
            outcomes: outcomes.into(),
        }
    }

    /// A reader yielding `n` labeled single-feature instances.
    pub fn labeled(n: usize) -> Self {
        Self::new(
            (0..n)
                .map(|i| Ok(Instance::labeled(vec![i as f64], i % 2)))
                .collect(),
        )
    }
}

impl Reader for ScriptedReader {
    fn name(&self) -> &str {
        "ScriptedReader"
    }

    fn next_instance(&mut self) -> Result<Option<Instance>, ReadError> {
        match self.outcomes.pop_front() {
            Some(Ok(instance)) => Ok(Some(instance)),
            Some(Err(e)) => Err(e),
            None => Ok(None),
        }
    }
}

/// One observed stage call, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageCall {
    Predict,
    Train,
    Accept,
}

/// Shared call log, cloneable into stage doubles before the pipeline takes
/// ownership of them.
pub type CallLog = Arc<Mutex<Vec<StageCall>>>;

pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Learner double that records every predict/train call.
pub struct RecordingLearner {
    log: CallLog,
}

impl RecordingLearner {
    pub fn new(log: CallLog) -> Self {
        Self { log }
    }
}

impl Learner for RecordingLearner {
    fn name(&self) -> &str {
        "RecordingLearner"
    }

    fn predict(&self, _instance: &Instance) -> Prediction {
        self.log.lock().unwrap().push(StageCall::Predict);
        Prediction::from_votes(vec![1.0])
    }

    fn train(&mut self, _instance: &Instance) {
        self.log.lock().unwrap().push(StageCall::Train);
    }
}

/// Evaluator double that records accepts and the predicted classes it saw.
pub struct RecordingEvaluator {
    log: CallLog,
    predictions: Arc<Mutex<Vec<Option<usize>>>>,
}

impl RecordingEvaluator {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            predictions: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn predictions(&self) -> Arc<Mutex<Vec<Option<usize>>>> {
        self.predictions.clone()
    }
}

impl Evaluator for RecordingEvaluator {
    fn name(&self) -> &str {
        "RecordingEvaluator"
    }

    fn add_result(&mut self, _instance: &Instance, prediction: &Prediction) {
        self.log.lock().unwrap().push(StageCall::Accept);
        self.predictions
            .lock()
            .unwrap()
            .push(prediction.predicted_class());
    }

    fn measures(&self) -> Option<Measures> {
        let mut m = Measures::new();
        m.set("accepted", self.log.lock().unwrap().len() as f64);
        Some(m)
    }

    fn summary(&self) -> String {
        format!("accepted {}", self.log.lock().unwrap().len())
    }
}

/// Filter double that appends a tag value to each instance's features, so
/// tests can assert filter application order.
pub struct TaggingFilter {
    tag: f64,
}

impl TaggingFilter {
    pub fn new(tag: f64) -> Self {
        Self { tag }
    }
}

impl Filter for TaggingFilter {
    fn name(&self) -> &str {
        "TaggingFilter"
    }

    fn apply(&mut self, mut instance: Instance) -> PipelineResult<Instance> {
        instance.features_mut().push(self.tag);
        Ok(instance)
    }
}

/// Filter double that fails on every instance.
pub struct FailingFilter;

impl Filter for FailingFilter {
    fn name(&self) -> &str {
        "FailingFilter"
    }

    fn apply(&mut self, _instance: Instance) -> PipelineResult<Instance> {
        Err(streammine_rs::PipelineError::Filter {
            name: "FailingFilter".to_string(),
            message: "always fails".to_string(),
        })
    }
}

/// Evaluator double that captures the features of every accepted instance.
pub struct CapturingEvaluator {
    seen: Arc<Mutex<Vec<Vec<f64>>>>,
}

impl CapturingEvaluator {
    pub fn new() -> Self {
        Self {
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn seen(&self) -> Arc<Mutex<Vec<Vec<f64>>>> {
        self.seen.clone()
    }
}

impl Evaluator for CapturingEvaluator {
    fn name(&self) -> &str {
        "CapturingEvaluator"
    }

    fn add_result(&mut self, instance: &Instance, _prediction: &Prediction) {
        self.seen.lock().unwrap().push(instance.features().to_vec());
    }

    fn measures(&self) -> Option<Measures> {
        Some(Measures::new())
    }

    fn summary(&self) -> String {
        String::new()
    }
}
