//! Stage abstractions for the pipeline.
//!
//! One flat trait per component category, each with the minimal operation
//! set the runner needs. `ComponentHandle` wraps a boxed stage of any
//! category so the registry and factory can stay ignorant of concrete types.

use crate::pipeline::error::{PipelineResult, ReadError};
use crate::registry::catalog::Category;
use crate::types::{Instance, Measures, Prediction};

/// Produces the instance stream.
///
/// Exhaustion (`Ok(None)`) is a normal termination signal, distinct from a
/// transient [`ReadError`].
pub trait Reader: Send {
    /// Human-readable name of this reader.
    fn name(&self) -> &str;

    /// Pull the next instance, `Ok(None)` on exhaustion.
    fn next_instance(&mut self) -> Result<Option<Instance>, ReadError>;
}

/// Transforms instances between the reader and the learner.
pub trait Filter: Send {
    fn name(&self) -> &str;

    /// Transform one instance. A filter error is fatal to the run: skipping
    /// an instance would corrupt the predict-before-learn accounting.
    fn apply(&mut self, instance: Instance) -> PipelineResult<Instance>;
}

/// Incrementally updates an internal model and predicts labels, one instance
/// at a time, without buffering prior instances.
pub trait Learner: Send {
    fn name(&self) -> &str;

    /// Predict a label for `instance` from the current model state.
    fn predict(&self, instance: &Instance) -> Prediction;

    /// Fold `instance` (with its true label) into the model.
    fn train(&mut self, instance: &Instance);
}

/// Accumulates prediction-vs-truth results into measures.
pub trait Evaluator: Send {
    fn name(&self) -> &str;

    /// Accept one finished result. Must never alter pipeline control flow.
    fn add_result(&mut self, instance: &Instance, prediction: &Prediction);

    /// Snapshot of the current measures. `None` means this evaluator tracks
    /// nothing at all — callers can tell that apart from "observed nothing
    /// yet" (an empty `Measures`). Read-only with respect to accumulation.
    fn measures(&self) -> Option<Measures>;

    /// Human-readable summary of the current state. Read-only.
    fn summary(&self) -> String;

    /// Preferred reporting cadence in instances, if the evaluator has one.
    fn report_frequency(&self) -> Option<u64> {
        None
    }
}

/// A polymorphic handle to a constructed component of any category.
pub enum ComponentHandle {
    Reader(Box<dyn Reader>),
    Filter(Box<dyn Filter>),
    Learner(Box<dyn Learner>),
    Evaluator(Box<dyn Evaluator>),
}

impl ComponentHandle {
    pub fn category(&self) -> Category {
        match self {
            ComponentHandle::Reader(_) => Category::Reader,
            ComponentHandle::Filter(_) => Category::Filter,
            ComponentHandle::Learner(_) => Category::Learner,
            ComponentHandle::Evaluator(_) => Category::Evaluator,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ComponentHandle::Reader(c) => c.name(),
            ComponentHandle::Filter(c) => c.name(),
            ComponentHandle::Learner(c) => c.name(),
            ComponentHandle::Evaluator(c) => c.name(),
        }
    }

    pub fn into_reader(self) -> Option<Box<dyn Reader>> {
        match self {
            ComponentHandle::Reader(c) => Some(c),
            _ => None,
        }
    }

    pub fn into_filter(self) -> Option<Box<dyn Filter>> {
        match self {
            ComponentHandle::Filter(c) => Some(c),
            _ => None,
        }
    }

    pub fn into_learner(self) -> Option<Box<dyn Learner>> {
        match self {
            ComponentHandle::Learner(c) => Some(c),
            _ => None,
        }
    }

    pub fn into_evaluator(self) -> Option<Box<dyn Evaluator>> {
        match self {
            ComponentHandle::Evaluator(c) => Some(c),
            _ => None,
        }
    }
}

impl std::fmt::Debug for ComponentHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ComponentHandle({} '{}')", self.category(), self.name())
    }
}
