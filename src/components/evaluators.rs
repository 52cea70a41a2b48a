//! Built-in evaluators.
//!
//! `NullEvaluator` is the identity member of the evaluator family: it
//! accepts results without accumulating anything, so a pipeline can run
//! end-to-end with evaluation overhead elided (e.g. to benchmark reader,
//! filter, and learner throughput).

use crate::pipeline::stage::{ComponentHandle, Evaluator};
use crate::registry::{
    Category, ComponentDescriptor, DefaultValue, ParamDescriptor, ParamKind, ParamSet,
};
use crate::types::{Instance, Measures, Prediction};

static NULL_PARAMS: &[ParamDescriptor] = &[ParamDescriptor::optional(
    "-f",
    "Frequency",
    ParamKind::Int,
    DefaultValue::Int(100),
)];

/// The no-op evaluator.
///
/// `add_result` does nothing, `measures` is always `None` (explicitly absent,
/// not zero-initialized — callers can distinguish "no measures tracked" from
/// "observed nothing yet"), and the summary is a minimal placeholder. It must
/// never fail, never allocate per result, and never alter control flow.
pub struct NullEvaluator {
    frequency: u64,
}

impl NullEvaluator {
    pub fn new(frequency: u64) -> Self {
        Self {
            frequency: frequency.max(1),
        }
    }

    pub fn descriptor() -> ComponentDescriptor {
        ComponentDescriptor {
            name: "NullEvaluator",
            category: Category::Evaluator,
            params: NULL_PARAMS,
            factory: Self::from_params,
        }
    }

    fn from_params(params: ParamSet) -> Result<ComponentHandle, String> {
        let frequency = params.get_int("-f").ok_or("missing -f")?;
        if frequency < 1 {
            return Err("-f must be at least 1".to_string());
        }
        Ok(ComponentHandle::Evaluator(Box::new(Self::new(
            frequency as u64,
        ))))
    }
}

impl Default for NullEvaluator {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Evaluator for NullEvaluator {
    fn name(&self) -> &str {
        "NullEvaluator"
    }

    fn add_result(&mut self, _instance: &Instance, _prediction: &Prediction) {}

    fn measures(&self) -> Option<Measures> {
        None
    }

    fn summary(&self) -> String {
        " ".to_string()
    }

    fn report_frequency(&self) -> Option<u64> {
        Some(self.frequency)
    }
}
