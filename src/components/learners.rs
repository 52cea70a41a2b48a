//! Built-in learners.
//!
//! `MajorityClassLearner` is the baseline incremental learner: it keeps one
//! weighted count per class and always votes for the majority. Small as it
//! is, it exercises the full predict-before-learn contract and carries its
//! trained state across pipeline runs.

use crate::pipeline::stage::{ComponentHandle, Learner};
use crate::registry::{
    Category, ComponentDescriptor, DefaultValue, ParamDescriptor, ParamKind, ParamSet,
};
use crate::types::{Instance, Prediction};

static MAJORITY_PARAMS: &[ParamDescriptor] = &[ParamDescriptor::optional(
    "-c",
    "Classes",
    ParamKind::Int,
    DefaultValue::Int(2),
)];

/// Predicts the class seen most often so far.
pub struct MajorityClassLearner {
    /// Weighted observation count per class. Grows if a label exceeds the
    /// declared class count.
    counts: Vec<f64>,
}

impl MajorityClassLearner {
    pub fn new(classes: usize) -> Self {
        Self {
            counts: vec![0.0; classes.max(2)],
        }
    }

    pub fn descriptor() -> ComponentDescriptor {
        ComponentDescriptor {
            name: "MajorityClass",
            category: Category::Learner,
            params: MAJORITY_PARAMS,
            factory: Self::from_params,
        }
    }

    fn from_params(params: ParamSet) -> Result<ComponentHandle, String> {
        let classes = params.get_int("-c").ok_or("missing -c")?;
        if classes < 2 {
            return Err("-c must be at least 2".to_string());
        }
        Ok(ComponentHandle::Learner(Box::new(Self::new(
            classes as usize,
        ))))
    }

    /// Total weight observed so far.
    pub fn total_weight(&self) -> f64 {
        self.counts.iter().sum()
    }
}

impl Learner for MajorityClassLearner {
    fn name(&self) -> &str {
        "MajorityClass"
    }

    fn predict(&self, _instance: &Instance) -> Prediction {
        if self.total_weight() == 0.0 {
            // Nothing observed yet: abstain rather than fabricate votes
            return Prediction::empty();
        }
        Prediction::from_votes(self.counts.clone())
    }

    fn train(&mut self, instance: &Instance) {
        let Some(label) = instance.label() else {
            // Unlabeled instances carry no training signal for this learner
            return;
        };
        if label >= self.counts.len() {
            self.counts.resize(label + 1, 0.0);
        }
        self.counts[label] += instance.weight();
    }
}
