//! Core data types shared across the crate.
//!
//! An [`Instance`] is one streaming data record: a feature vector plus an
//! optional true label. Instances are produced by readers, transformed by
//! filters, and consumed by learners and evaluators — each stage owns the
//! instance while it works on it.

use serde::{Deserialize, Serialize};

/// A single streaming data record: features plus an optional true label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    features: Vec<f64>,
    label: Option<usize>,
    #[serde(default = "default_weight")]
    weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

impl Instance {
    /// Create an unlabeled instance from a feature vector.
    pub fn new(features: Vec<f64>) -> Self {
        Self {
            features,
            label: None,
            weight: 1.0,
        }
    }

    /// Create a labeled instance.
    pub fn labeled(features: Vec<f64>, label: usize) -> Self {
        Self {
            features,
            label: Some(label),
            weight: 1.0,
        }
    }

    /// Set the instance weight (default 1.0).
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Number of features in this instance.
    #[inline]
    pub fn num_features(&self) -> usize {
        self.features.len()
    }

    /// Get the feature at `index`, if present.
    #[inline]
    pub fn feature(&self, index: usize) -> Option<f64> {
        self.features.get(index).copied()
    }

    /// The full feature vector.
    #[inline]
    pub fn features(&self) -> &[f64] {
        &self.features
    }

    /// Mutable access to the feature vector (used by filters).
    #[inline]
    pub fn features_mut(&mut self) -> &mut Vec<f64> {
        &mut self.features
    }

    /// The true label, if known.
    #[inline]
    pub fn label(&self) -> Option<usize> {
        self.label
    }

    /// The instance weight.
    #[inline]
    pub fn weight(&self) -> f64 {
        self.weight
    }
}

/// A learner's output for one instance: a vote per class.
///
/// The predicted class is the argmax of the votes. An empty vote vector
/// means the learner abstained (e.g. it has seen no training data yet).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Prediction {
    votes: Vec<f64>,
}

impl Prediction {
    /// A prediction carrying no votes (the learner abstained).
    pub fn empty() -> Self {
        Self { votes: Vec::new() }
    }

    /// Create a prediction from per-class votes.
    pub fn from_votes(votes: Vec<f64>) -> Self {
        Self { votes }
    }

    /// The raw vote vector.
    #[inline]
    pub fn votes(&self) -> &[f64] {
        &self.votes
    }

    /// Index of the highest vote, or `None` if there are no votes.
    pub fn predicted_class(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, &v) in self.votes.iter().enumerate() {
            match best {
                Some((_, bv)) if bv >= v => {}
                _ => best = Some((i, v)),
            }
        }
        best.map(|(i, _)| i)
    }
}

/// A named bag of numeric evaluation statistics, owned by an evaluator.
///
/// Order of insertion is preserved so reports render stably. Note the
/// difference between an *empty* `Measures` (evaluator tracked nothing yet)
/// and an absent one (`Option::None` — no measures are tracked at all).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Measures {
    entries: Vec<(String, f64)>,
}

impl Measures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a named statistic.
    pub fn set(&mut self, name: impl Into<String>, value: f64) {
        let name = name.into();
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    /// Look up a statistic by name.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    /// Iterate statistics in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Display for Measures {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, (name, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {:.4}", name, value)?;
        }
        Ok(())
    }
}
