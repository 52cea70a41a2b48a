//! Pipeline assembly from a declarative specification.
//!
//! A [`PipelineSpec`] is an ordered list of stage descriptions — component
//! name plus raw parameters — produced by a config file or external tooling.
//! `assemble` constructs each stage through the instance factory and links
//! the results into a Reader → Filters → Learner → Evaluator chain.
//!
//! Specs load from TOML (the on-disk format) or JSON:
//!
//! ```toml
//! [[stage]]
//! category = "Reader"
//! name = "SyntheticReader"
//! params = { "-n" = 1000, "-s" = 42 }
//!
//! [[stage]]
//! category = "Learner"
//! name = "MajorityClass"
//!
//! [[stage]]
//! category = "Evaluator"
//! name = "NullEvaluator"
//! ```

use crate::pipeline::error::{PipelineError, PipelineResult};
use crate::pipeline::runner::{Pipeline, PipelineStages};
use crate::pipeline::stage::Filter;
use crate::registry::{factory, Category, RawParams, Registry};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One stage of a pipeline specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageSpec {
    pub category: Category,
    pub name: String,
    #[serde(default)]
    pub params: RawParams,
}

impl StageSpec {
    pub fn new(category: Category, name: impl Into<String>) -> Self {
        Self {
            category,
            name: name.into(),
            params: RawParams::new(),
        }
    }

    pub fn with_param(mut self, flag: impl Into<String>, value: crate::registry::RawValue) -> Self {
        self.params.insert(flag.into(), value);
        self
    }
}

/// An ordered list of stage descriptions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PipelineSpec {
    #[serde(rename = "stage", default)]
    pub stages: Vec<StageSpec>,
}

impl PipelineSpec {
    pub fn new(stages: Vec<StageSpec>) -> Self {
        Self { stages }
    }

    /// Parse a spec from TOML text.
    pub fn from_toml_str(text: &str) -> PipelineResult<Self> {
        toml::from_str(text).map_err(|e| PipelineError::Spec(e.to_string()))
    }

    /// Parse a spec from JSON text.
    pub fn from_json_str(text: &str) -> PipelineResult<Self> {
        serde_json::from_str(text).map_err(|e| PipelineError::Spec(e.to_string()))
    }

    /// Load a TOML spec from disk.
    pub fn from_path(path: impl AsRef<Path>) -> PipelineResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())
            .map_err(|e| PipelineError::Spec(format!("{}: {}", path.as_ref().display(), e)))?;
        Self::from_toml_str(&text)
    }
}

/// Assemble a pipeline from a spec, all-or-nothing.
///
/// Shape rule: exactly one Reader (first), zero-or-more Filters, exactly one
/// Learner, exactly one Evaluator (last). If any stage fails to construct,
/// every already-built stage is dropped and no pipeline is returned.
pub fn assemble(registry: &Registry, spec: &PipelineSpec) -> PipelineResult<Pipeline> {
    validate_shape(spec)?;

    let mut stages = spec.stages.iter();

    // validate_shape guarantees the positions below.
    let reader_spec = stages.next().ok_or_else(|| {
        PipelineError::InvalidShape("pipeline has no stages".to_string())
    })?;
    let reader = factory::create(registry, Category::Reader, &reader_spec.name, &reader_spec.params)?
        .into_reader()
        .ok_or_else(|| PipelineError::InvalidShape("first stage is not a Reader".to_string()))?;

    let mut filters: Vec<Box<dyn Filter>> = Vec::new();
    let mut learner = None;
    let mut evaluator = None;

    for stage in stages {
        let handle = factory::create(registry, stage.category, &stage.name, &stage.params)?;
        let mismatch = || {
            PipelineError::InvalidShape(format!(
                "component '{}' did not construct a {}",
                stage.name, stage.category
            ))
        };
        match stage.category {
            Category::Filter => filters.push(handle.into_filter().ok_or_else(mismatch)?),
            Category::Learner => learner = Some(handle.into_learner().ok_or_else(mismatch)?),
            Category::Evaluator => evaluator = Some(handle.into_evaluator().ok_or_else(mismatch)?),
            Category::Reader => {
                return Err(PipelineError::InvalidShape(
                    "only the first stage may be a Reader".to_string(),
                ))
            }
        }
    }

    let learner = learner
        .ok_or_else(|| PipelineError::InvalidShape("pipeline has no Learner".to_string()))?;
    let evaluator = evaluator
        .ok_or_else(|| PipelineError::InvalidShape("pipeline has no Evaluator".to_string()))?;

    let pipeline = Pipeline::from_stages(PipelineStages {
        reader,
        filters,
        learner,
        evaluator,
    });
    tracing::info!("Assembled pipeline: {}", pipeline.stage_names().join(" -> "));
    Ok(pipeline)
}

/// Check the Reader → Filters → Learner → Evaluator shape before building
/// anything, so violations surface without constructing a single stage.
fn validate_shape(spec: &PipelineSpec) -> PipelineResult<()> {
    let categories: Vec<Category> = spec.stages.iter().map(|s| s.category).collect();

    if categories.is_empty() {
        return Err(PipelineError::InvalidShape(
            "pipeline has no stages".to_string(),
        ));
    }

    let count = |c: Category| categories.iter().filter(|&&x| x == c).count();

    if categories[0] != Category::Reader || count(Category::Reader) != 1 {
        return Err(PipelineError::InvalidShape(
            "pipeline needs exactly one Reader, first".to_string(),
        ));
    }
    if count(Category::Learner) != 1 {
        return Err(PipelineError::InvalidShape(
            "pipeline needs exactly one Learner".to_string(),
        ));
    }
    if categories.last() != Some(&Category::Evaluator) || count(Category::Evaluator) != 1 {
        return Err(PipelineError::InvalidShape(
            "pipeline needs exactly one Evaluator, last".to_string(),
        ));
    }

    // Filters may only sit between the Reader and the Learner. The count
    // check above guarantees the position exists.
    let Some(learner_pos) = categories.iter().position(|&c| c == Category::Learner) else {
        return Err(PipelineError::InvalidShape(
            "pipeline needs exactly one Learner".to_string(),
        ));
    };
    for (i, &category) in categories.iter().enumerate() {
        if category == Category::Filter && i > learner_pos {
            return Err(PipelineError::InvalidShape(
                "Filters must come before the Learner".to_string(),
            ));
        }
    }
    if learner_pos + 2 != categories.len() {
        return Err(PipelineError::InvalidShape(
            "the Learner must come directly before the Evaluator".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components;

    fn spec(stages: &[(Category, &str)]) -> PipelineSpec {
        PipelineSpec::new(
            stages
                .iter()
                .map(|(c, n)| StageSpec::new(*c, *n))
                .collect(),
        )
    }

    fn builtin_registry() -> Registry {
        let mut registry = Registry::new();
        components::register_builtins(&mut registry).unwrap();
        registry
    }

    #[test]
    fn test_assemble_minimal_pipeline() {
        let registry = builtin_registry();
        let spec = spec(&[
            (Category::Reader, "SyntheticReader"),
            (Category::Learner, "MajorityClass"),
            (Category::Evaluator, "NullEvaluator"),
        ]);

        let pipeline = assemble(&registry, &spec).unwrap();
        assert_eq!(
            pipeline.stage_names(),
            vec!["SyntheticReader", "MajorityClass", "NullEvaluator"]
        );
    }

    #[test]
    fn test_assemble_with_filters() {
        let registry = builtin_registry();
        let spec = spec(&[
            (Category::Reader, "SyntheticReader"),
            (Category::Filter, "Passthrough"),
            (Category::Filter, "Passthrough"),
            (Category::Learner, "MajorityClass"),
            (Category::Evaluator, "NullEvaluator"),
        ]);

        let pipeline = assemble(&registry, &spec).unwrap();
        assert_eq!(pipeline.stage_names().len(), 5);
    }

    #[test]
    fn test_shape_no_reader() {
        let registry = builtin_registry();
        let spec = spec(&[
            (Category::Learner, "MajorityClass"),
            (Category::Evaluator, "NullEvaluator"),
        ]);
        assert!(matches!(
            assemble(&registry, &spec),
            Err(PipelineError::InvalidShape(_))
        ));
    }

    #[test]
    fn test_shape_two_learners() {
        let registry = builtin_registry();
        let spec = spec(&[
            (Category::Reader, "SyntheticReader"),
            (Category::Learner, "MajorityClass"),
            (Category::Learner, "MajorityClass"),
            (Category::Evaluator, "NullEvaluator"),
        ]);
        assert!(matches!(
            assemble(&registry, &spec),
            Err(PipelineError::InvalidShape(_))
        ));
    }

    #[test]
    fn test_shape_filter_after_learner() {
        let registry = builtin_registry();
        let spec = spec(&[
            (Category::Reader, "SyntheticReader"),
            (Category::Learner, "MajorityClass"),
            (Category::Filter, "Passthrough"),
            (Category::Evaluator, "NullEvaluator"),
        ]);
        assert!(matches!(
            assemble(&registry, &spec),
            Err(PipelineError::InvalidShape(_))
        ));
    }

    #[test]
    fn test_shape_evaluator_not_last() {
        let registry = builtin_registry();
        let spec = spec(&[
            (Category::Reader, "SyntheticReader"),
            (Category::Evaluator, "NullEvaluator"),
            (Category::Learner, "MajorityClass"),
        ]);
        assert!(matches!(
            assemble(&registry, &spec),
            Err(PipelineError::InvalidShape(_))
        ));
    }

    #[test]
    fn test_assemble_unknown_component_fails_whole_assembly() {
        let registry = builtin_registry();
        let spec = spec(&[
            (Category::Reader, "SyntheticReader"),
            (Category::Learner, "NoSuchLearner"),
            (Category::Evaluator, "NullEvaluator"),
        ]);
        assert!(matches!(
            assemble(&registry, &spec),
            Err(PipelineError::Registry(_))
        ));
    }

    #[test]
    fn test_spec_from_toml() {
        let text = r#"
            [[stage]]
            category = "Reader"
            name = "SyntheticReader"
            params = { "-n" = 100, "-s" = 7 }

            [[stage]]
            category = "Learner"
            name = "MajorityClass"

            [[stage]]
            category = "Evaluator"
            name = "NullEvaluator"
            params = { "-f" = 10 }
        "#;

        let spec = PipelineSpec::from_toml_str(text).unwrap();
        assert_eq!(spec.stages.len(), 3);
        assert_eq!(spec.stages[0].name, "SyntheticReader");
        assert_eq!(
            spec.stages[0].params.get("-n"),
            Some(&crate::registry::RawValue::Int(100))
        );

        let registry = builtin_registry();
        assert!(assemble(&registry, &spec).is_ok());
    }

    #[test]
    fn test_spec_from_json() {
        let text = r#"{
            "stage": [
                {"category": "Reader", "name": "SyntheticReader"},
                {"category": "Learner", "name": "MajorityClass"},
                {"category": "Evaluator", "name": "NullEvaluator"}
            ]
        }"#;
        let spec = PipelineSpec::from_json_str(text).unwrap();
        assert_eq!(spec.stages.len(), 3);
    }

    #[test]
    fn test_spec_bad_toml() {
        assert!(matches!(
            PipelineSpec::from_toml_str("stage = 3"),
            Err(PipelineError::Spec(_))
        ));
    }
}
