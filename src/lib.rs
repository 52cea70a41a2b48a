//! # StreamMine-RS: Streaming Data-Mining Pipeline Runner
//!
//! A plugin-based pipeline runner for online (incremental) machine-learning
//! experiments. Independently written components — readers, filters,
//! learners, evaluators — register themselves into a catalog together with a
//! declarative description of their constructor parameters, and pipelines
//! are assembled and run from textual configuration without any component
//! knowing another's concrete type.
//!
//! ## Architecture
//!
//! - **Registry**: process-wide component catalog, populated once at start-up
//! - **Factory**: validates raw parameters against a component's schema and
//!   constructs instances, resolving nested components recursively
//! - **Assembler**: links constructed stages into a
//!   Reader → Filters → Learner → Evaluator chain
//! - **Runner**: the single-threaded streaming loop, following the
//!   predict-before-learn protocol of online-learning evaluation
//!
//! ## Example
//!
//! ```
//! use streammine_rs::{
//!     components,
//!     pipeline::{assemble, PipelineSpec, Runner},
//! };
//!
//! let registry = components::builtin_registry();
//!
//! let spec = PipelineSpec::from_toml_str(
//!     r#"
//!     [[stage]]
//!     category = "Reader"
//!     name = "SyntheticReader"
//!     params = { "-n" = 500, "-s" = 42 }
//!
//!     [[stage]]
//!     category = "Learner"
//!     name = "MajorityClass"
//!
//!     [[stage]]
//!     category = "Evaluator"
//!     name = "NullEvaluator"
//!     "#,
//! )
//! .unwrap();
//!
//! let mut pipeline = assemble(&registry, &spec).unwrap();
//! let report = Runner::new().run(&mut pipeline).unwrap();
//! assert_eq!(report.instances_seen, 500);
//! ```

pub mod components;
pub mod error;
pub mod pipeline;
pub mod registry;
pub mod scripting;
pub mod types;

// Re-export commonly used types
pub use error::{Result, ResultExt, StreamMineError};
pub use pipeline::{
    assemble, Pipeline, PipelineError, PipelineSpec, RunReport, RunState, Runner,
};
pub use registry::{Category, ComponentDeclaration, Registry, RegistryError};
pub use scripting::ScriptEngine;
pub use types::{Instance, Measures, Prediction};

use std::path::Path;

/// Load a TOML pipeline spec from disk, assemble it against `registry`, and
/// run it to a terminal state.
pub fn run_spec_file(
    registry: &Registry,
    path: impl AsRef<Path>,
    runner: &Runner,
) -> Result<RunReport> {
    let path = path.as_ref();
    let spec = PipelineSpec::from_path(path)
        .map_err(StreamMineError::from)
        .with_context(|| format!("loading pipeline spec {}", path.display()))?;
    let mut pipeline = assemble(registry, &spec)
        .map_err(StreamMineError::from)
        .context("pipeline assembly failed")?;
    runner
        .run(&mut pipeline)
        .map_err(StreamMineError::from)
        .context("pipeline run failed")
}
