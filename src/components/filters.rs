//! Built-in filters.
//!
//! `PassthroughFilter` forwards instances unchanged. `ScriptFilter` runs a
//! user-provided Rhai script over each instance's feature vector, allowing
//! arbitrary per-instance transforms without recompiling.

use crate::pipeline::error::{PipelineError, PipelineResult};
use crate::pipeline::stage::{ComponentHandle, Filter};
use crate::registry::{
    Category, ComponentDescriptor, DefaultValue, ParamDescriptor, ParamKind, ParamSet,
};
use crate::scripting::ScriptEngine;
use crate::types::Instance;
use rhai::{Array, Dynamic, Scope, AST};

static PASSTHROUGH_PARAMS: &[ParamDescriptor] = &[];

/// Identity filter. Useful as a placeholder stage and for measuring
/// per-stage pipeline overhead.
#[derive(Default)]
pub struct PassthroughFilter;

impl PassthroughFilter {
    pub fn new() -> Self {
        Self
    }

    pub fn descriptor() -> ComponentDescriptor {
        ComponentDescriptor {
            name: "Passthrough",
            category: Category::Filter,
            params: PASSTHROUGH_PARAMS,
            factory: Self::from_params,
        }
    }

    fn from_params(_params: ParamSet) -> Result<ComponentHandle, String> {
        Ok(ComponentHandle::Filter(Box::new(Self::new())))
    }
}

impl Filter for PassthroughFilter {
    fn name(&self) -> &str {
        "Passthrough"
    }

    fn apply(&mut self, instance: Instance) -> PipelineResult<Instance> {
        Ok(instance)
    }
}

static SCRIPT_PARAMS: &[ParamDescriptor] = &[
    ParamDescriptor::required("-s", "Script", ParamKind::Str),
    ParamDescriptor::optional("-F", "Fail fast", ParamKind::Bool, DefaultValue::Bool(true)),
];

/// Rhai-scripted per-instance feature transform.
///
/// ## Script Interface
///
/// The script receives:
/// - `features` - Array of the instance's feature values
/// - `label` - The true label as an integer, or -1 if unlabeled
/// - `weight` - The instance weight
/// - `tick` - Count of instances this filter has processed
///
/// and must return the (possibly modified) features array.
///
/// ## Example Scripts
///
/// Passthrough (no modification):
/// ```rhai
/// features
/// ```
///
/// Scale all features (use index-based iteration to modify in place):
/// ```rhai
/// let len = features.len();
/// for i in 0..len {
///     features[i] = features[i] * 2.0;
/// }
/// features
/// ```
pub struct ScriptFilter {
    script_source: String,
    compiled: AST,
    engine: ScriptEngine,
    /// When true (the default), a script failure fails the run. When false,
    /// the instance passes through unchanged and the error is only logged.
    fail_fast: bool,
    last_error: Option<String>,
    tick: u64,
}

impl ScriptFilter {
    /// Compile `source` into a filter. Compilation errors surface here, at
    /// construction time, not mid-run.
    pub fn new(source: &str, fail_fast: bool) -> Result<Self, String> {
        let engine = ScriptEngine::new();
        let compiled = engine
            .engine()
            .compile(source)
            .map_err(|e| format!("script compile error: {}", e))?;
        Ok(Self {
            script_source: source.to_string(),
            compiled,
            engine,
            fail_fast,
            last_error: None,
            tick: 0,
        })
    }

    pub fn descriptor() -> ComponentDescriptor {
        ComponentDescriptor {
            name: "ScriptFilter",
            category: Category::Filter,
            params: SCRIPT_PARAMS,
            factory: Self::from_params,
        }
    }

    fn from_params(params: ParamSet) -> Result<ComponentHandle, String> {
        let source = params.get_str("-s").ok_or("missing -s")?;
        let fail_fast = params.get_bool("-F").unwrap_or(true);
        let filter = Self::new(source, fail_fast)?;
        Ok(ComponentHandle::Filter(Box::new(filter)))
    }

    pub fn script_source(&self) -> &str {
        &self.script_source
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn execute(&self, instance: &Instance) -> Result<Vec<f64>, String> {
        let features: Array = instance
            .features()
            .iter()
            .map(|&v| Dynamic::from(v))
            .collect();

        let mut scope = Scope::new();
        scope.push("features", features);
        scope.push(
            "label",
            instance.label().map(|l| l as i64).unwrap_or(-1),
        );
        scope.push("weight", instance.weight());
        scope.push("tick", self.tick as i64);

        let result = self
            .engine
            .engine()
            .eval_ast_with_scope::<Dynamic>(&mut scope, &self.compiled)
            .map_err(|e| format!("execution error: {}", e))?;

        let array = result
            .try_cast::<Array>()
            .ok_or_else(|| "script must return the features array".to_string())?;

        array
            .into_iter()
            .map(|v| {
                v.as_float()
                    .or_else(|_| v.as_int().map(|i| i as f64))
                    .map_err(|_| "features array must contain only numbers".to_string())
            })
            .collect()
    }
}

impl Filter for ScriptFilter {
    fn name(&self) -> &str {
        "ScriptFilter"
    }

    fn apply(&mut self, mut instance: Instance) -> PipelineResult<Instance> {
        let outcome = self.execute(&instance);
        self.tick += 1;

        match outcome {
            Ok(features) => {
                *instance.features_mut() = features;
                self.last_error = None;
                Ok(instance)
            }
            Err(message) if self.fail_fast => Err(PipelineError::Filter {
                name: "ScriptFilter".to_string(),
                message,
            }),
            Err(message) => {
                // Lenient mode: pass through and log
                tracing::trace!("ScriptFilter error (passing through): {}", message);
                self.last_error = Some(message);
                Ok(instance)
            }
        }
    }
}
