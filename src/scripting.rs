//! Rhai script engine for instance transforms.
//!
//! A thin wrapper around a configured `rhai::Engine` with a few numeric
//! helper functions registered for use in filter scripts:
//!
//! - `clamp(value, min, max)` - Constrain a value to a range
//! - `rescale(value, in_min, in_max, out_min, out_max)` - Linear rescaling
//! - `znorm(value, mean, stddev)` - Standard-score normalization

use rhai::Engine;

/// The script engine used by scripted pipeline components.
pub struct ScriptEngine {
    engine: Engine,
}

impl ScriptEngine {
    /// Create a new script engine with the helper functions registered.
    pub fn new() -> Self {
        let mut engine = Engine::new();
        Self::configure_engine(&mut engine);
        Self { engine }
    }

    /// Access the underlying Rhai engine.
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    fn configure_engine(engine: &mut Engine) {
        engine.register_fn("clamp", |value: f64, min: f64, max: f64| {
            value.max(min).min(max)
        });

        engine.register_fn(
            "rescale",
            |value: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64| {
                if (in_max - in_min).abs() < f64::EPSILON {
                    return out_min;
                }
                out_min + (value - in_min) / (in_max - in_min) * (out_max - out_min)
            },
        );

        engine.register_fn("znorm", |value: f64, mean: f64, stddev: f64| {
            if stddev.abs() < f64::EPSILON {
                return 0.0;
            }
            (value - mean) / stddev
        });
    }
}

impl Default for ScriptEngine {
    fn default() -> Self {
        Self::new()
    }
}
