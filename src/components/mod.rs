//! Built-in pipeline components and their registration.
//!
//! Every compiled-in component self-registers through
//! [`register_builtins`] — the explicit start-up step that populates a
//! [`Registry`] before any pipeline assembly begins. The registry is only
//! read after this step.

pub mod evaluators;
pub mod filters;
pub mod learners;
pub mod readers;

pub use evaluators::NullEvaluator;
pub use filters::{PassthroughFilter, ScriptFilter};
pub use learners::MajorityClassLearner;
pub use readers::{SyntheticReader, VecReader};

use crate::registry::{Registry, RegistryResult};

/// Register every built-in component. Call once at start-up, before any
/// pipeline assembly.
pub fn register_builtins(registry: &mut Registry) -> RegistryResult<()> {
    registry.register(readers::SyntheticReader::descriptor())?;
    registry.register(filters::PassthroughFilter::descriptor())?;
    registry.register(filters::ScriptFilter::descriptor())?;
    registry.register(learners::MajorityClassLearner::descriptor())?;
    registry.register(evaluators::NullEvaluator::descriptor())?;
    tracing::info!("Registered {} built-in components", registry.len());
    Ok(())
}

/// Convenience: a fresh registry pre-populated with the built-ins.
pub fn builtin_registry() -> Registry {
    let mut registry = Registry::new();
    // The built-ins have unique names; registration cannot fail here.
    register_builtins(&mut registry).expect("built-in component names collide");
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Category;

    #[test]
    fn test_register_builtins_registers_all_categories() {
        let registry = builtin_registry();
        assert!(registry.lookup(Category::Reader, "SyntheticReader").is_ok());
        assert!(registry.lookup(Category::Filter, "Passthrough").is_ok());
        assert!(registry.lookup(Category::Filter, "ScriptFilter").is_ok());
        assert!(registry.lookup(Category::Learner, "MajorityClass").is_ok());
        assert!(registry.lookup(Category::Evaluator, "NullEvaluator").is_ok());
    }

    #[test]
    fn test_register_builtins_twice_is_a_duplicate() {
        let mut registry = builtin_registry();
        assert!(register_builtins(&mut registry).is_err());
    }

    #[test]
    fn test_catalog_declarations_cover_builtins() {
        let registry = builtin_registry();
        let declarations = registry.declarations();
        assert_eq!(declarations.len(), registry.len());
        assert!(declarations.iter().any(|d| d.name == "NullEvaluator"));
    }
}
