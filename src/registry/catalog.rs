//! The process-wide component catalog.
//!
//! Maps a component's registered name to a descriptor holding its category,
//! parameter schema, and factory function. Populated once at start-up, read
//! only thereafter.

use crate::pipeline::stage::ComponentHandle;
use crate::registry::declaration::ComponentDeclaration;
use crate::registry::error::{RegistryError, RegistryResult};
use crate::registry::param::{ParamDescriptor, ParamSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The four component categories a pipeline is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Reader,
    Filter,
    Learner,
    Evaluator,
}

impl Category {
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Reader => "Reader",
            Category::Filter => "Filter",
            Category::Learner => "Learner",
            Category::Evaluator => "Evaluator",
        }
    }

    /// All categories, in pipeline order.
    pub fn all() -> &'static [Category] {
        &[
            Category::Reader,
            Category::Filter,
            Category::Learner,
            Category::Evaluator,
        ]
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Factory function invoked with the fully resolved parameter set.
///
/// Errors are plain strings; the instance factory wraps them into
/// [`RegistryError::Construction`] carrying the component name.
pub type ComponentFactory = fn(ParamSet) -> Result<ComponentHandle, String>;

/// Everything the registry knows about one constructible component.
#[derive(Clone)]
pub struct ComponentDescriptor {
    /// Unique key across all categories.
    pub name: &'static str,
    pub category: Category,
    /// Ordered parameter schema.
    pub params: &'static [ParamDescriptor],
    pub factory: ComponentFactory,
}

impl ComponentDescriptor {
    /// Look up a parameter descriptor by flag.
    pub fn param(&self, flag: &str) -> Option<&ParamDescriptor> {
        self.params.iter().find(|p| p.flag == flag)
    }
}

impl std::fmt::Debug for ComponentDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentDescriptor")
            .field("name", &self.name)
            .field("category", &self.category)
            .field("params", &self.params.len())
            .finish()
    }
}

/// Process-wide catalog of constructible component kinds, keyed by name.
///
/// Registered names are unique across all categories; registering a duplicate
/// is a fatal configuration error and leaves the prior content untouched.
#[derive(Debug, Default)]
pub struct Registry {
    components: BTreeMap<&'static str, ComponentDescriptor>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a component descriptor.
    pub fn register(&mut self, descriptor: ComponentDescriptor) -> RegistryResult<()> {
        if let Some(existing) = self.components.get(descriptor.name) {
            return Err(RegistryError::DuplicateRegistration {
                name: descriptor.name.to_string(),
                existing: existing.category,
            });
        }
        tracing::debug!(
            "Registered {} '{}' ({} parameters)",
            descriptor.category,
            descriptor.name,
            descriptor.params.len()
        );
        self.components.insert(descriptor.name, descriptor);
        Ok(())
    }

    /// Look up a descriptor by name within a category.
    pub fn lookup(&self, category: Category, name: &str) -> RegistryResult<&ComponentDescriptor> {
        match self.components.get(name) {
            Some(descriptor) if descriptor.category == category => Ok(descriptor),
            _ => Err(RegistryError::UnknownComponent {
                category,
                name: name.to_string(),
            }),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Iterate all descriptors, sorted by name.
    pub fn descriptors(&self) -> impl Iterator<Item = &ComponentDescriptor> {
        self.components.values()
    }

    /// Tool-readable declarations for every registered component.
    pub fn declarations(&self) -> Vec<ComponentDeclaration> {
        self.descriptors()
            .map(ComponentDeclaration::from_descriptor)
            .collect()
    }
}
