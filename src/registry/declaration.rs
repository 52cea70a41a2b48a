//! Tool-readable component declarations.
//!
//! Each component advertises itself to external tooling (configuration UIs,
//! offline spec validators) as a small JSON document:
//!
//! ```json
//! {"type":"Evaluator","name":"NullEvaluator","parameter":{"-f":"Frequency"}}
//! ```
//!
//! This is the only contract the core exposes to tooling; everything else is
//! internal to the registry.

use crate::registry::catalog::{Category, ComponentDescriptor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Declarative description of one registered component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentDeclaration {
    #[serde(rename = "type")]
    pub category: Category,
    pub name: String,
    /// Flag → human display name, e.g. `"-f"` → `"Frequency"`.
    #[serde(rename = "parameter")]
    pub parameters: BTreeMap<String, String>,
}

impl ComponentDeclaration {
    pub fn from_descriptor(descriptor: &ComponentDescriptor) -> Self {
        Self {
            category: descriptor.category,
            name: descriptor.name.to_string(),
            parameters: descriptor
                .params
                .iter()
                .map(|p| (p.flag.to_string(), p.display_name.to_string()))
                .collect(),
        }
    }

    /// Render as a compact JSON document.
    pub fn to_json(&self) -> String {
        // Serialization of this shape cannot fail: string keys, no non-finite
        // floats.
        serde_json::to_string(self).unwrap_or_default()
    }
}
