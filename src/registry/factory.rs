//! The instance factory: raw parameters in, constructed components out.
//!
//! `create` validates a raw flag→value map against the registered parameter
//! schema, coerces each value to its declared kind, fills in defaults for
//! absent optionals, resolves component-kind parameters recursively, and
//! finally invokes the registered factory function.

use crate::pipeline::stage::ComponentHandle;
use crate::registry::catalog::{Category, ComponentDescriptor, Registry};
use crate::registry::error::{RegistryError, RegistryResult};
use crate::registry::param::{ParamDescriptor, ParamKind, ParamSet, ParamValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw flag→value map, as produced by a config file or external tooling.
pub type RawParams = BTreeMap<String, RawValue>;

/// An unresolved parameter value.
///
/// Scalars arrive either as their native config-file type or as strings to be
/// coerced; a nested component arrives as a [`ComponentSpec`] (or, for a
/// component without parameters, as its bare name).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Component(ComponentSpec),
}

impl RawValue {
    fn describe(&self) -> String {
        match self {
            RawValue::Bool(v) => v.to_string(),
            RawValue::Int(v) => v.to_string(),
            RawValue::Float(v) => v.to_string(),
            RawValue::Str(v) => v.clone(),
            RawValue::Component(spec) => format!("component {}", spec.name),
        }
    }
}

/// A component reference with its raw parameters — the recursive building
/// block of pipeline specifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentSpec {
    pub name: String,
    #[serde(default)]
    pub params: RawParams,
}

impl ComponentSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: RawParams::new(),
        }
    }

    pub fn with_param(mut self, flag: impl Into<String>, value: RawValue) -> Self {
        self.params.insert(flag.into(), value);
        self
    }
}

/// Construct a registered component from raw parameters.
///
/// Fail-fast validation order: unknown component, then unknown flags, then
/// per-descriptor coercion and defaults, then the factory call itself.
pub fn create(
    registry: &Registry,
    category: Category,
    name: &str,
    raw: &RawParams,
) -> RegistryResult<ComponentHandle> {
    let descriptor = registry.lookup(category, name)?;

    // Reject undeclared flags before doing any work, so configuration typos
    // surface with the offending flag name.
    for flag in raw.keys() {
        if descriptor.param(flag).is_none() {
            return Err(RegistryError::UnknownParameter {
                component: name.to_string(),
                flag: flag.clone(),
            });
        }
    }

    let mut params = ParamSet::new();
    for param in descriptor.params {
        match raw.get(param.flag) {
            Some(value) => {
                let resolved = coerce(registry, descriptor, param, value)?;
                params.insert(param.flag, resolved);
            }
            None if param.optional => {
                if let Some(default) = param.default {
                    params.insert(param.flag, default.into());
                }
            }
            None => {
                return Err(RegistryError::MissingParameter {
                    component: name.to_string(),
                    flag: param.flag.to_string(),
                });
            }
        }
    }

    tracing::debug!("Creating {} '{}'", category, name);
    (descriptor.factory)(params).map_err(|message| RegistryError::Construction {
        component: name.to_string(),
        message,
    })
}

/// Construct a component from a [`ComponentSpec`].
pub fn create_from_spec(
    registry: &Registry,
    category: Category,
    spec: &ComponentSpec,
) -> RegistryResult<ComponentHandle> {
    create(registry, category, &spec.name, &spec.params)
}

/// Coerce one raw value to its declared kind, recursing for components.
fn coerce(
    registry: &Registry,
    descriptor: &ComponentDescriptor,
    param: &ParamDescriptor,
    value: &RawValue,
) -> RegistryResult<ParamValue> {
    let mismatch = || RegistryError::BadParameterValue {
        component: descriptor.name.to_string(),
        flag: param.flag.to_string(),
        expected: param.kind.describe(),
        got: value.describe(),
    };

    match param.kind {
        ParamKind::Int => match value {
            RawValue::Int(v) => Ok(ParamValue::Int(*v)),
            RawValue::Str(s) => s.trim().parse().map(ParamValue::Int).map_err(|_| mismatch()),
            _ => Err(mismatch()),
        },
        ParamKind::Float => match value {
            RawValue::Float(v) => Ok(ParamValue::Float(*v)),
            RawValue::Int(v) => Ok(ParamValue::Float(*v as f64)),
            RawValue::Str(s) => s
                .trim()
                .parse()
                .map(ParamValue::Float)
                .map_err(|_| mismatch()),
            _ => Err(mismatch()),
        },
        ParamKind::Bool => match value {
            RawValue::Bool(v) => Ok(ParamValue::Bool(*v)),
            RawValue::Str(s) => match s.trim() {
                "true" => Ok(ParamValue::Bool(true)),
                "false" => Ok(ParamValue::Bool(false)),
                _ => Err(mismatch()),
            },
            _ => Err(mismatch()),
        },
        ParamKind::Str => match value {
            RawValue::Str(s) => Ok(ParamValue::Str(s.clone())),
            _ => Err(mismatch()),
        },
        ParamKind::Component(nested_category) => match value {
            RawValue::Component(spec) => {
                let handle = create_from_spec(registry, nested_category, spec)?;
                Ok(ParamValue::Component(handle))
            }
            // A bare name is shorthand for a component with no parameters.
            RawValue::Str(name) => {
                let handle = create(registry, nested_category, name, &RawParams::new())?;
                Ok(ParamValue::Component(handle))
            }
            _ => Err(mismatch()),
        },
    }
}
