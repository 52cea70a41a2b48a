//! Parameter schema for component constructors.
//!
//! Each component declares its parameters via a static `ParamDescriptor`
//! array. The instance factory validates raw input against these descriptors,
//! coerces types, applies defaults, and hands the component a resolved
//! [`ParamSet`].

use crate::pipeline::stage::ComponentHandle;
use crate::registry::catalog::Category;
use std::collections::BTreeMap;

/// The declared type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Int,
    Float,
    Bool,
    Str,
    /// The parameter's value is itself a registered component of the given
    /// category, resolved recursively at construction time.
    Component(Category),
}

impl ParamKind {
    /// Human-readable name, used in error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            ParamKind::Int => "an integer",
            ParamKind::Float => "a float",
            ParamKind::Bool => "a bool",
            ParamKind::Str => "a string",
            ParamKind::Component(Category::Reader) => "a Reader component",
            ParamKind::Component(Category::Filter) => "a Filter component",
            ParamKind::Component(Category::Learner) => "a Learner component",
            ParamKind::Component(Category::Evaluator) => "an Evaluator component",
        }
    }
}

/// A declared default for an optional parameter.
///
/// Component-kind parameters cannot carry defaults; an absent optional
/// component parameter simply stays absent in the resolved [`ParamSet`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(&'static str),
}

/// Static descriptor for one constructor parameter. Immutable once declared.
#[derive(Debug, Clone)]
pub struct ParamDescriptor {
    /// Short flag identifier, e.g. `"-f"`.
    pub flag: &'static str,
    /// Human label advertised in the component declaration, e.g. `"Frequency"`.
    pub display_name: &'static str,
    pub kind: ParamKind,
    pub optional: bool,
    pub default: Option<DefaultValue>,
}

impl ParamDescriptor {
    pub const fn required(flag: &'static str, display_name: &'static str, kind: ParamKind) -> Self {
        Self {
            flag,
            display_name,
            kind,
            optional: false,
            default: None,
        }
    }

    pub const fn optional(
        flag: &'static str,
        display_name: &'static str,
        kind: ParamKind,
        default: DefaultValue,
    ) -> Self {
        Self {
            flag,
            display_name,
            kind,
            optional: true,
            default: Some(default),
        }
    }

    /// An optional parameter with no default (absent stays absent).
    pub const fn optional_bare(
        flag: &'static str,
        display_name: &'static str,
        kind: ParamKind,
    ) -> Self {
        Self {
            flag,
            display_name,
            kind,
            optional: true,
            default: None,
        }
    }
}

/// A resolved parameter value, coerced to its declared kind.
pub enum ParamValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    /// A fully constructed nested component.
    Component(ComponentHandle),
}

impl ParamValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParamValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            ParamValue::Float(v) => Some(*v),
            ParamValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Str(v) => Some(v),
            _ => None,
        }
    }
}

impl From<DefaultValue> for ParamValue {
    fn from(default: DefaultValue) -> Self {
        match default {
            DefaultValue::Int(v) => ParamValue::Int(v),
            DefaultValue::Float(v) => ParamValue::Float(v),
            DefaultValue::Bool(v) => ParamValue::Bool(v),
            DefaultValue::Str(v) => ParamValue::Str(v.to_string()),
        }
    }
}

impl std::fmt::Debug for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamValue::Int(v) => write!(f, "Int({})", v),
            ParamValue::Float(v) => write!(f, "Float({})", v),
            ParamValue::Bool(v) => write!(f, "Bool({})", v),
            ParamValue::Str(v) => write!(f, "Str({:?})", v),
            ParamValue::Component(c) => write!(f, "Component({} '{}')", c.category(), c.name()),
        }
    }
}

/// The resolved flag→value map handed to a component's factory.
///
/// By the time a factory sees a `ParamSet`, every required parameter is
/// present and every optional parameter with a default has been filled in.
#[derive(Debug, Default)]
pub struct ParamSet {
    values: BTreeMap<String, ParamValue>,
}

impl ParamSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, flag: impl Into<String>, value: ParamValue) {
        self.values.insert(flag.into(), value);
    }

    pub fn contains(&self, flag: &str) -> bool {
        self.values.contains_key(flag)
    }

    pub fn get_int(&self, flag: &str) -> Option<i64> {
        self.values.get(flag).and_then(ParamValue::as_int)
    }

    pub fn get_float(&self, flag: &str) -> Option<f64> {
        self.values.get(flag).and_then(ParamValue::as_float)
    }

    pub fn get_bool(&self, flag: &str) -> Option<bool> {
        self.values.get(flag).and_then(ParamValue::as_bool)
    }

    pub fn get_str(&self, flag: &str) -> Option<&str> {
        self.values.get(flag).and_then(ParamValue::as_str)
    }

    /// Take ownership of a constructed nested component.
    pub fn take_component(&mut self, flag: &str) -> Option<ComponentHandle> {
        match self.values.get(flag) {
            Some(ParamValue::Component(_)) => match self.values.remove(flag) {
                Some(ParamValue::Component(handle)) => Some(handle),
                _ => None,
            },
            _ => None,
        }
    }
}
