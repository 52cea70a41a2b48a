//! Registry-specific error types.

use crate::registry::catalog::Category;
use thiserror::Error;

/// Errors raised by the component registry and instance factory.
///
/// All of these are configuration-time failures: they abort the registration
/// or construction attempt but never corrupt registry state.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("duplicate registration: a component named '{name}' already exists (category {existing})")]
    DuplicateRegistration { name: String, existing: Category },

    #[error("unknown component: no {category} named '{name}' is registered")]
    UnknownComponent { category: Category, name: String },

    #[error("component '{component}': missing required parameter '{flag}'")]
    MissingParameter { component: String, flag: String },

    #[error("component '{component}': unknown parameter '{flag}'")]
    UnknownParameter { component: String, flag: String },

    #[error("component '{component}', parameter '{flag}': expected {expected}, got '{got}'")]
    BadParameterValue {
        component: String,
        flag: String,
        expected: &'static str,
        got: String,
    },

    #[error("construction of component '{component}' failed: {message}")]
    Construction { component: String, message: String },
}

pub type RegistryResult<T> = std::result::Result<T, RegistryError>;
