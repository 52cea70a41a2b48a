//! Error handling for the StreamMine-RS crate
//!
//! This module defines the crate-wide error type and a Result alias used by
//! the binary and the config loading layer. The registry and pipeline layers
//! define their own focused error enums which convert into this one.

use thiserror::Error;

/// Main error type for StreamMine-RS operations
#[derive(Error, Debug)]
pub enum StreamMineError {
    /// Errors raised by the component registry and instance factory
    #[error(transparent)]
    Registry(#[from] crate::registry::RegistryError),

    /// Errors raised during pipeline assembly or execution
    #[error(transparent)]
    Pipeline(#[from] crate::pipeline::PipelineError),

    /// Errors related to pipeline spec loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<StreamMineError>,
    },
}

impl StreamMineError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        StreamMineError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Result type alias for StreamMine-RS operations
pub type Result<T> = std::result::Result<T, StreamMineError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}
