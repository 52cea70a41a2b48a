//! Pipeline-specific error types.

use thiserror::Error;

/// A transient error while pulling the next instance from a reader.
///
/// Distinct from exhaustion, which a reader signals by returning `Ok(None)`.
/// The runner never retries a read error; an external caller may.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("read error: {message}")]
pub struct ReadError {
    pub message: String,
}

impl ReadError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors that can occur during pipeline assembly or execution.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The stage list does not form Reader → Filters → Learner → Evaluator.
    #[error("invalid pipeline shape: {0}")]
    InvalidShape(String),

    /// A stage failed to construct during assembly.
    #[error(transparent)]
    Registry(#[from] crate::registry::RegistryError),

    /// The reader failed mid-run; the run transitions to `Failed`.
    #[error(transparent)]
    Read(#[from] ReadError),

    /// A filter failed mid-run; the run transitions to `Failed`.
    #[error("filter '{name}' failed: {message}")]
    Filter { name: String, message: String },

    /// A pipeline spec document could not be parsed.
    #[error("pipeline spec error: {0}")]
    Spec(String),

    /// `run` was called on a pipeline that is not in the `Idle` state.
    #[error("pipeline is not idle (state {state})")]
    NotIdle { state: crate::pipeline::RunState },
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_error_display() {
        let err = ReadError::new("socket closed");
        assert_eq!(err.to_string(), "read error: socket closed");
    }

    #[test]
    fn test_read_error_converts_to_pipeline_error() {
        let err: PipelineError = ReadError::new("eof mid-record").into();
        assert!(matches!(err, PipelineError::Read(_)));
    }
}
