//! Error types for sqlweave

use crate::builder::Phase;
use thiserror::Error;

/// Result type alias for sqlweave operations
pub type SqlResult<T> = Result<T, SqlError>;

/// Errors raised while composing or decomposing SQL text.
///
/// Every error is raised at the fluent call that caused it. A builder that
/// returned an error has been consumed and cannot be reused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SqlError {
    /// A name, list or operand violated the call's contract.
    #[error("Invalid argument '{name}': {message}")]
    InvalidArgument { name: &'static str, message: String },

    /// A predicate fragment has more distinct placeholders than supplied values.
    #[error("No value supplied for placeholder '{token}' at position {position}")]
    MissingArgument { position: usize, token: String },

    /// A predicate fragment was given more values than it has placeholders.
    #[error("Fragment has {expected} placeholder(s) but {supplied} value(s) were supplied")]
    UnusedArguments { expected: usize, supplied: usize },

    /// The fluent call is not legal for the builder's current phase.
    #[error("'{operation}' cannot be called when the builder is {phase}")]
    InvalidPhase {
        operation: &'static str,
        phase: Phase,
    },

    /// A dialect profile could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SqlError {
    /// Create an invalid argument error for the named parameter.
    pub fn invalid_argument(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            message: message.into(),
        }
    }

    /// Create an invalid phase error.
    pub fn invalid_phase(operation: &'static str, phase: Phase) -> Self {
        Self::InvalidPhase { operation, phase }
    }

    /// Check if this is a caller-supplied argument error.
    ///
    /// Placeholder/value mismatches count as argument errors.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument { .. } | Self::MissingArgument { .. } | Self::UnusedArguments { .. }
        )
    }

    /// Check if this is a phase-ordering error.
    pub fn is_invalid_phase(&self) -> bool {
        matches!(self, Self::InvalidPhase { .. })
    }
}

impl From<toml::de::Error> for SqlError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Reject empty or whitespace-only names.
pub(crate) fn require_name(name: &'static str, value: &str) -> SqlResult<()> {
    if value.trim().is_empty() {
        return Err(SqlError::invalid_argument(name, "cannot be empty"));
    }
    Ok(())
}
