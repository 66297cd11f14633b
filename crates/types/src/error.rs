//! Error types for parameter resolution

use std::fmt;
use thiserror::Error;

/// Why a single parameter could not be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Reason {
    /// No usable raw value and no default
    Missing,
    /// Raw value present but it does not parse as the declared type
    Invalid,
}

impl Reason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Reason::Missing => "is missing",
            Reason::Invalid => "is invalid",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failure to resolve one parameter, rendered as `"<display_name> <reason>"`.
#[derive(Error, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[error("{display_name} {reason}")]
pub struct ResolutionError {
    pub display_name: String,
    pub reason: Reason,
}

impl ResolutionError {
    pub fn missing(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            reason: Reason::Missing,
        }
    }

    pub fn invalid(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            reason: Reason::Invalid,
        }
    }
}

/// Main error type raised by the binding surface
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EnvbindError {
    /// A single parameter failed to resolve; the message is the bare error
    #[error("{0}")]
    Resolution(ResolutionError),

    /// One or more parameters failed validation (messages are sorted)
    #[error("{}", .0.join(", "))]
    Validation(Vec<String>),

    /// Accessor requested for a name the binding does not declare
    #[error("Unknown parameter: {name}")]
    UnknownParam { name: String },

    /// The same name was declared twice in one binding
    #[error("Duplicate parameter declaration: {name}")]
    DuplicateParam { name: String },

    /// Declaration text could not be parsed
    #[error("Invalid parameter declaration: {0}")]
    InvalidDeclaration(String),
}

/// Result type alias for binding operations
pub type Result<T> = std::result::Result<T, EnvbindError>;

impl From<ResolutionError> for EnvbindError {
    fn from(err: ResolutionError) -> Self {
        EnvbindError::Resolution(err)
    }
}

impl EnvbindError {
    /// Messages carried by this error, one per failing parameter.
    pub fn messages(&self) -> Vec<String> {
        match self {
            EnvbindError::Validation(messages) => messages.clone(),
            other => vec![other.to_string()],
        }
    }
}
