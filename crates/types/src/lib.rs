//! Shared types for Envbind
//!
//! This crate contains the parameter, value and error types used by the
//! resolution engine and the `envcheck` tool.

pub mod error;
pub mod param;
pub mod value;

// Re-export commonly used types
pub use error::{EnvbindError, Reason, ResolutionError, Result};
pub use param::ParamName;
pub use value::{ParamType, Value};
