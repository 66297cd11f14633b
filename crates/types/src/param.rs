//! Parameter identifiers

use serde::Serialize;
use std::borrow::Borrow;
use std::fmt;

/// Internal identifier of a configuration parameter.
///
/// Adapters map it to the external lookup key (see the `config` crate's
/// `Adapter::display_name`). Names are unique within one parameter set.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ParamName(String);

impl ParamName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParamName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for ParamName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl AsRef<str> for ParamName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ParamName {
    fn borrow(&self) -> &str {
        &self.0
    }
}
