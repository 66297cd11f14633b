//! Source adapters
//!
//! An adapter is the only thing the engine reads from. It maps internal
//! parameter names to external lookup keys and answers bulk lookups.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::warn;
use types::ParamName;

/// Contract every configuration source implements.
///
/// `values` must return exactly one entry per requested name, in the same
/// order as the request. Key/value sources (such as the process environment)
/// are responsible for producing that alignment themselves.
pub trait Adapter: Send + Sync {
    /// External key the source understands for `param`
    fn display_name(&self, param: &ParamName) -> String;

    /// Raw values for `params`, positionally aligned; `None` when the source
    /// has no entry
    fn values(&self, params: &[ParamName]) -> Vec<Option<String>>;
}

impl<A: Adapter + ?Sized> Adapter for &A {
    fn display_name(&self, param: &ParamName) -> String {
        (**self).display_name(param)
    }

    fn values(&self, params: &[ParamName]) -> Vec<Option<String>> {
        (**self).values(params)
    }
}

impl<A: Adapter + ?Sized> Adapter for Box<A> {
    fn display_name(&self, param: &ParamName) -> String {
        (**self).display_name(param)
    }

    fn values(&self, params: &[ParamName]) -> Vec<Option<String>> {
        (**self).values(params)
    }
}

impl<A: Adapter + ?Sized> Adapter for Arc<A> {
    fn display_name(&self, param: &ParamName) -> String {
        (**self).display_name(param)
    }

    fn values(&self, params: &[ParamName]) -> Vec<Option<String>> {
        (**self).values(params)
    }
}

/// Reads parameters from process environment variables.
///
/// The variable name is the upper-cased parameter name, prefixed with
/// `PREFIX_` when a prefix is configured.
#[derive(Debug, Clone, Default)]
pub struct EnvAdapter {
    prefix: Option<String>,
}

impl EnvAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            prefix: (!prefix.is_empty()).then_some(prefix),
        }
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }
}

impl Adapter for EnvAdapter {
    fn display_name(&self, param: &ParamName) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}_{}", prefix, param).to_uppercase(),
            None => param.as_str().to_uppercase(),
        }
    }

    fn values(&self, params: &[ParamName]) -> Vec<Option<String>> {
        params
            .iter()
            .map(|param| {
                let key = self.display_name(param);
                match std::env::var_os(&key)?.into_string() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!(variable = %key, "Environment variable is not valid UTF-8; treating as unset");
                        None
                    }
                }
            })
            .collect()
    }
}

/// In-memory adapter keyed by parameter name.
///
/// Display names are the parameter names themselves. The map sits behind a
/// lock so a shared adapter can be changed between resolutions.
#[derive(Debug, Default)]
pub struct MapAdapter {
    entries: RwLock<HashMap<String, String>>,
}

impl MapAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.into(), value.into());
    }

    pub fn remove(&self, key: &str) -> Option<String> {
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(key)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapAdapter {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: RwLock::new(
                iter.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

impl Adapter for MapAdapter {
    fn display_name(&self, param: &ParamName) -> String {
        param.to_string()
    }

    fn values(&self, params: &[ParamName]) -> Vec<Option<String>> {
        let entries = self
            .entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        params
            .iter()
            .map(|param| entries.get(param.as_str()).cloned())
            .collect()
    }
}
