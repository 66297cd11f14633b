//! Declarative parameter bindings
//!
//! A [`Binding`] is built once from a list of [`ParamDecl`]s and an adapter.
//! It exposes one accessor per declared parameter, a bulk fetch and a
//! validation entry point. Nothing is cached: every call re-reads the adapter.
//!
//! ```
//! use config::{Binding, MapAdapter, ParamDecl};
//! use types::{ParamType, Value};
//!
//! let adapter = MapAdapter::new().with("port", "8080");
//! let binding = Binding::builder(adapter)
//!     .param(ParamDecl::new("port").of_type(ParamType::Integer))
//!     .param(ParamDecl::new("host").default_value("localhost"))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(binding.get("port").unwrap(), Value::Integer(8080));
//! assert_eq!(binding.get_string("host").unwrap(), "localhost");
//! assert!(binding.validate().is_ok());
//! ```

use crate::adapter::Adapter;
use crate::resolver::{fetch_all, resolve_param, BatchResult, DefaultValue, ParamOptions, ParamSet, Producer};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};
use types::{EnvbindError, ParamName, ParamType, ResolutionError, Result, Value};

/// When a computed default is evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timing {
    /// Once, when the binding is built; the result is reused
    Once,
    /// On every fetch that falls back to the default
    EveryFetch,
}

/// Default as written in a declaration
#[derive(Clone)]
pub enum DefaultSpec {
    Literal(Value),
    Computed { producer: Producer, timing: Timing },
}

impl fmt::Debug for DefaultSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultSpec::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            DefaultSpec::Computed { timing, .. } => f
                .debug_struct("Computed")
                .field("timing", timing)
                .finish_non_exhaustive(),
        }
    }
}

impl DefaultSpec {
    /// Turn the declared default into its resolution form, running `Once`
    /// producers now
    fn into_default(self) -> DefaultValue {
        match self {
            DefaultSpec::Literal(value) => DefaultValue::Literal(value),
            DefaultSpec::Computed {
                producer,
                timing: Timing::Once,
            } => DefaultValue::Eager(producer()),
            DefaultSpec::Computed {
                producer,
                timing: Timing::EveryFetch,
            } => DefaultValue::Lazy(producer),
        }
    }
}

/// Declaration of one bound parameter
#[derive(Debug, Clone)]
pub struct ParamDecl {
    pub name: ParamName,
    pub param_type: ParamType,
    pub default: Option<DefaultSpec>,
}

impl ParamDecl {
    /// A mandatory string parameter
    pub fn new(name: impl Into<ParamName>) -> Self {
        Self {
            name: name.into(),
            param_type: ParamType::String,
            default: None,
        }
    }

    pub fn of_type(mut self, param_type: ParamType) -> Self {
        self.param_type = param_type;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(DefaultSpec::Literal(value.into()));
        self
    }

    pub fn default_with<F>(mut self, producer: F, timing: Timing) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.default = Some(DefaultSpec::Computed {
            producer: Arc::new(producer),
            timing,
        });
        self
    }
}

impl From<&str> for ParamDecl {
    fn from(name: &str) -> Self {
        ParamDecl::new(name)
    }
}

impl From<String> for ParamDecl {
    fn from(name: String) -> Self {
        ParamDecl::new(name)
    }
}

type ResolveFn = Box<dyn Fn() -> std::result::Result<Value, ResolutionError> + Send + Sync>;

/// Zero-argument getter bound to one parameter
pub struct Accessor {
    name: ParamName,
    resolve: ResolveFn,
}

impl Accessor {
    pub fn name(&self) -> &ParamName {
        &self.name
    }

    /// Resolve the parameter now, failing with its single error message
    pub fn get(&self) -> Result<Value> {
        (self.resolve)().map_err(EnvbindError::Resolution)
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor").field("name", &self.name).finish_non_exhaustive()
    }
}

/// Collects declarations before building a [`Binding`]
pub struct BindingBuilder {
    adapter: Arc<dyn Adapter>,
    decls: Vec<ParamDecl>,
}

impl BindingBuilder {
    pub fn param(mut self, decl: impl Into<ParamDecl>) -> Self {
        self.decls.push(decl.into());
        self
    }

    pub fn params<I, D>(mut self, decls: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<ParamDecl>,
    {
        self.decls.extend(decls.into_iter().map(Into::into));
        self
    }

    /// Validate the declarations, evaluate build-time defaults and create the
    /// accessor table
    pub fn build(self) -> Result<Binding> {
        let mut params = ParamSet::new();
        for decl in self.decls {
            if params.contains_key(&decl.name) {
                return Err(EnvbindError::DuplicateParam {
                    name: decl.name.to_string(),
                });
            }
            let options = ParamOptions {
                param_type: decl.param_type,
                default: decl.default.map(DefaultSpec::into_default),
            };
            params.insert(decl.name, options);
        }

        let accessors = params
            .iter()
            .map(|(name, options)| {
                let adapter = Arc::clone(&self.adapter);
                let bound_name = name.clone();
                let options = options.clone();
                let accessor = Accessor {
                    name: name.clone(),
                    resolve: Box::new(move || resolve_param(adapter.as_ref(), &bound_name, &options)),
                };
                (name.clone(), accessor)
            })
            .collect();

        info!(params = params.len(), "Parameter binding built");

        Ok(Binding {
            adapter: self.adapter,
            params,
            accessors,
        })
    }
}

/// Resolution surface generated from a fixed declaration list
pub struct Binding {
    adapter: Arc<dyn Adapter>,
    params: ParamSet,
    accessors: BTreeMap<ParamName, Accessor>,
}

impl Binding {
    pub fn builder<A: Adapter + 'static>(adapter: A) -> BindingBuilder {
        BindingBuilder {
            adapter: Arc::new(adapter),
            decls: Vec::new(),
        }
    }

    /// Shortcut for `Binding::builder(adapter).params(decls).build()`
    pub fn new<A, I, D>(adapter: A, decls: I) -> Result<Self>
    where
        A: Adapter + 'static,
        I: IntoIterator<Item = D>,
        D: Into<ParamDecl>,
    {
        Self::builder(adapter).params(decls).build()
    }

    /// Resolve every declared parameter
    pub fn fetch_all(&self) -> BatchResult {
        fetch_all(self.adapter.as_ref(), &self.params)
    }

    /// Succeeds when every parameter resolves; otherwise fails with all
    /// error messages, sorted
    pub fn validate(&self) -> Result<()> {
        match self.fetch_all() {
            Ok(_) => Ok(()),
            Err(messages) => {
                warn!(errors = messages.len(), "Parameter validation failed");
                Err(EnvbindError::Validation(messages))
            }
        }
    }

    pub fn accessor(&self, name: &str) -> Option<&Accessor> {
        self.accessors.get(name)
    }

    pub fn get(&self, name: &str) -> Result<Value> {
        self.accessor(name)
            .ok_or_else(|| EnvbindError::UnknownParam {
                name: name.to_string(),
            })?
            .get()
    }

    pub fn get_string(&self, name: &str) -> Result<String> {
        match self.get(name)? {
            Value::String(s) => Ok(s),
            _ => Err(self.type_mismatch(name)),
        }
    }

    pub fn get_integer(&self, name: &str) -> Result<i64> {
        let value = self.get(name)?;
        value.as_i64().ok_or_else(|| self.type_mismatch(name))
    }

    pub fn get_float(&self, name: &str) -> Result<f64> {
        let value = self.get(name)?;
        value.as_f64().ok_or_else(|| self.type_mismatch(name))
    }

    pub fn get_bool(&self, name: &str) -> Result<bool> {
        let value = self.get(name)?;
        value.as_bool().ok_or_else(|| self.type_mismatch(name))
    }

    // Reached when a default of another type was declared; the parameter
    // cannot be used as the caller asked.
    fn type_mismatch(&self, name: &str) -> EnvbindError {
        EnvbindError::Resolution(ResolutionError::invalid(
            self.adapter.display_name(&ParamName::from(name)),
        ))
    }

    /// External key for a declared parameter
    pub fn display_name(&self, name: &str) -> Option<String> {
        self.params
            .get_key_value(name)
            .map(|(name, _)| self.adapter.display_name(name))
    }

    pub fn options(&self, name: &str) -> Option<&ParamOptions> {
        self.params.get(name)
    }

    /// Declared names, in sorted order
    pub fn param_names(&self) -> impl Iterator<Item = &ParamName> {
        self.params.keys()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}
