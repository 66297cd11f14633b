//! Typed configuration resolution for Envbind
//!
//! This crate reads named parameters from a pluggable [`Adapter`], coerces
//! raw strings into typed values, applies defaults and collects every
//! validation failure of a parameter set in one pass.

pub mod adapter;
pub mod binding;
pub mod coerce;
pub mod resolver;

pub use adapter::{Adapter, EnvAdapter, MapAdapter};
pub use binding::{Accessor, Binding, BindingBuilder, DefaultSpec, ParamDecl, Timing};
pub use coerce::{coerce, CoercionError};
pub use resolver::{
    fetch_all, fetch_one, BatchResult, DefaultValue, ErrorReport, ParamOptions, ParamSet, Producer,
    ValueMap,
};
