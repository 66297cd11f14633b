//! Parameter resolution
//!
//! [`fetch_one`] resolves a single parameter, [`fetch_all`] resolves a whole
//! parameter set with one adapter read and collects every failure. Neither
//! function escalates; callers decide what to do with the errors.

use crate::adapter::Adapter;
use crate::coerce::coerce;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};
use types::{ParamName, ParamType, ResolutionError, Value};

/// Parameters to resolve, keyed by name
pub type ParamSet = BTreeMap<ParamName, ParamOptions>;

/// Successfully resolved values, keyed by name
pub type ValueMap = BTreeMap<ParamName, Value>;

/// Outcome of a batch resolution: every value, or every error message sorted
pub type BatchResult = std::result::Result<ValueMap, Vec<String>>;

/// Zero-argument producer for computed defaults
pub type Producer = Arc<dyn Fn() -> Value + Send + Sync>;

/// Default used when the source has no usable value.
///
/// Defaults are returned as-is and never coerced.
#[derive(Clone)]
pub enum DefaultValue {
    /// Fixed when the parameter was declared
    Literal(Value),
    /// Computed once when the binding was built
    Eager(Value),
    /// Computed again on every resolution that needs it
    Lazy(Producer),
}

impl DefaultValue {
    pub fn lazy<F>(producer: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        DefaultValue::Lazy(Arc::new(producer))
    }

    pub fn resolve(&self) -> Value {
        match self {
            DefaultValue::Literal(value) | DefaultValue::Eager(value) => value.clone(),
            DefaultValue::Lazy(producer) => producer(),
        }
    }

    pub fn is_lazy(&self) -> bool {
        matches!(self, DefaultValue::Lazy(_))
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            DefaultValue::Eager(value) => f.debug_tuple("Eager").field(value).finish(),
            DefaultValue::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}

impl From<Value> for DefaultValue {
    fn from(value: Value) -> Self {
        DefaultValue::Literal(value)
    }
}

macro_rules! literal_default_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for DefaultValue {
                fn from(value: $ty) -> Self {
                    DefaultValue::Literal(Value::from(value))
                }
            }
        )*
    };
}

literal_default_from!(&str, String, i64, i32, f64, bool);

/// How one parameter is resolved
#[derive(Debug, Clone, Default)]
pub struct ParamOptions {
    pub param_type: ParamType,
    /// `None` makes the parameter mandatory
    pub default: Option<DefaultValue>,
}

impl ParamOptions {
    pub fn new(param_type: ParamType) -> Self {
        Self {
            param_type,
            default: None,
        }
    }

    pub fn with_default(mut self, default: impl Into<DefaultValue>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn is_mandatory(&self) -> bool {
        self.default.is_none()
    }
}

/// Resolve one parameter against `adapter`.
///
/// The error list always holds exactly one entry, so single and batch
/// results compose the same way.
pub fn fetch_one<A>(
    adapter: &A,
    name: &ParamName,
    options: &ParamOptions,
) -> std::result::Result<Value, Vec<ResolutionError>>
where
    A: Adapter + ?Sized,
{
    resolve_param(adapter, name, options).map_err(|e| vec![e])
}

/// Single-parameter resolution with the bare error, used by binding accessors
pub(crate) fn resolve_param<A>(
    adapter: &A,
    name: &ParamName,
    options: &ParamOptions,
) -> std::result::Result<Value, ResolutionError>
where
    A: Adapter + ?Sized,
{
    let display_name = adapter.display_name(name);
    let raw = adapter
        .values(std::slice::from_ref(name))
        .into_iter()
        .next()
        .flatten();

    resolve_raw(display_name, raw, options)
}

/// Resolve every parameter in `params` with a single adapter read.
///
/// Any failure suppresses the value map entirely; the error messages are
/// sorted so the output does not depend on iteration order.
pub fn fetch_all<A>(adapter: &A, params: &ParamSet) -> BatchResult
where
    A: Adapter + ?Sized,
{
    if params.is_empty() {
        return Ok(ValueMap::new());
    }

    let names: Vec<ParamName> = params.keys().cloned().collect();
    let raw_values = adapter.values(&names);
    if raw_values.len() != names.len() {
        warn!(
            expected = names.len(),
            returned = raw_values.len(),
            "Adapter returned a misaligned value list"
        );
    }

    let mut values = ValueMap::new();
    let mut report = ErrorReport::new();

    // Parameters past the end of a short answer resolve as absent.
    let raw_values = raw_values.into_iter().map(Some).chain(std::iter::repeat(None));
    for ((name, options), raw) in params.iter().zip(raw_values) {
        match resolve_raw(adapter.display_name(name), raw.flatten(), options) {
            Ok(value) => {
                values.insert(name.clone(), value);
            }
            Err(err) => report.add(err),
        }
    }

    debug!(
        params = params.len(),
        errors = report.len(),
        "Resolved parameter set"
    );

    if report.is_empty() {
        Ok(values)
    } else {
        Err(report.into_sorted_messages())
    }
}

/// Shared resolution step: empty counts as absent, defaults are returned
/// verbatim, present values are coerced.
fn resolve_raw(
    display_name: String,
    raw: Option<String>,
    options: &ParamOptions,
) -> std::result::Result<Value, ResolutionError> {
    match raw.filter(|raw| !raw.is_empty()) {
        Some(raw) => match coerce(&raw, options.param_type) {
            Ok(value) => {
                debug!(param = %display_name, source = "adapter", "Parameter resolved");
                Ok(value)
            }
            Err(e) => {
                debug!(param = %display_name, error = %e, "Parameter is invalid");
                Err(ResolutionError::invalid(display_name))
            }
        },
        None => match &options.default {
            Some(default) => {
                debug!(param = %display_name, source = "default", lazy = default.is_lazy(), "Parameter resolved");
                Ok(default.resolve())
            }
            None => {
                debug!(param = %display_name, "Parameter is missing");
                Err(ResolutionError::missing(display_name))
            }
        },
    }
}

/// Accumulates resolution errors across a parameter set
#[derive(Debug, Clone, Default)]
pub struct ErrorReport {
    errors: Vec<ResolutionError>,
}

impl ErrorReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, error: ResolutionError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Rendered messages in lexicographic order
    pub fn into_sorted_messages(self) -> Vec<String> {
        let mut messages: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
        messages.sort();
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::MapAdapter;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn params(entries: Vec<(&str, ParamOptions)>) -> ParamSet {
        entries
            .into_iter()
            .map(|(name, options)| (ParamName::from(name), options))
            .collect()
    }

    #[test]
    fn test_fetch_one_coerces_source_value() {
        let adapter = MapAdapter::new().with("opt_2", "42");
        let value = fetch_one(&adapter, &"opt_2".into(), &ParamOptions::new(ParamType::Integer));
        assert_eq!(value, Ok(Value::Integer(42)));
    }

    #[test]
    fn test_fetch_one_default_is_returned_verbatim() {
        let adapter = MapAdapter::new();
        // A string default on an integer parameter is not coerced.
        let options = ParamOptions::new(ParamType::Integer).with_default("not a number");
        let value = fetch_one(&adapter, &"opt".into(), &options);
        assert_eq!(value, Ok(Value::from("not a number")));
    }

    #[test]
    fn test_fetch_one_source_wins_over_default() {
        let adapter = MapAdapter::new().with("port", "9000");
        let options = ParamOptions::new(ParamType::Integer).with_default(8080);
        assert_eq!(
            fetch_one(&adapter, &"port".into(), &options),
            Ok(Value::Integer(9000))
        );
    }

    #[test]
    fn test_fetch_one_empty_string_is_missing() {
        let adapter = MapAdapter::new().with("name", "");
        let result = fetch_one(&adapter, &"name".into(), &ParamOptions::default());
        assert_eq!(result, Err(vec![ResolutionError::missing("name")]));

        let options = ParamOptions::default().with_default("fallback");
        assert_eq!(
            fetch_one(&adapter, &"name".into(), &options),
            Ok(Value::from("fallback"))
        );
    }

    #[test]
    fn test_fetch_one_invalid_is_never_missing() {
        let adapter = MapAdapter::new()
            .with("i", "12x")
            .with("f", "abc")
            .with("b", "False");
        for (name, ty) in [
            ("i", ParamType::Integer),
            ("f", ParamType::Float),
            ("b", ParamType::Boolean),
        ] {
            let options = ParamOptions::new(ty).with_default(Value::from(true));
            let result = fetch_one(&adapter, &name.into(), &options);
            assert_eq!(result, Err(vec![ResolutionError::invalid(name)]));
        }
    }

    #[test]
    fn test_fetch_one_boolean_literals() {
        let adapter = MapAdapter::new().with("flag", "false").with("zero", "0");
        let options = ParamOptions::new(ParamType::Boolean);
        assert_eq!(fetch_one(&adapter, &"flag".into(), &options), Ok(Value::Boolean(false)));
        assert!(fetch_one(&adapter, &"zero".into(), &options).is_err());
    }

    #[test]
    fn test_fetch_all_collects_sorted_errors() {
        let adapter = MapAdapter::new().with("P3", "invalid value");
        let set = params(vec![
            ("P3", ParamOptions::new(ParamType::Float)),
            ("P2", ParamOptions::new(ParamType::Integer).with_default(42)),
            ("P1", ParamOptions::new(ParamType::String)),
        ]);

        let result = fetch_all(&adapter, &set);
        assert_eq!(
            result,
            Err(vec!["P1 is missing".to_string(), "P3 is invalid".to_string()])
        );
    }

    #[test]
    fn test_fetch_all_sorts_by_message_not_name() {
        // Names sort b < c but the display names come back reversed.
        struct Reversed(MapAdapter);

        impl Adapter for Reversed {
            fn display_name(&self, param: &ParamName) -> String {
                match param.as_str() {
                    "b" => "Z_B".to_string(),
                    other => format!("A_{}", other.to_uppercase()),
                }
            }

            fn values(&self, params: &[ParamName]) -> Vec<Option<String>> {
                self.0.values(params)
            }
        }

        let adapter = Reversed(MapAdapter::new());
        let set = params(vec![("b", ParamOptions::default()), ("c", ParamOptions::default())]);
        assert_eq!(
            fetch_all(&adapter, &set),
            Err(vec!["A_C is missing".to_string(), "Z_B is missing".to_string()])
        );
    }

    #[test]
    fn test_fetch_all_success_map() {
        let adapter = MapAdapter::new()
            .with("host", "localhost")
            .with("port", "5432")
            .with("ratio", "0.5");
        let set = params(vec![
            ("host", ParamOptions::default()),
            ("port", ParamOptions::new(ParamType::Integer)),
            ("ratio", ParamOptions::new(ParamType::Float)),
            ("tls", ParamOptions::new(ParamType::Boolean).with_default(false)),
        ]);

        let values = fetch_all(&adapter, &set).unwrap();
        assert_eq!(values.len(), 4);
        assert_eq!(values["host"], Value::from("localhost"));
        assert_eq!(values["port"], Value::Integer(5432));
        assert_eq!(values["ratio"], Value::Float(0.5));
        assert_eq!(values["tls"], Value::Boolean(false));
    }

    #[test]
    fn test_fetch_all_single_error_suppresses_map() {
        let adapter = MapAdapter::new().with("a", "1").with("b", "oops");
        let set = params(vec![
            ("a", ParamOptions::new(ParamType::Integer)),
            ("b", ParamOptions::new(ParamType::Integer)),
        ]);
        assert_eq!(fetch_all(&adapter, &set), Err(vec!["b is invalid".to_string()]));
    }

    #[test]
    fn test_fetch_all_reads_adapter_once() {
        struct Counting {
            inner: MapAdapter,
            reads: AtomicUsize,
        }

        impl Adapter for Counting {
            fn display_name(&self, param: &ParamName) -> String {
                self.inner.display_name(param)
            }

            fn values(&self, params: &[ParamName]) -> Vec<Option<String>> {
                self.reads.fetch_add(1, Ordering::SeqCst);
                self.inner.values(params)
            }
        }

        let adapter = Counting {
            inner: MapAdapter::new().with("a", "x"),
            reads: AtomicUsize::new(0),
        };
        let set = params(vec![
            ("a", ParamOptions::default()),
            ("b", ParamOptions::default().with_default("y")),
            ("c", ParamOptions::default().with_default("z")),
        ]);

        assert!(fetch_all(&adapter, &set).is_ok());
        assert_eq!(adapter.reads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_fetch_all_short_adapter_answer_reports_missing() {
        struct Truncating(MapAdapter);

        impl Adapter for Truncating {
            fn display_name(&self, param: &ParamName) -> String {
                self.0.display_name(param)
            }

            fn values(&self, params: &[ParamName]) -> Vec<Option<String>> {
                let mut values = self.0.values(params);
                values.truncate(1);
                values
            }
        }

        let adapter = Truncating(MapAdapter::new().with("a", "1").with("b", "2").with("c", "3"));
        let set = params(vec![
            ("a", ParamOptions::new(ParamType::Integer)),
            ("b", ParamOptions::new(ParamType::Integer)),
            ("c", ParamOptions::new(ParamType::Integer).with_default(9)),
        ]);
        assert_eq!(fetch_all(&adapter, &set), Err(vec!["b is missing".to_string()]));
    }

    #[test]
    fn test_fetch_all_non_finite_float_is_invalid() {
        let adapter = MapAdapter::new().with("x", "NaN");
        let set = params(vec![("x", ParamOptions::new(ParamType::Float))]);
        let first = fetch_all(&adapter, &set);
        assert_eq!(first, Err(vec!["x is invalid".to_string()]));
        assert_eq!(first, fetch_all(&adapter, &set));
    }

    #[test]
    fn test_fetch_all_is_idempotent() {
        let adapter = MapAdapter::new().with("a", "1").with("b", "bad");
        let set = params(vec![
            ("a", ParamOptions::new(ParamType::Integer)),
            ("b", ParamOptions::new(ParamType::Boolean)),
            ("c", ParamOptions::default()),
        ]);
        assert_eq!(fetch_all(&adapter, &set), fetch_all(&adapter, &set));
    }

    #[test]
    fn test_fetch_all_empty_set() {
        let adapter = MapAdapter::new();
        assert_eq!(fetch_all(&adapter, &ParamSet::new()), Ok(ValueMap::new()));
    }

    #[test]
    fn test_lazy_default_runs_on_every_resolution() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let options = ParamOptions::new(ParamType::Integer).with_default(DefaultValue::lazy(move || {
            Value::Integer(counter.fetch_add(1, Ordering::SeqCst) as i64)
        }));
        let adapter = MapAdapter::new();

        assert_eq!(fetch_one(&adapter, &"n".into(), &options), Ok(Value::Integer(0)));
        assert_eq!(fetch_one(&adapter, &"n".into(), &options), Ok(Value::Integer(1)));

        adapter.insert("n", "7");
        assert_eq!(fetch_one(&adapter, &"n".into(), &options), Ok(Value::Integer(7)));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_default_value_debug_does_not_call_producer() {
        let default = DefaultValue::lazy(|| panic!("producer must not run"));
        assert_eq!(format!("{:?}", default), "Lazy(..)");
        assert_eq!(format!("{:?}", DefaultValue::from(3)), "Literal(Integer(3))");
    }
}
