//! Raw string to typed value conversion

use thiserror::Error;
use types::{ParamType, Value};

/// A raw value did not match the grammar of the requested type.
///
/// The raw text is deliberately not kept: configuration values may be secrets.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("value of length {raw_len} is not a valid {expected}")]
pub struct CoercionError {
    pub raw_len: usize,
    pub expected: ParamType,
}

/// Convert `raw` into a value of type `ty`.
///
/// The whole string must match: no trimming, no partial parses, no locale
/// handling. Floats must be finite. Booleans accept exactly `true` and `false`.
pub fn coerce(raw: &str, ty: ParamType) -> Result<Value, CoercionError> {
    let failed = || CoercionError {
        raw_len: raw.len(),
        expected: ty,
    };

    match ty {
        ParamType::String => Ok(Value::String(raw.to_string())),
        ParamType::Integer => raw.parse::<i64>().map(Value::Integer).map_err(|_| failed()),
        // `f64::from_str` also takes `NaN`, `inf` and overflowing literals.
        ParamType::Float => match raw.parse::<f64>() {
            Ok(x) if x.is_finite() => Ok(Value::Float(x)),
            _ => Err(failed()),
        },
        ParamType::Boolean => match raw {
            "true" => Ok(Value::Boolean(true)),
            "false" => Ok(Value::Boolean(false)),
            _ => Err(failed()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_is_identity() {
        assert_eq!(coerce(" padded ", ParamType::String).unwrap(), Value::from(" padded "));
    }

    #[test]
    fn test_integer_parsing() {
        assert_eq!(coerce("42", ParamType::Integer).unwrap(), Value::Integer(42));
        assert_eq!(coerce("-7", ParamType::Integer).unwrap(), Value::Integer(-7));
        assert!(coerce("42abc", ParamType::Integer).is_err());
        assert!(coerce(" 42", ParamType::Integer).is_err());
        assert!(coerce("4.2", ParamType::Integer).is_err());
        assert!(coerce("forty-two", ParamType::Integer).is_err());
        assert!(coerce("99999999999999999999", ParamType::Integer).is_err());
    }

    #[test]
    fn test_float_parsing() {
        assert_eq!(coerce("1.5", ParamType::Float).unwrap(), Value::Float(1.5));
        assert_eq!(coerce("3", ParamType::Float).unwrap(), Value::Float(3.0));
        assert_eq!(coerce("-0.25", ParamType::Float).unwrap(), Value::Float(-0.25));
        assert!(coerce("invalid value", ParamType::Float).is_err());
        assert!(coerce("1.5s", ParamType::Float).is_err());
        assert!(coerce("1,5", ParamType::Float).is_err());
    }

    #[test]
    fn test_float_rejects_non_finite() {
        for raw in ["NaN", "nan", "inf", "-inf", "infinity", "-infinity", "1e400"] {
            assert!(coerce(raw, ParamType::Float).is_err(), "{raw:?} should be rejected");
        }
        assert_eq!(coerce("1e3", ParamType::Float).unwrap(), Value::Float(1000.0));
    }

    #[test]
    fn test_boolean_literals_only() {
        assert_eq!(coerce("true", ParamType::Boolean).unwrap(), Value::Boolean(true));
        assert_eq!(coerce("false", ParamType::Boolean).unwrap(), Value::Boolean(false));
        for raw in ["False", "TRUE", "0", "1", "yes", "no", "true "] {
            assert!(coerce(raw, ParamType::Boolean).is_err(), "{raw:?} should be rejected");
        }
    }

    #[test]
    fn test_error_does_not_leak_raw_value() {
        let err = coerce("s3cr3t", ParamType::Integer).unwrap_err();
        assert_eq!(err.expected, ParamType::Integer);
        assert!(!err.to_string().contains("s3cr3t"));
    }
}
