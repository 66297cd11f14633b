//! Command-line parameter declarations
//!
//! Grammar: `name[:type][=default]`, e.g. `database_url`, `port:integer=8080`
//! or `debug:bool=false`. The default is parsed with the declared type.

use config::{coerce, ParamDecl};
use types::{EnvbindError, ParamType, Result};

pub fn parse_decl(input: &str) -> Result<ParamDecl> {
    let invalid = |message: String| EnvbindError::InvalidDeclaration(format!("'{}': {}", input, message));

    let (head, default) = match input.split_once('=') {
        Some((head, default)) => (head, Some(default)),
        None => (input, None),
    };
    let (name, param_type) = match head.split_once(':') {
        Some((name, ty)) => (name, ty.parse::<ParamType>().map_err(invalid)?),
        None => (head, ParamType::String),
    };

    if name.is_empty() {
        return Err(invalid("parameter name cannot be empty".to_string()));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(invalid(
            "parameter name may only contain ASCII letters, digits and '_'".to_string(),
        ));
    }

    let decl = ParamDecl::new(name).of_type(param_type);
    match default {
        Some(raw) => {
            let value = coerce(raw, param_type)
                .map_err(|_| invalid(format!("default is not a valid {}", param_type)))?;
            Ok(decl.default_value(value))
        }
        None => Ok(decl),
    }
}
