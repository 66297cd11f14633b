//! Rendering of resolved values

use anyhow::{Context, Result};
use config::{Binding, ValueMap};

/// `DISPLAY_NAME=value` lines in parameter name order
pub fn render_text(binding: &Binding, values: &ValueMap) -> String {
    values
        .iter()
        .map(|(name, value)| {
            let key = binding
                .display_name(name.as_str())
                .unwrap_or_else(|| name.to_string());
            format!("{}={}\n", key, value)
        })
        .collect()
}

/// JSON object keyed by parameter name
pub fn render_json(values: &ValueMap) -> Result<String> {
    serde_json::to_string_pretty(values).context("Failed to serialize resolved values")
}
