//! Default value literals
//!
//! Strings are quoted with JSON escaping, lists render without spaces
//! (`[1,2,3]`), objects as `{k: v, ...}` with sorted keys.

use serde_json::Value;

use super::errors::{SchemaError, SchemaResult};
use super::types::TypeRef;

/// Render a parameter default as a schema literal
pub fn render_default(parameter: &str, value: &Value, ty: &TypeRef) -> SchemaResult<String> {
    if value.is_null() && ty.non_null {
        return Err(SchemaError::invalid_default(
            parameter,
            format!("null is not allowed for non-null type {}", ty),
        ));
    }
    Ok(render_value(value))
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        // Value's Display is compact JSON, which escapes like a schema string
        Value::String(_) => value.to_string(),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(render_value).collect();
            format!("[{}]", items.join(","))
        }
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let entries: Vec<String> = entries
                .into_iter()
                .map(|(k, v)| format!("{}: {}", k, render_value(v)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
    }
}
