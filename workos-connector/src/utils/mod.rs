//! Local input helpers. Everything here runs before a request is sent.

use crate::services::workos::{Query, WorkOsError};
use serde_json::{Map, Value};
use validator::ValidateEmail;

/// Require a non-empty id carrying the WorkOS `<prefix>_` marker.
pub fn validate_id(id: &str, prefix: &str, field_name: &str) -> Result<(), WorkOsError> {
    if id.trim().is_empty() {
        return Err(WorkOsError::invalid_input(format!(
            "{} is required",
            field_name
        )));
    }
    if !id.starts_with(&format!("{}_", prefix)) {
        return Err(WorkOsError::invalid_input(format!(
            "{} must start with '{}_'",
            field_name, prefix
        )));
    }
    if id.contains('/') || id.contains('?') || id.contains('#') {
        return Err(WorkOsError::invalid_input(format!(
            "{} contains invalid characters",
            field_name
        )));
    }
    Ok(())
}

/// Accept a JSON object either inline or as a JSON-encoded string.
///
/// A blank string and `null` both mean "no fields".
pub fn parse_json_parameter(
    value: &Value,
    parameter_name: &str,
) -> Result<Map<String, Value>, WorkOsError> {
    match value {
        Value::Null => Ok(Map::new()),
        Value::Object(map) => Ok(map.clone()),
        Value::String(raw) if raw.trim().is_empty() => Ok(Map::new()),
        Value::String(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(WorkOsError::invalid_input(format!(
                "Invalid JSON in {}: expected an object",
                parameter_name
            ))),
            Err(e) => Err(WorkOsError::invalid_input(format!(
                "Invalid JSON in {}: {}",
                parameter_name, e
            ))),
        },
        _ => Err(WorkOsError::invalid_input(format!(
            "Invalid JSON in {}: expected an object",
            parameter_name
        ))),
    }
}

/// Drop null, empty-string and empty-array properties.
pub fn clean_empty_properties(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .filter(|(_, value)| match value {
            Value::Null => false,
            Value::String(s) => !s.is_empty(),
            Value::Array(items) => !items.is_empty(),
            _ => true,
        })
        .collect()
}

/// Turn list filters into query parameters.
///
/// Arrays are comma-joined, objects are sent as JSON, empty values dropped.
pub fn build_filter_query(filters: &Map<String, Value>) -> Query {
    let mut query = Query::new();

    for (key, value) in filters {
        let rendered = match value {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            Value::Array(items) if items.is_empty() => None,
            Value::Array(items) => Some(
                items
                    .iter()
                    .map(|item| match item {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            other => Some(other.to_string()),
        };

        if let Some(rendered) = rendered {
            query.insert(key.clone(), rendered);
        }
    }

    query
}

pub fn is_valid_email(email: &str) -> bool {
    email.validate_email()
}
