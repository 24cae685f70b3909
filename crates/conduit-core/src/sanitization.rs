//! Masking of secrets before values reach logs, call history or terminal output

use serde_json::{Map, Value as JsonValue};

const SENSITIVE_FIELDS: &[&str] = &[
    "password",
    "passwd",
    "token",
    "secret",
    "authorization",
    "apikey",
    "api_key",
    "accesstoken",
    "access_token",
    "refreshtoken",
    "refresh_token",
    "clientsecret",
    "client_secret",
    "privatekey",
    "private_key",
];

/// Suffixes matched case-insensitively, covering both snake and camel case
const SENSITIVE_SUFFIXES: &[&str] = &["_key", "_token", "_secret", "_password", "apikey", "token", "secret"];

const REDACTED: &str = "***REDACTED***";

pub fn is_sensitive_field(field_name: &str) -> bool {
    let lower = field_name.to_lowercase();
    if SENSITIVE_FIELDS.iter().any(|s| lower == *s) {
        return true;
    }
    SENSITIVE_SUFFIXES.iter().any(|s| lower.ends_with(s))
}

/// Replace scalar values under sensitive keys, recursing into objects and arrays
pub fn sanitize_json_value(value: &JsonValue) -> JsonValue {
    match value {
        JsonValue::Object(map) => {
            let sanitized: Map<String, JsonValue> = map
                .iter()
                .map(|(key, val)| {
                    let val = match val {
                        JsonValue::String(_) | JsonValue::Number(_) | JsonValue::Bool(_)
                            if is_sensitive_field(key) =>
                        {
                            JsonValue::String(REDACTED.to_string())
                        }
                        other => sanitize_json_value(other),
                    };
                    (key.clone(), val)
                })
                .collect();
            JsonValue::Object(sanitized)
        }
        JsonValue::Array(items) => JsonValue::Array(items.iter().map(sanitize_json_value).collect()),
        other => other.clone(),
    }
}

/// Show only the last four characters of a secret
pub fn mask_secret(secret: &str) -> String {
    let count = secret.chars().count();
    if count <= 4 {
        return "****".to_string();
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("****{}", tail)
}
