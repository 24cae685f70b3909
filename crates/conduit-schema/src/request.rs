use conduit_core::{ActionSchema, FieldKind, FieldLocation, FormValues, RequestPayload};
use serde_json::{Map, Number, Value as JsonValue};
use tracing::{debug, warn};

/// Convert collected form values into the execute payload. Absent, null and
/// empty-string values are skipped; conversion failures keep the raw string.
pub fn build_request(schema: &ActionSchema, values: &FormValues) -> RequestPayload {
    let mut payload = RequestPayload::default();

    for field in schema.all_fields() {
        let Some(value) = values.get(&field.name) else {
            continue;
        };
        let converted = match value {
            JsonValue::Null => continue,
            JsonValue::String(s) if s.is_empty() => continue,
            JsonValue::String(raw) => convert_text(&field.name, field.kind, field.is_array, raw),
            other => other.clone(),
        };

        match field.location {
            FieldLocation::Path => {
                payload.path_params.insert(field.name.clone(), converted);
            }
            FieldLocation::Query => {
                payload.query_parameters.insert(field.name.clone(), converted);
            }
            FieldLocation::Body => set_nested_value(&mut payload.request_body, &field.name, converted),
        }
    }

    debug!(
        path = payload.path_params.len(),
        query = payload.query_parameters.len(),
        body = payload.request_body.len(),
        "request built"
    );
    payload
}

fn convert_text(name: &str, kind: FieldKind, is_array: bool, raw: &str) -> JsonValue {
    if is_array {
        return match serde_json::from_str::<JsonValue>(raw) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(field = name, error = %e, "array value is not valid JSON, sending raw text");
                JsonValue::String(raw.to_string())
            }
        };
    }

    match kind {
        FieldKind::Number => match parse_number(raw) {
            Some(n) => JsonValue::Number(n),
            None => {
                warn!(field = name, "value is not a number, sending raw text");
                JsonValue::String(raw.to_string())
            }
        },
        FieldKind::Select if raw == "true" => JsonValue::Bool(true),
        FieldKind::Select if raw == "false" => JsonValue::Bool(false),
        _ => JsonValue::String(raw.to_string()),
    }
}

fn parse_number(raw: &str) -> Option<Number> {
    let trimmed = raw.trim();
    if let Ok(i) = trimmed.parse::<i64>() {
        return Some(Number::from(i));
    }
    trimmed.parse::<f64>().ok().and_then(Number::from_f64)
}

/// Insert `value` at a dotted path, creating (or replacing non-object) intermediates
pub fn set_nested_value(target: &mut Map<String, JsonValue>, path: &str, value: JsonValue) {
    let mut segments: Vec<&str> = path.split('.').collect();
    let Some(last) = segments.pop() else {
        return;
    };

    let mut current = target;
    for segment in segments {
        let slot = current
            .entry(segment.to_string())
            .or_insert_with(|| JsonValue::Object(Map::new()));
        if !slot.is_object() {
            *slot = JsonValue::Object(Map::new());
        }
        current = match slot {
            JsonValue::Object(map) => map,
            _ => return,
        };
    }
    current.insert(last.to_string(), value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use conduit_core::{FieldDescriptor, HttpMethod, SelectOption};
    use serde_json::json;

    fn values(v: JsonValue) -> FormValues {
        v.as_object().cloned().unwrap()
    }

    fn schema() -> ActionSchema {
        ActionSchema {
            method: HttpMethod::Post,
            path_fields: vec![FieldDescriptor::new("id", "Id", FieldKind::String, FieldLocation::Path)],
            query_fields: vec![FieldDescriptor::new("limit", "Limit", FieldKind::Number, FieldLocation::Query)],
            body_fields: vec![
                FieldDescriptor::new("user.email", "Email", FieldKind::String, FieldLocation::Body),
                FieldDescriptor::new("user.age", "Age", FieldKind::Number, FieldLocation::Body),
                FieldDescriptor::new("active", "Active", FieldKind::Select, FieldLocation::Body)
                    .with_options(vec![SelectOption::new("true", "Yes"), SelectOption::new("false", "No")]),
                FieldDescriptor::new("tags", "Tags", FieldKind::Textarea, FieldLocation::Body).as_array(),
                FieldDescriptor::new("note", "Note", FieldKind::Textarea, FieldLocation::Body),
            ],
        }
    }

    #[test]
    fn test_routing_and_conversion() {
        let payload = build_request(
            &schema(),
            &values(json!({
                "id": "42",
                "limit": "25",
                "user.email": "a@b.com",
                "user.age": "31.5",
                "active": "false",
                "tags": "[\"x\",\"y\"]",
                "note": "",
                "unknown": "ignored"
            })),
        );

        assert_eq!(JsonValue::Object(payload.path_params), json!({"id": "42"}));
        assert_eq!(JsonValue::Object(payload.query_parameters), json!({"limit": 25}));
        assert_eq!(
            JsonValue::Object(payload.request_body),
            json!({"user": {"email": "a@b.com", "age": 31.5}, "active": false, "tags": ["x", "y"]})
        );
    }

    #[test]
    fn test_bad_input_never_fails() {
        let payload = build_request(
            &schema(),
            &values(json!({"tags": "[x", "limit": "lots", "user.email": null})),
        );

        assert_eq!(payload.request_body["tags"], json!("[x"));
        assert_eq!(payload.query_parameters["limit"], json!("lots"));
        assert!(!payload.request_body.contains_key("user"));
    }

    #[test]
    fn test_non_string_values_pass_through() {
        let payload = build_request(&schema(), &values(json!({"user.age": 7, "active": true})));
        assert_eq!(JsonValue::Object(payload.request_body), json!({"user": {"age": 7}, "active": true}));
    }

    #[test]
    fn test_set_nested_value_replaces_scalars() {
        let mut body = values(json!({"user": "flat"}));
        set_nested_value(&mut body, "user.email", json!("a@b.com"));
        set_nested_value(&mut body, "user.address.city", json!("Paris"));
        set_nested_value(&mut body, "top", json!(1));

        assert_eq!(
            JsonValue::Object(body),
            json!({"user": {"email": "a@b.com", "address": {"city": "Paris"}}, "top": 1})
        );
    }
}
