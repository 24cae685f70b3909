//! Ordered probing of the places an action definition may keep its body schema

use serde_json::{Map, Value as JsonValue};

pub type SchemaExtractor = fn(&JsonValue) -> Option<&JsonValue>;

/// Candidate locations in precedence order; the first one with a non-empty `properties` map wins
pub const SCHEMA_LOCATIONS: &[(&str, SchemaExtractor)] = &[
    ("requestBody", request_body_inline),
    ("requestBody.content[application/json].schema", request_body_content),
    ("requestBody.schema", request_body_schema),
    ("inputSchema", input_schema),
    ("schema", bare_schema),
    ("parameters[].schema", body_parameter),
];

/// Body schema picked out of an action definition
#[derive(Debug, Clone, Copy)]
pub struct LocatedSchema<'a> {
    pub location: &'static str,
    pub schema: &'a JsonValue,
    pub properties: &'a Map<String, JsonValue>,
}

impl<'a> LocatedSchema<'a> {
    /// Top-level `required` list of the chosen schema
    pub fn required(&self) -> Vec<String> {
        required_list(self.schema)
    }
}

pub fn locate_body_schema(action: &JsonValue) -> Option<LocatedSchema<'_>> {
    SCHEMA_LOCATIONS.iter().find_map(|(location, extract)| {
        let schema = extract(action)?;
        let properties = schema.get("properties")?.as_object()?;
        if properties.is_empty() {
            return None;
        }
        Some(LocatedSchema { location: *location, schema, properties })
    })
}

pub(crate) fn required_list(schema: &JsonValue) -> Vec<String> {
    schema
        .get("required")
        .and_then(|r| r.as_array())
        .map(|items| items.iter().filter_map(|v| v.as_str().map(|s| s.to_string())).collect())
        .unwrap_or_default()
}

fn request_body_inline(action: &JsonValue) -> Option<&JsonValue> {
    action.get("requestBody")
}

fn request_body_content(action: &JsonValue) -> Option<&JsonValue> {
    action.get("requestBody")?.get("content")?.get("application/json")?.get("schema")
}

fn request_body_schema(action: &JsonValue) -> Option<&JsonValue> {
    action.get("requestBody")?.get("schema")
}

fn input_schema(action: &JsonValue) -> Option<&JsonValue> {
    action.get("inputSchema")
}

fn bare_schema(action: &JsonValue) -> Option<&JsonValue> {
    action.get("schema")
}

/// An `in: body` entry first, then any other schema-bearing entry that is not a query or path parameter
fn body_parameter(action: &JsonValue) -> Option<&JsonValue> {
    let params = action.get("parameters")?.as_array()?;

    params
        .iter()
        .find(|p| param_location(p) == Some("body"))
        .or_else(|| {
            params
                .iter()
                .find(|p| p.get("schema").is_some() && !matches!(param_location(p), Some("query" | "path")))
        })?
        .get("schema")
}

fn param_location(param: &JsonValue) -> Option<&str> {
    param.get("in").and_then(|v| v.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(name: &str) -> JsonValue {
        json!({"type": "object", "properties": {name: {"type": "string"}}, "required": [name]})
    }

    #[test]
    fn test_each_location_is_found() {
        let cases = vec![
            (json!({"requestBody": props("a")}), "requestBody"),
            (
                json!({"requestBody": {"content": {"application/json": {"schema": props("a")}}}}),
                "requestBody.content[application/json].schema",
            ),
            (json!({"requestBody": {"schema": props("a")}}), "requestBody.schema"),
            (json!({"inputSchema": props("a")}), "inputSchema"),
            (json!({"schema": props("a")}), "schema"),
            (json!({"parameters": [{"in": "query", "name": "q"}, {"in": "body", "schema": props("a")}]}), "parameters[].schema"),
            (
                json!({"parameters": [
                    {"in": "query", "name": "dryRun", "schema": {"type": "boolean"}},
                    {"in": "body", "schema": props("a")}
                ]}),
                "parameters[].schema",
            ),
            (
                json!({"parameters": [
                    {"in": "path", "name": "id", "schema": {"type": "string"}},
                    {"name": "payload", "schema": props("a")}
                ]}),
                "parameters[].schema",
            ),
        ];

        for (action, expected) in cases {
            let located = locate_body_schema(&action).expect("schema should be located");
            assert_eq!(located.location, expected);
            assert_eq!(located.required(), vec!["a".to_string()]);
        }
    }

    #[test]
    fn test_precedence_and_empty_properties() {
        let action = json!({
            "inputSchema": {"properties": {}},
            "schema": props("from_schema"),
            "parameters": [{"in": "body", "schema": props("from_params")}]
        });

        let located = locate_body_schema(&action).unwrap();
        assert_eq!(located.location, "schema");
        assert!(located.properties.contains_key("from_schema"));
    }

    #[test]
    fn test_nothing_located() {
        assert!(locate_body_schema(&json!({"path": "/x"})).is_none());
        assert!(locate_body_schema(&json!({"parameters": "nope"})).is_none());
    }
}
