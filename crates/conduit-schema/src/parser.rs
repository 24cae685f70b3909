use crate::extract::locate_body_schema;
use crate::humanize::humanize_field_name;
use crate::node::SchemaNode;
use conduit_core::{ActionSchema, FieldDescriptor, FieldKind, FieldLocation, HttpMethod};
use serde_json::Value as JsonValue;
use tracing::debug;

/// Build the form description of an action definition. Never fails: unrecognized
/// shapes degrade to a generic schema.
pub fn parse_action_schema(action: &JsonValue) -> ActionSchema {
    let method = detect_http_method(action);
    let path_fields = extract_path_fields(action);
    let query_fields = extract_query_fields(action, &path_fields);

    let body_fields = match locate_body_schema(action) {
        Some(located) => {
            debug!(location = located.location, properties = located.properties.len(), "body schema located");
            let mut fields = SchemaNode::root(located.properties, located.required()).flatten();
            fields.retain(|field| {
                let taken = path_fields.iter().chain(query_fields.iter()).any(|f| f.name == field.name);
                if taken {
                    debug!(field = %field.name, "body property shadowed by path or query field");
                }
                !taken
            });
            fields
        }
        None => {
            debug!("no body schema in action definition");
            Vec::new()
        }
    };

    let schema = ActionSchema { method, path_fields, query_fields, body_fields };
    if schema.is_empty() {
        debug!(method = %method, "no fields found, using generic schema");
        return generic_schema(method);
    }
    schema
}

/// Explicit `httpMethod` / `method` first, then a guess from the action name
pub fn detect_http_method(action: &JsonValue) -> HttpMethod {
    for key in ["httpMethod", "method"] {
        if let Some(raw) = action.get(key).and_then(|v| v.as_str()) {
            match raw.parse::<HttpMethod>() {
                Ok(method) => return method,
                Err(e) => debug!(key, error = %e, "ignoring explicit method"),
            }
        }
    }

    let name = ["name", "id"]
        .iter()
        .filter_map(|key| action.get(*key).and_then(|v| v.as_str()))
        .find(|s| !s.is_empty())
        .unwrap_or_default()
        .to_lowercase();

    if name.contains("create") {
        HttpMethod::Post
    } else if name.contains("update") {
        HttpMethod::Put
    } else if name.contains("delete") {
        HttpMethod::Delete
    } else if name.contains("list") || name.contains("get") {
        HttpMethod::Get
    } else {
        HttpMethod::Post
    }
}

/// Fallback used when an action exposes no inputs at all
pub fn generic_schema(method: HttpMethod) -> ActionSchema {
    let mut schema = ActionSchema::empty(method);
    if method.takes_generic_body() {
        schema.body_fields = vec![
            FieldDescriptor::new("name", "Name", FieldKind::String, FieldLocation::Body)
                .required(true)
                .with_description("Enter a name"),
            FieldDescriptor::new("description", "Description", FieldKind::Textarea, FieldLocation::Body)
                .with_description("Enter a description"),
        ];
    }
    schema
}

fn extract_path_fields(action: &JsonValue) -> Vec<FieldDescriptor> {
    let Some(path) = action.get("path").and_then(|p| p.as_str()) else {
        return Vec::new();
    };

    let mut fields: Vec<FieldDescriptor> = Vec::new();
    let mut chars = path.chars();
    while let Some(ch) = chars.next() {
        if ch != '{' {
            continue;
        }
        let mut name = String::new();
        let mut closed = false;
        for c in chars.by_ref() {
            if c == '}' {
                closed = true;
                break;
            }
            name.push(c);
        }
        if !closed || name.is_empty() || fields.iter().any(|f| f.name == name) {
            continue;
        }
        let display = humanize_field_name(&name);
        let description = format!("Enter the {}", display);
        fields.push(
            FieldDescriptor::new(name, display, FieldKind::String, FieldLocation::Path)
                .required(true)
                .with_description(description),
        );
    }
    fields
}

fn extract_query_fields(action: &JsonValue, path_fields: &[FieldDescriptor]) -> Vec<FieldDescriptor> {
    let Some(params) = action.get("parameters").and_then(|p| p.as_array()) else {
        return Vec::new();
    };

    let mut fields: Vec<FieldDescriptor> = Vec::new();
    for param in params {
        if param.get("in").and_then(|v| v.as_str()) != Some("query") {
            continue;
        }
        let Some(name) = param.get("name").and_then(|v| v.as_str()).filter(|n| !n.is_empty()) else {
            continue;
        };
        if path_fields.iter().chain(fields.iter()).any(|f| f.name == name) {
            continue;
        }

        let node = SchemaNode::from_value(param.get("schema").unwrap_or(param));
        let required = param.get("required").and_then(|v| v.as_bool()).unwrap_or(false);
        if let Some(mut field) = node.to_field(name.to_string(), name, required, FieldLocation::Query) {
            if let Some(description) = param.get("description").and_then(|v| v.as_str()) {
                field.description = Some(description.to_string());
            }
            fields.push(field);
        }
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_path_and_method_from_name() {
        let schema = parse_action_schema(&json!({
            "name": "updatePost",
            "path": "/users/{id}/posts/{postId}"
        }));

        assert_eq!(schema.method, HttpMethod::Put);
        let path: Vec<_> =
            schema.path_fields.iter().map(|f| (f.name.as_str(), f.display_name.as_str(), f.required)).collect();
        assert_eq!(path, vec![("id", "Id", true), ("postId", "Post Id", true)]);
        assert!(schema.body_fields.is_empty());
    }

    #[test]
    fn test_duplicate_and_unclosed_placeholders() {
        let schema = parse_action_schema(&json!({
            "method": "get",
            "path": "/a/{id}/b/{id}/c/{broken"
        }));
        assert_eq!(schema.path_fields.len(), 1);
        assert_eq!(schema.path_fields[0].name, "id");
    }

    #[test]
    fn test_body_property_named_like_path_field_is_dropped() {
        let schema = parse_action_schema(&json!({
            "name": "updateUser",
            "path": "/users/{id}",
            "requestBody": {"properties": {"id": {"type": "string"}, "email": {"type": "string"}}}
        }));

        let names: Vec<_> = schema.all_fields().map(|f| (f.name.as_str(), f.location)).collect();
        assert_eq!(names, vec![("id", FieldLocation::Path), ("email", FieldLocation::Body)]);
    }

    #[test]
    fn test_body_parameter_after_query_parameter() {
        let schema = parse_action_schema(&json!({
            "method": "POST",
            "parameters": [
                {"in": "query", "name": "dryRun", "schema": {"type": "boolean"}},
                {"in": "body", "schema": {"required": ["email"], "properties": {"email": {}, "name": {}}}}
            ]
        }));

        let query: Vec<_> = schema.query_fields.iter().map(|f| f.name.as_str()).collect();
        let body: Vec<_> = schema.body_fields.iter().map(|f| (f.name.as_str(), f.required)).collect();
        assert_eq!(query, vec!["dryRun"]);
        assert_eq!(body, vec![("email", true), ("name", false)]);
    }

    #[test]
    fn test_generic_fallback() {
        let get = parse_action_schema(&json!({"name": "listThings"}));
        assert_eq!(get.method, HttpMethod::Get);
        assert_eq!(get.field_count(), 0);

        let post = parse_action_schema(&json!({"name": "sendThing"}));
        assert_eq!(post.method, HttpMethod::Post);
        let fields: Vec<_> = post.body_fields.iter().map(|f| (f.name.as_str(), f.required, f.kind)).collect();
        assert_eq!(
            fields,
            vec![("name", true, FieldKind::String), ("description", false, FieldKind::Textarea)]
        );
    }

    #[test]
    fn test_explicit_method_precedence() {
        assert_eq!(detect_http_method(&json!({"httpMethod": "patch", "method": "GET"})), HttpMethod::Patch);
        assert_eq!(detect_http_method(&json!({"method": "delete", "name": "createX"})), HttpMethod::Delete);
        assert_eq!(detect_http_method(&json!({"method": "TRACE", "name": "getX"})), HttpMethod::Get);
        assert_eq!(detect_http_method(&json!({"name": "", "id": "deleteRow"})), HttpMethod::Delete);
        assert_eq!(detect_http_method(&json!({})), HttpMethod::Post);
    }

    #[test]
    fn test_query_parameters_from_parameter_list() {
        let schema = parse_action_schema(&json!({
            "method": "GET",
            "path": "/items/{id}",
            "parameters": [
                {"in": "path", "name": "id"},
                {"in": "query", "name": "id"},
                {"in": "query", "name": "limit", "required": true, "schema": {"type": "integer"}},
                {"in": "query", "name": "archived", "type": "boolean", "description": "Include archived"}
            ]
        }));

        let query: Vec<_> = schema.query_fields.iter().map(|f| (f.name.as_str(), f.kind, f.required)).collect();
        assert_eq!(query, vec![("limit", FieldKind::Number, true), ("archived", FieldKind::Select, false)]);
        assert_eq!(schema.query_fields[1].description.as_deref(), Some("Include archived"));
        assert_eq!(schema.required_fields().len(), 2);
    }

    #[test]
    fn test_one_field_per_leaf_for_content_schema() {
        let schema = parse_action_schema(&json!({
            "id": "createContact",
            "requestBody": {
                "content": {
                    "application/json": {
                        "schema": {
                            "type": "object",
                            "required": ["email"],
                            "properties": {
                                "email": {"type": "string", "format": "email"},
                                "profile": {
                                    "type": "object",
                                    "properties": {
                                        "firstName": {"type": "string"},
                                        "birthday": {"type": "string", "format": "date"}
                                    }
                                },
                                "score": {"type": "number"}
                            }
                        }
                    }
                }
            }
        }));

        assert_eq!(schema.method, HttpMethod::Post);
        let names: Vec<_> = schema.body_fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["email", "profile.firstName", "profile.birthday", "score"]);
        assert_eq!(schema.body_fields[1].display_name, "First Name");
        assert_eq!(schema.body_fields[2].kind, FieldKind::Date);
        assert_eq!(schema.required_fields().len(), 1);
    }
}
