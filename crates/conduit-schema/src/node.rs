//! Tagged tree built from JSON-Schema properties before flattening into form fields

use crate::extract::required_list;
use crate::humanize::humanize_field_name;
use conduit_core::{FieldDescriptor, FieldKind, FieldLocation, SelectOption};
use serde_json::{Map, Value as JsonValue};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeMeta {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    Scalar { meta: NodeMeta, kind: FieldKind, options: Option<Vec<SelectOption>> },
    /// Arrays are entered as raw JSON; item schemas are not visited
    Array { meta: NodeMeta },
    Object { children: Vec<(String, SchemaNode)>, required: Vec<String> },
}

impl SchemaNode {
    /// Root node for a located schema, treated as an object whatever its declared type
    pub fn root(properties: &Map<String, JsonValue>, required: Vec<String>) -> Self {
        SchemaNode::Object { children: children_of(properties), required }
    }

    pub fn from_value(prop: &JsonValue) -> Self {
        let meta = NodeMeta {
            title: str_field(prop, "title"),
            description: str_field(prop, "description"),
        };
        let ty = prop.get("type").and_then(|t| t.as_str());

        match (ty, prop.get("properties").and_then(|p| p.as_object())) {
            (Some("object"), Some(properties)) => {
                return SchemaNode::Object {
                    children: children_of(properties),
                    required: required_list(prop),
                }
            }
            (Some("array"), _) => return SchemaNode::Array { meta },
            _ => {}
        }

        let format = prop.get("format").and_then(|f| f.as_str());
        let mut kind = match (ty, format) {
            (_, Some("date")) | (_, Some("date-time")) => FieldKind::Date,
            (Some("integer"), _) | (Some("number"), _) => FieldKind::Number,
            (Some("boolean"), _) => FieldKind::Select,
            _ => FieldKind::String,
        };

        let mut options = prop.get("enum").and_then(|e| e.as_array()).map(|values| {
            values
                .iter()
                .map(|v| {
                    let value = match v {
                        JsonValue::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    let label = humanize_field_name(&value);
                    SelectOption::new(value, label)
                })
                .collect::<Vec<_>>()
        });
        if options.is_some() {
            kind = FieldKind::Select;
        }

        if ty == Some("boolean") {
            kind = FieldKind::Select;
            options = Some(vec![SelectOption::new("true", "Yes"), SelectOption::new("false", "No")]);
        }

        SchemaNode::Scalar { meta, kind, options }
    }

    /// Flatten an object node into body fields with dotted names
    pub fn flatten(&self) -> Vec<FieldDescriptor> {
        let mut fields = Vec::new();
        self.flatten_into("", &mut fields);
        fields
    }

    fn flatten_into(&self, prefix: &str, out: &mut Vec<FieldDescriptor>) {
        let SchemaNode::Object { children, required } = self else {
            return;
        };

        for (key, child) in children {
            let path = if prefix.is_empty() { key.clone() } else { format!("{}.{}", prefix, key) };
            match child {
                SchemaNode::Object { .. } => child.flatten_into(&path, out),
                _ => {
                    let is_required = required.iter().any(|r| r == key);
                    if let Some(field) = child.to_field(path, key, is_required, FieldLocation::Body) {
                        out.push(field);
                    }
                }
            }
        }
    }

    /// Field for a leaf node; `None` for objects, which only contribute their children
    pub fn to_field(
        &self,
        name: String,
        key: &str,
        required: bool,
        location: FieldLocation,
    ) -> Option<FieldDescriptor> {
        match self {
            SchemaNode::Object { .. } => None,
            SchemaNode::Array { meta } => {
                let display = display_name(meta, key);
                let description = meta
                    .description
                    .clone()
                    .unwrap_or_else(|| format!("Enter {} as JSON array", display));
                Some(
                    FieldDescriptor::new(name, display, FieldKind::Textarea, location)
                        .as_array()
                        .required(required)
                        .with_description(description),
                )
            }
            SchemaNode::Scalar { meta, kind, options } => {
                let display = display_name(meta, key);
                let description =
                    meta.description.clone().unwrap_or_else(|| format!("Enter {}", display));
                let field = FieldDescriptor::new(name, display, *kind, location)
                    .required(required)
                    .with_description(description);
                Some(match options {
                    Some(options) => field.with_options(options.clone()),
                    None => field,
                })
            }
        }
    }
}

fn children_of(properties: &Map<String, JsonValue>) -> Vec<(String, SchemaNode)> {
    properties.iter().map(|(key, prop)| (key.clone(), SchemaNode::from_value(prop))).collect()
}

fn display_name(meta: &NodeMeta, key: &str) -> String {
    meta.title.clone().filter(|t| !t.is_empty()).unwrap_or_else(|| humanize_field_name(key))
}

fn str_field(value: &JsonValue, key: &str) -> Option<String> {
    value.get(key).and_then(|v| v.as_str()).map(|s| s.to_string())
}
