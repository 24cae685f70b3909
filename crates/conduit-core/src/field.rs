//! Normalized form-field model shared by the schema translator and the executor

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::fmt;
use std::str::FromStr;

/// Values collected from the user, keyed by field name (dotted for nested body fields)
pub type FormValues = Map<String, JsonValue>;

/// HTTP method of a connector action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }

    /// Whether an action with no recognizable schema should still offer generic body fields
    pub fn takes_generic_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            "PATCH" => Ok(HttpMethod::Patch),
            other => Err(CoreError::Invalid(format!("unsupported HTTP method: {}", other))),
        }
    }
}

/// Presentation and parsing hint for a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    String,
    Number,
    Date,
    Select,
    /// Multi-line text; also used for array fields that expect raw JSON
    Textarea,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::Date => "date",
            FieldKind::Select => "select",
            FieldKind::Textarea => "textarea",
        }
    }
}

/// Where a field's value ends up in the outgoing request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldLocation {
    Path,
    Query,
    Body,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self { value: value.into(), label: label.into() }
    }
}

/// One input of an action form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    /// Dotted path into the request body, or the bare parameter name
    pub name: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub kind: FieldKind,
    pub required: bool,
    pub location: FieldLocation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<SelectOption>>,
    #[serde(default)]
    pub is_array: bool,
}

impl FieldDescriptor {
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        kind: FieldKind,
        location: FieldLocation,
    ) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            description: None,
            kind,
            required: false,
            location,
            options: None,
            is_array: false,
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_options(mut self, options: Vec<SelectOption>) -> Self {
        self.kind = FieldKind::Select;
        self.options = Some(options);
        self
    }

    pub fn as_array(mut self) -> Self {
        self.kind = FieldKind::Textarea;
        self.is_array = true;
        self
    }

    /// Select fields that carry a fixed option list are left to the user when auto-filling
    pub fn has_fixed_options(&self) -> bool {
        self.kind == FieldKind::Select && self.options.is_some()
    }
}

/// Normalized description of an action's inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionSchema {
    pub method: HttpMethod,
    pub path_fields: Vec<FieldDescriptor>,
    pub query_fields: Vec<FieldDescriptor>,
    pub body_fields: Vec<FieldDescriptor>,
}

impl ActionSchema {
    pub fn empty(method: HttpMethod) -> Self {
        Self { method, path_fields: Vec::new(), query_fields: Vec::new(), body_fields: Vec::new() }
    }

    /// Path, then query, then body fields
    pub fn all_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.path_fields.iter().chain(self.query_fields.iter()).chain(self.body_fields.iter())
    }

    pub fn required_fields(&self) -> Vec<&FieldDescriptor> {
        self.all_fields().filter(|f| f.required).collect()
    }

    pub fn optional_fields(&self) -> Vec<&FieldDescriptor> {
        self.all_fields().filter(|f| !f.required).collect()
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.all_fields().find(|f| f.name == name)
    }

    pub fn field_count(&self) -> usize {
        self.path_fields.len() + self.query_fields.len() + self.body_fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.field_count() == 0
    }
}

/// Request sent to the execute endpoint, before the credential is attached
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestPayload {
    pub path_params: Map<String, JsonValue>,
    pub query_parameters: Map<String, JsonValue>,
    pub request_body: Map<String, JsonValue>,
}
