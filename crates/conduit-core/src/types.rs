use crate::field::FormValues;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value as JsonValue};

/// A third-party integration target exposed by the remote API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connector {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "string_or_seq")]
    pub category: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl Connector {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into(), category: Vec::new(), extra: Map::new() }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category.push(category.into());
        self
    }

    /// Name shown to the user, falling back to the id
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }

    /// Case-insensitive match against the name and every category
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&query)
            || self.category.iter().any(|c| c.to_lowercase().contains(&query))
    }

    /// Exact category match; `all` matches everything
    pub fn in_category(&self, category: &str) -> bool {
        category == "all" || self.category.iter().any(|c| c == category)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialStatus {
    Connected,
    NotConnected,
}

/// Connector annotated with the caller's credential state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorStatus {
    pub connector: Connector,
    pub credential_status: CredentialStatus,
    pub credential_count: usize,
    pub credentials: Vec<Credential>,
    pub auth_config_required: bool,
}

impl ConnectorStatus {
    pub fn from_credentials(
        connector: Connector,
        credentials: Vec<Credential>,
        auth_config_required: bool,
    ) -> Self {
        let credential_status = if credentials.is_empty() {
            CredentialStatus::NotConnected
        } else {
            CredentialStatus::Connected
        };
        Self {
            connector,
            credential_status,
            credential_count: credentials.len(),
            credentials,
            auth_config_required,
        }
    }

    pub fn not_connected(connector: Connector) -> Self {
        Self::from_credentials(connector, Vec::new(), false)
    }

    pub fn is_connected(&self) -> bool {
        self.credential_status == CredentialStatus::Connected
    }
}

/// Action entry as it appears in a resource listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionSummary {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl ActionSummary {
    pub fn label(&self) -> &str {
        match self.display_name.as_deref() {
            Some(display) if !display.is_empty() => display,
            _ if self.name.is_empty() => self.id.as_str(),
            _ => self.name.as_str(),
        }
    }

    /// The summary as a raw action definition, used when the full definition is unavailable
    pub fn to_definition(&self) -> JsonValue {
        serde_json::to_value(self).unwrap_or(JsonValue::Null)
    }
}

/// Connector-scoped group of actions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub actions: Vec<ActionSummary>,
}

impl Resource {
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    pub fn action(&self, action_id: &str) -> Option<&ActionSummary> {
        self.actions.iter().find(|a| a.id == action_id)
    }
}

/// Stored authorization artifact for one connector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub details: JsonValue,
}

impl Credential {
    /// Read a credential from a remote payload; `credentialId` wins over `id`
    pub fn from_value(value: &JsonValue) -> Option<Self> {
        let id = ["credentialId", "id"].iter().find_map(|key| match value.get(*key) {
            Some(JsonValue::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(JsonValue::Number(n)) => Some(n.to_string()),
            _ => None,
        })?;
        let name = value.get("name").and_then(|v| v.as_str()).map(|s| s.to_string());
        Some(Self { id, name, details: value.clone() })
    }
}

/// Auxiliary input a connector needs before a credential can be created (e.g. a subdomain)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuxiliaryField {
    pub name: String,
    pub label: String,
    pub field_type: String,
}

impl AuxiliaryField {
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        let name = name.into();
        let label = aux_label(&name);
        Self { name, label, field_type: field_type.into() }
    }
}

fn aux_label(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.map(|c| if c == '_' { ' ' } else { c })).collect(),
        None => String::new(),
    }
}

/// Connector-specific description of what credential creation requires
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CredentialMetadata {
    pub auth_config_required: bool,
    pub auxiliary_fields: Vec<AuxiliaryField>,
}

impl CredentialMetadata {
    /// Parse the metadata response: `metadata` key or the body itself, first element if a list
    pub fn from_response(body: &JsonValue) -> Option<Self> {
        let root = body.get("metadata").unwrap_or(body);
        let metadata = match root {
            JsonValue::Array(items) => items.first()?,
            JsonValue::Object(_) => root,
            _ => return None,
        };

        let auth_config_required =
            metadata.get("authConfigRequired").and_then(|v| v.as_bool()).unwrap_or(false);

        let data_schema = metadata.pointer("/inputSchema/properties/data");
        let auxiliary_fields = data_schema
            .and_then(|data| data.get("required"))
            .and_then(|r| r.as_array())
            .map(|names| {
                names
                    .iter()
                    .filter_map(|n| n.as_str())
                    .map(|name| {
                        let field_type = data_schema
                            .and_then(|d| d.get("properties"))
                            .and_then(|p| p.get(name))
                            .and_then(|p| p.get("type"))
                            .and_then(|t| t.as_str())
                            .unwrap_or("string");
                        AuxiliaryField::new(name, field_type)
                    })
                    .collect()
            })
            .unwrap_or_default();

        Some(Self { auth_config_required, auxiliary_fields })
    }
}

/// Why an execution attempt did not succeed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Validation,
    Cancelled,
    Authentication,
    Remote,
}

/// One entry of the recent-activity log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub connector_id: String,
    pub connector_name: String,
    pub action_id: String,
    pub action_name: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
    #[serde(default)]
    pub form_values: FormValues,
}

/// Named set of form values saved for reuse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedTemplate {
    pub id: String,
    pub name: String,
    pub connector_id: String,
    pub action_id: String,
    pub form_values: FormValues,
    pub created_at: DateTime<Utc>,
}

fn string_or_seq<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = JsonValue::deserialize(deserializer)?;
    Ok(match value {
        JsonValue::String(s) => vec![s],
        JsonValue::Array(items) => {
            items.into_iter().filter_map(|v| v.as_str().map(|s| s.to_string())).collect()
        }
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_connector_filters() {
        let connector: Connector = serde_json::from_value(json!({
            "id": "hubspot",
            "name": "HubSpot",
            "category": ["CRM", "Marketing"],
            "icon": "https://cdn.example.com/hubspot.png"
        }))
        .unwrap();

        assert!(connector.matches_query("hub"));
        assert!(connector.matches_query("market"));
        assert!(!connector.matches_query("erp"));
        assert!(connector.in_category("CRM"));
        assert!(connector.in_category("all"));
        assert!(!connector.in_category("crm"));
        assert_eq!(connector.extra["icon"], "https://cdn.example.com/hubspot.png");
    }

    #[test]
    fn test_connector_single_category_string() {
        let connector: Connector =
            serde_json::from_value(json!({"id": "shopify", "category": "Commerce"})).unwrap();
        assert_eq!(connector.category, vec!["Commerce".to_string()]);
        assert_eq!(connector.label(), "shopify");
    }

    #[test]
    fn test_credential_id_precedence() {
        let cred = Credential::from_value(&json!({"credentialId": "c-1", "id": "x", "name": "Work"}))
            .unwrap();
        assert_eq!(cred.id, "c-1");
        assert_eq!(cred.name.as_deref(), Some("Work"));

        let cred = Credential::from_value(&json!({"id": 17})).unwrap();
        assert_eq!(cred.id, "17");

        assert!(Credential::from_value(&json!({"name": "no id"})).is_none());
    }

    #[test]
    fn test_credential_metadata_parsing() {
        let body = json!({
            "metadata": [{
                "authConfigRequired": true,
                "inputSchema": {
                    "required": ["data"],
                    "properties": {
                        "data": {
                            "required": ["subdomain", "account_region"],
                            "properties": {
                                "subdomain": {"type": "string"}
                            }
                        }
                    }
                }
            }]
        });

        let metadata = CredentialMetadata::from_response(&body).unwrap();
        assert!(metadata.auth_config_required);
        assert_eq!(metadata.auxiliary_fields.len(), 2);
        assert_eq!(metadata.auxiliary_fields[0].label, "Subdomain");
        assert_eq!(metadata.auxiliary_fields[1].label, "Account region");
        assert_eq!(metadata.auxiliary_fields[1].field_type, "string");
    }

    #[test]
    fn test_credential_metadata_without_schema() {
        let metadata = CredentialMetadata::from_response(&json!({"authConfigRequired": false})).unwrap();
        assert!(metadata.auxiliary_fields.is_empty());
        assert!(CredentialMetadata::from_response(&json!({"metadata": []})).is_none());
        assert!(CredentialMetadata::from_response(&JsonValue::Null).is_none());
    }

    #[test]
    fn test_action_summary_roundtrip_to_definition() {
        let summary: ActionSummary = serde_json::from_value(json!({
            "id": "createContact",
            "name": "Create Contact",
            "httpMethod": "post",
            "path": "/contacts"
        }))
        .unwrap();

        let definition = summary.to_definition();
        assert_eq!(definition["id"], "createContact");
        assert_eq!(definition["httpMethod"], "post");
        assert_eq!(summary.label(), "Create Contact");
    }
}
