use crate::error::ClientResult;
use async_trait::async_trait;
use conduit_core::{Connector, Credential, CredentialMetadata, RequestPayload, Resource};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Body of a credential creation request, minus the caller identity the client adds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCredential {
    pub authentication_type: String,
    pub redirect_uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, JsonValue>>,
}

/// Authorization URL from a credential creation response: `oauthUrl`, then `authUrl`, then `url`
pub fn authorization_url(response: &JsonValue) -> Option<String> {
    ["oauthUrl", "authUrl", "url"].iter().find_map(|key| {
        response.get(*key).and_then(|v| v.as_str()).filter(|url| !url.is_empty()).map(|url| url.to_string())
    })
}

/// Execute endpoint body: the built request plus the credential to run it with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteRequest {
    #[serde(flatten)]
    pub payload: RequestPayload,
    pub credential_id: String,
    #[serde(default)]
    pub additional_headers: Map<String, JsonValue>,
}

impl ExecuteRequest {
    pub fn new(payload: RequestPayload, credential_id: impl Into<String>) -> Self {
        Self { payload, credential_id: credential_id.into(), additional_headers: Map::new() }
    }
}

/// Operations of the remote connector API
#[async_trait]
pub trait ConnectorApi: Send + Sync {
    async fn list_connectors(&self) -> ClientResult<Vec<Connector>>;

    async fn list_resources(&self, connector_id: &str) -> ClientResult<Vec<Resource>>;

    /// Raw action definition, unwrapped from its envelope
    async fn get_action(&self, connector_id: &str, action_id: &str) -> ClientResult<JsonValue>;

    /// Credentials the current user holds for a connector (user-scoped)
    async fn list_credentials(&self, connector_id: &str) -> ClientResult<Vec<Credential>>;

    async fn credential_metadata(&self, connector_id: &str) -> ClientResult<Option<CredentialMetadata>>;

    /// Start credential creation; the response carries the authorization URL
    async fn create_credential(&self, connector_id: &str, request: &NewCredential) -> ClientResult<JsonValue>;

    async fn delete_credential(&self, connector_id: &str, credential_id: &str) -> ClientResult<()>;

    async fn execute_action(
        &self,
        connector_id: &str,
        action_id: &str,
        request: &ExecuteRequest,
    ) -> ClientResult<JsonValue>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_execute_request_wire_shape() {
        let mut payload = RequestPayload::default();
        payload.request_body.insert("name".into(), json!("Acme"));
        let request = ExecuteRequest::new(payload, "cred-9");

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "pathParams": {},
                "queryParameters": {},
                "requestBody": {"name": "Acme"},
                "credentialId": "cred-9",
                "additionalHeaders": {}
            })
        );
    }

    #[test]
    fn test_authorization_url_precedence() {
        assert_eq!(
            authorization_url(&json!({"authUrl": "b", "url": "c"})).as_deref(),
            Some("b")
        );
        assert_eq!(
            authorization_url(&json!({"oauthUrl": "", "authUrl": "b"})).as_deref(),
            Some("b")
        );
        assert_eq!(
            authorization_url(&json!({"oauthUrl": "a", "url": "c"})).as_deref(),
            Some("a")
        );
        assert!(authorization_url(&json!({"status": "ok"})).is_none());
        assert!(authorization_url(&JsonValue::Null).is_none());
    }
}
