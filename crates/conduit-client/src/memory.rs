use crate::api::{ConnectorApi, ExecuteRequest, NewCredential};
use crate::error::{ClientError, ClientResult};
use async_trait::async_trait;
use conduit_core::{Connector, Credential, CredentialMetadata, Resource};
use serde_json::{json, Value as JsonValue};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct MemoryState {
    connectors: Vec<Connector>,
    resources: HashMap<String, Vec<Resource>>,
    actions: HashMap<(String, String), JsonValue>,
    credentials: HashMap<String, Vec<Credential>>,
    metadata: HashMap<String, CredentialMetadata>,
    credential_failures: HashMap<String, VecDeque<u16>>,
    authorization_url: Option<String>,
    granted_on_create: HashMap<String, Credential>,
    execute_failure: Option<u16>,
    execute_response: Option<JsonValue>,
    calls: Vec<String>,
    created: Vec<(String, NewCredential)>,
    executed: Vec<(String, String, ExecuteRequest)>,
}

/// In-memory implementation of ConnectorApi for testing
#[derive(Debug, Clone, Default)]
pub struct MemoryConnectorApi {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryConnectorApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_connector(&self, connector: Connector) {
        self.state.write().await.connectors.push(connector);
    }

    pub async fn set_resources(&self, connector_id: &str, resources: Vec<Resource>) {
        self.state.write().await.resources.insert(connector_id.to_string(), resources);
    }

    pub async fn set_action(&self, connector_id: &str, action_id: &str, definition: JsonValue) {
        self.state
            .write()
            .await
            .actions
            .insert((connector_id.to_string(), action_id.to_string()), definition);
    }

    pub async fn add_credential(&self, connector_id: &str, credential: Credential) {
        self.state.write().await.credentials.entry(connector_id.to_string()).or_default().push(credential);
    }

    pub async fn set_metadata(&self, connector_id: &str, metadata: CredentialMetadata) {
        self.state.write().await.metadata.insert(connector_id.to_string(), metadata);
    }

    /// The next credential listing for this connector fails with `status`
    pub async fn fail_next_credential_listing(&self, connector_id: &str, status: u16) {
        self.state
            .write()
            .await
            .credential_failures
            .entry(connector_id.to_string())
            .or_default()
            .push_back(status);
    }

    /// URL returned by credential creation; without one the response carries no URL
    pub async fn set_authorization_url(&self, url: &str) {
        self.state.write().await.authorization_url = Some(url.to_string());
    }

    /// Credential that becomes listable once creation has been requested
    pub async fn grant_on_create(&self, connector_id: &str, credential: Credential) {
        self.state.write().await.granted_on_create.insert(connector_id.to_string(), credential);
    }

    pub async fn set_execute_response(&self, response: JsonValue) {
        self.state.write().await.execute_response = Some(response);
    }

    pub async fn fail_execution(&self, status: u16) {
        self.state.write().await.execute_failure = Some(status);
    }

    /// Operations performed so far, as `"<operation> <connector>"`
    pub async fn calls(&self) -> Vec<String> {
        self.state.read().await.calls.clone()
    }

    pub async fn call_count(&self, operation: &str) -> usize {
        let prefix = format!("{} ", operation);
        self.state.read().await.calls.iter().filter(|c| c.starts_with(&prefix)).count()
    }

    pub async fn created(&self) -> Vec<(String, NewCredential)> {
        self.state.read().await.created.clone()
    }

    pub async fn executed(&self) -> Vec<(String, String, ExecuteRequest)> {
        self.state.read().await.executed.clone()
    }

    pub async fn credentials(&self, connector_id: &str) -> Vec<Credential> {
        self.state.read().await.credentials.get(connector_id).cloned().unwrap_or_default()
    }

    async fn log(&self, operation: &str, connector_id: &str) {
        self.state.write().await.calls.push(format!("{} {}", operation, connector_id));
    }
}

fn reason_for(status: u16) -> &'static str {
    match status {
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Error",
    }
}

#[async_trait]
impl ConnectorApi for MemoryConnectorApi {
    async fn list_connectors(&self) -> ClientResult<Vec<Connector>> {
        self.log("list_connectors", "*").await;
        Ok(self.state.read().await.connectors.clone())
    }

    async fn list_resources(&self, connector_id: &str) -> ClientResult<Vec<Resource>> {
        self.log("list_resources", connector_id).await;
        self.state
            .read()
            .await
            .resources
            .get(connector_id)
            .cloned()
            .ok_or_else(|| ClientError::status(404, reason_for(404)))
    }

    async fn get_action(&self, connector_id: &str, action_id: &str) -> ClientResult<JsonValue> {
        self.log("get_action", connector_id).await;
        self.state
            .read()
            .await
            .actions
            .get(&(connector_id.to_string(), action_id.to_string()))
            .cloned()
            .ok_or_else(|| ClientError::status(404, reason_for(404)))
    }

    async fn list_credentials(&self, connector_id: &str) -> ClientResult<Vec<Credential>> {
        self.log("list_credentials", connector_id).await;
        let mut state = self.state.write().await;
        if let Some(status) = state.credential_failures.get_mut(connector_id).and_then(|q| q.pop_front()) {
            return Err(ClientError::status(status, reason_for(status)));
        }
        Ok(state.credentials.get(connector_id).cloned().unwrap_or_default())
    }

    async fn credential_metadata(&self, connector_id: &str) -> ClientResult<Option<CredentialMetadata>> {
        self.log("credential_metadata", connector_id).await;
        Ok(self.state.read().await.metadata.get(connector_id).cloned())
    }

    async fn create_credential(&self, connector_id: &str, request: &NewCredential) -> ClientResult<JsonValue> {
        self.log("create_credential", connector_id).await;
        let mut state = self.state.write().await;
        state.created.push((connector_id.to_string(), request.clone()));
        if let Some(credential) = state.granted_on_create.remove(connector_id) {
            state.credentials.entry(connector_id.to_string()).or_default().push(credential);
        }
        Ok(match &state.authorization_url {
            Some(url) => json!({"oauthUrl": url}),
            None => json!({"status": "pending"}),
        })
    }

    async fn delete_credential(&self, connector_id: &str, credential_id: &str) -> ClientResult<()> {
        self.log("delete_credential", connector_id).await;
        let mut state = self.state.write().await;
        let credentials = state.credentials.entry(connector_id.to_string()).or_default();
        let before = credentials.len();
        credentials.retain(|c| c.id != credential_id);
        if credentials.len() == before {
            return Err(ClientError::status(404, reason_for(404)));
        }
        Ok(())
    }

    async fn execute_action(
        &self,
        connector_id: &str,
        action_id: &str,
        request: &ExecuteRequest,
    ) -> ClientResult<JsonValue> {
        self.log("execute_action", connector_id).await;
        let mut state = self.state.write().await;
        state.executed.push((connector_id.to_string(), action_id.to_string(), request.clone()));
        if let Some(status) = state.execute_failure {
            return Err(ClientError::status(status, reason_for(status)));
        }
        Ok(state.execute_response.clone().unwrap_or_else(|| json!({"ok": true})))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_failures_are_consumed_once() {
        let api = MemoryConnectorApi::new();
        api.fail_next_credential_listing("slack", 401).await;

        let err = api.list_credentials("slack").await.unwrap_err();
        assert!(err.is_auth_class());
        assert!(api.list_credentials("slack").await.unwrap().is_empty());
        assert_eq!(api.call_count("list_credentials").await, 2);
    }

    #[tokio::test]
    async fn test_grant_on_create() {
        let api = MemoryConnectorApi::new();
        api.grant_on_create("slack", Credential::from_value(&json!({"id": "c1"})).unwrap()).await;
        api.set_authorization_url("https://auth.example.com/start").await;

        let request = NewCredential {
            authentication_type: "oauth2".into(),
            redirect_uri: "https://example.com/cb".into(),
            data: None,
        };
        let response = api.create_credential("slack", &request).await.unwrap();
        assert_eq!(response["oauthUrl"], "https://auth.example.com/start");
        assert_eq!(api.credentials("slack").await.len(), 1);

        api.delete_credential("slack", "c1").await.unwrap();
        assert!(api.delete_credential("slack", "c1").await.is_err());
    }
}
