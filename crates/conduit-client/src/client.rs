use crate::api::{ConnectorApi, ExecuteRequest, NewCredential};
use crate::config::{ApiConfig, API_VERSION_HEADER};
use crate::error::{ClientError, ClientResult};
use crate::history::{CallHistory, CallRecord};
use crate::response::{decode_items, parse_body, unwrap_envelope, unwrap_list};
use async_trait::async_trait;
use chrono::Utc;
use conduit_core::{sanitize_json_value, Connector, Credential, CredentialMetadata, Resource};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Method;
use serde_json::{json, Value as JsonValue};
use std::time::Instant;
use tracing::{debug, warn};
use url::Url;

/// HTTP client for the connector API. Every completed call lands in the shared [`CallHistory`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ApiConfig,
    base_url: Url,
    history: CallHistory,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> ClientResult<Self> {
        Self::with_history(config, CallHistory::new())
    }

    pub fn with_history(config: ApiConfig, history: CallHistory) -> ClientResult<Self> {
        let base_url = Url::parse(config.base_url.trim_end_matches('/'))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidConfig(format!("Invalid base URL: {}", config.base_url)));
        }
        let http = reqwest::Client::builder()
            .user_agent(concat!("conduit/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, config, base_url, history })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn history(&self) -> &CallHistory {
        &self.history
    }

    /// Base URL joined with percent-encoded path segments
    pub fn endpoint_url(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidConfig(format!("Invalid base URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Perform one call. Non-2xx responses become [`ClientError::Status`]; bodies that
    /// are empty or not JSON read as `Null`.
    pub async fn call(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&JsonValue>,
        include_user: bool,
    ) -> ClientResult<JsonValue> {
        let url = self.endpoint_url(segments)?;
        let timestamp = Utc::now();
        let started = Instant::now();

        let mut request = self
            .http
            .request(method.clone(), url.clone())
            .bearer_auth(&self.config.api_key)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .header(API_VERSION_HEADER, &self.config.api_version);
        if include_user && !self.config.user_id.is_empty() {
            request = request.header(self.config.user_header.as_str(), &self.config.user_id);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        debug!(method = %method, url = %url, include_user, "calling connector API");
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        let duration_ms = started.elapsed().as_millis() as u64;
        let parsed = parse_body(&text);
        let reason = status.canonical_reason().unwrap_or_default().to_string();

        let response_body = if status.is_success() {
            sanitize_json_value(&parsed)
        } else {
            JsonValue::String(format!("{} {}", status.as_u16(), reason))
        };
        self.history
            .record(CallRecord {
                method: method.to_string(),
                url: url.to_string(),
                status: status.as_u16(),
                timestamp,
                duration_ms,
                request_body: body.map(sanitize_json_value),
                response_body,
            })
            .await;

        if !status.is_success() {
            warn!(method = %method, url = %url, status = status.as_u16(), "connector API call failed");
            return Err(ClientError::Status { status: status.as_u16(), reason, body: parsed });
        }
        debug!(status = status.as_u16(), duration_ms, "connector API call completed");
        Ok(parsed)
    }
}

#[async_trait]
impl ConnectorApi for ApiClient {
    async fn list_connectors(&self) -> ClientResult<Vec<Connector>> {
        let body = self.call(Method::GET, &["connectors"], None, false).await?;
        Ok(decode_items(unwrap_list(&body, &["connectors", "data"]), "connector"))
    }

    async fn list_resources(&self, connector_id: &str) -> ClientResult<Vec<Resource>> {
        let body = self.call(Method::GET, &["connectors", connector_id, "resources"], None, false).await?;
        Ok(decode_items(unwrap_list(&body, &["resources", "data"]), "resource"))
    }

    async fn get_action(&self, connector_id: &str, action_id: &str) -> ClientResult<JsonValue> {
        let body = self
            .call(Method::GET, &["connectors", connector_id, "actions", action_id], None, false)
            .await?;
        Ok(unwrap_envelope(&body, &["action", "data"]).clone())
    }

    async fn list_credentials(&self, connector_id: &str) -> ClientResult<Vec<Credential>> {
        let body = self.call(Method::GET, &["connectors", connector_id, "credentials"], None, true).await?;
        Ok(unwrap_list(&body, &["credentials", "data"]).iter().filter_map(Credential::from_value).collect())
    }

    async fn credential_metadata(&self, connector_id: &str) -> ClientResult<Option<CredentialMetadata>> {
        let body = self
            .call(Method::GET, &["connectors", connector_id, "credentials", "metadata"], None, false)
            .await?;
        Ok(CredentialMetadata::from_response(&body))
    }

    async fn create_credential(&self, connector_id: &str, request: &NewCredential) -> ClientResult<JsonValue> {
        let mut body = json!({
            "userId": self.config.user_id,
            "authenticationType": request.authentication_type,
            "redirectUri": request.redirect_uri,
        });
        if let (Some(data), Some(map)) = (&request.data, body.as_object_mut()) {
            map.insert("data".to_string(), JsonValue::Object(data.clone()));
        }
        self.call(Method::POST, &["connectors", connector_id, "credentials"], Some(&body), false).await
    }

    async fn delete_credential(&self, connector_id: &str, credential_id: &str) -> ClientResult<()> {
        self.call(Method::DELETE, &["connectors", connector_id, "credentials", credential_id], None, true)
            .await?;
        Ok(())
    }

    async fn execute_action(
        &self,
        connector_id: &str,
        action_id: &str,
        request: &ExecuteRequest,
    ) -> ClientResult<JsonValue> {
        let body = serde_json::to_value(request)?;
        self.call(
            Method::POST,
            &["connectors", connector_id, "actions", action_id, "execute"],
            Some(&body),
            true,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url_encodes_segments() {
        let client = ApiClient::new(ApiConfig::new("k", "u").with_base_url("https://api.example.com/v1/")).unwrap();
        let url = client.endpoint_url(&["connectors", "my app", "credentials"]).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v1/connectors/my%20app/credentials");
    }

    #[test]
    fn test_rejects_bad_base_url() {
        assert!(matches!(
            ApiClient::new(ApiConfig::new("k", "u").with_base_url("not a url")),
            Err(ClientError::InvalidConfig(_))
        ));
        assert!(ApiClient::new(ApiConfig::new("k", "u").with_base_url("mailto:x@y.z")).is_err());
    }
}
