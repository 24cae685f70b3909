use crate::error::{ExecutionError, RuntimeResult};
use chrono::{DateTime, Utc};
use conduit_auth::CredentialResolver;
use conduit_client::{ConnectorApi, ExecuteRequest};
use conduit_core::{ActionSchema, ActivityRecord, Connector, FailureKind, FormValues};
use conduit_schema::build_request;
use conduit_store::ActivityLog;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// The action being executed, as identified to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRef {
    pub id: String,
    pub name: String,
}

impl ActionRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into() }
    }
}

/// Result of action execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Whether execution was successful
    pub success: bool,
    /// Response body of the remote action
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<JsonValue>,
    /// Error message if execution failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
    pub metadata: ExecutionMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionMetadata {
    pub connector_id: String,
    pub action_id: String,
    /// Credential the request was sent with, once resolved
    pub credential_id: Option<String>,
    pub duration_ms: u64,
    pub timestamp: DateTime<Utc>,
    /// Id of the activity entry, absent when nothing was recorded
    pub activity_id: Option<String>,
}

impl ExecutionResult {
    pub fn is_cancelled(&self) -> bool {
        self.failure == Some(FailureKind::Cancelled)
    }
}

/// Display names of required fields without a usable value
pub fn missing_required_fields(schema: &ActionSchema, values: &FormValues) -> Vec<String> {
    schema
        .required_fields()
        .into_iter()
        .filter(|field| match values.get(&field.name) {
            None | Some(JsonValue::Null) => true,
            Some(JsonValue::String(s)) => s.is_empty(),
            Some(_) => false,
        })
        .map(|field| field.display_name.clone())
        .collect()
}

/// Runs one action: validation, credential, request, activity
#[derive(Clone)]
pub struct ActionExecutor {
    api: Arc<dyn ConnectorApi>,
    resolver: CredentialResolver,
    activity: ActivityLog,
}

impl ActionExecutor {
    pub fn new(api: Arc<dyn ConnectorApi>, resolver: CredentialResolver, activity: ActivityLog) -> Self {
        Self { api, resolver, activity }
    }

    pub fn activity(&self) -> &ActivityLog {
        &self.activity
    }

    /// Execute an action. Failures come back as an unsuccessful result; only attempts
    /// that pass local validation are recorded to the activity log.
    pub async fn execute(
        &self,
        connector: &Connector,
        action: &ActionRef,
        schema: &ActionSchema,
        values: &FormValues,
    ) -> ExecutionResult {
        let start_time = Instant::now();
        let timestamp = Utc::now();
        let mut metadata = ExecutionMetadata {
            connector_id: connector.id.clone(),
            action_id: action.id.clone(),
            credential_id: None,
            duration_ms: 0,
            timestamp,
            activity_id: None,
        };

        let missing = missing_required_fields(schema, values);
        if !missing.is_empty() {
            tracing::info!(action = %action.id, missing = ?missing, "Required fields missing");
            return Self::failed(ExecutionError::Validation { missing }, metadata);
        }

        tracing::info!(connector = %connector.id, action = %action.id, method = %schema.method, "Starting action execution");

        let outcome = self.attempt(connector, action, schema, values, &mut metadata).await;
        metadata.duration_ms = start_time.elapsed().as_millis() as u64;

        let result = match outcome {
            Ok(data) => {
                tracing::info!(action = %action.id, duration_ms = metadata.duration_ms, "Action execution completed successfully");
                ExecutionResult { success: true, data: Some(data), error: None, failure: None, metadata }
            }
            Err(e) => {
                if e.is_cancelled() {
                    tracing::info!(action = %action.id, "Action execution cancelled");
                } else {
                    tracing::error!(action = %action.id, duration_ms = metadata.duration_ms, error = %e, "Action execution failed");
                }
                Self::failed(e, metadata)
            }
        };

        self.record(connector, action, values, result).await
    }

    async fn attempt(
        &self,
        connector: &Connector,
        action: &ActionRef,
        schema: &ActionSchema,
        values: &FormValues,
        metadata: &mut ExecutionMetadata,
    ) -> RuntimeResult<JsonValue> {
        let credential = self.resolver.ensure_credential(connector).await?;
        metadata.credential_id = Some(credential.id.clone());

        let payload = build_request(schema, values);
        let request = ExecuteRequest::new(payload, credential.id);
        Ok(self.api.execute_action(&connector.id, &action.id, &request).await?)
    }

    fn failed(error: ExecutionError, metadata: ExecutionMetadata) -> ExecutionResult {
        ExecutionResult {
            success: false,
            data: None,
            error: Some(error.to_string()),
            failure: Some(error.failure_kind()),
            metadata,
        }
    }

    /// A failing activity log never changes the execution outcome
    async fn record(
        &self,
        connector: &Connector,
        action: &ActionRef,
        values: &FormValues,
        mut result: ExecutionResult,
    ) -> ExecutionResult {
        let record = ActivityRecord {
            id: Uuid::new_v4().to_string(),
            timestamp: result.metadata.timestamp,
            connector_id: connector.id.clone(),
            connector_name: connector.label().to_string(),
            action_id: action.id.clone(),
            action_name: action.name.clone(),
            success: result.success,
            failure: result.failure,
            form_values: values.clone(),
        };
        let id = record.id.clone();
        match self.activity.record(record).await {
            Ok(()) => result.metadata.activity_id = Some(id),
            Err(e) => tracing::warn!(error = %e, "could not record activity"),
        }
        result
    }
}
