//! One interactive session: connector selection, action forms and credential management

use crate::error::{ExecutionError, RuntimeResult};
use crate::execution::{ActionExecutor, ActionRef, ExecutionResult};
use chrono::NaiveDate;
use conduit_auth::{AcquisitionOutcome, CredentialResolver};
use conduit_client::{categories, connector_statuses, filter_connectors, ConnectorApi};
use conduit_core::{
    ActionSchema, ActionSummary, ActivityRecord, Connector, ConnectorStatus, Credential, FormValues, Resource,
    SavedTemplate,
};
use conduit_schema::{autofill, parse_action_schema};
use conduit_store::{ActivityLog, KvStore, TemplateStore};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::{info, warn};

/// The action currently shown as a form
#[derive(Debug, Clone)]
pub struct SelectedAction {
    pub summary: ActionSummary,
    /// Name of the resource the action was listed under
    pub resource: Option<String>,
    pub definition: JsonValue,
    pub schema: ActionSchema,
    /// Whether the full definition could not be fetched and the listing summary was used
    pub from_summary: bool,
}

impl SelectedAction {
    pub fn action_ref(&self) -> ActionRef {
        ActionRef::new(self.summary.id.clone(), self.summary.label().to_string())
    }
}

pub struct Session {
    api: Arc<dyn ConnectorApi>,
    resolver: CredentialResolver,
    executor: ActionExecutor,
    templates: TemplateStore,
    statuses: Vec<ConnectorStatus>,
    connector: Option<Connector>,
    resources: Vec<Resource>,
    action: Option<SelectedAction>,
    form_values: FormValues,
    last_result: Option<ExecutionResult>,
}

impl Session {
    /// Activity and templates are kept in `store`
    pub fn new(api: Arc<dyn ConnectorApi>, resolver: CredentialResolver, store: Arc<dyn KvStore>) -> Self {
        let activity = ActivityLog::new(store.clone());
        let executor = ActionExecutor::new(api.clone(), resolver.clone(), activity);
        Self {
            api,
            resolver,
            executor,
            templates: TemplateStore::new(store),
            statuses: Vec::new(),
            connector: None,
            resources: Vec::new(),
            action: None,
            form_values: FormValues::new(),
            last_result: None,
        }
    }

    pub fn api(&self) -> &Arc<dyn ConnectorApi> {
        &self.api
    }

    pub fn activity_log(&self) -> &ActivityLog {
        self.executor.activity()
    }

    pub fn templates(&self) -> &TemplateStore {
        &self.templates
    }

    // ---- connectors ----

    /// Fetch connectors and annotate each with its credential status
    pub async fn load_connectors(&mut self) -> RuntimeResult<&[ConnectorStatus]> {
        let connectors = self.api.list_connectors().await?;
        info!(count = connectors.len(), "connectors loaded");
        self.statuses = connector_statuses(self.api.as_ref(), connectors).await;
        Ok(&self.statuses)
    }

    pub fn connectors(&self) -> &[ConnectorStatus] {
        &self.statuses
    }

    pub fn filtered_connectors(&self, query: &str, category: &str) -> Vec<&ConnectorStatus> {
        filter_connectors(&self.statuses, query, category)
    }

    pub fn categories(&self) -> Vec<String> {
        categories(self.statuses.iter().map(|s| &s.connector))
    }

    pub fn connector_status(&self, connector_id: &str) -> Option<&ConnectorStatus> {
        self.statuses.iter().find(|s| s.connector.id == connector_id)
    }

    /// Connector by id, loading the listing first if needed
    pub async fn find_connector(&mut self, connector_id: &str) -> RuntimeResult<Connector> {
        if self.statuses.is_empty() {
            self.load_connectors().await?;
        }
        self.connector_status(connector_id)
            .map(|s| s.connector.clone())
            .ok_or_else(|| ExecutionError::not_found(format!("Connector not found: {}", connector_id)))
    }

    /// Select a connector and list its resources; a failed listing leaves no resources
    pub async fn select_connector(&mut self, connector: Connector) -> &[Resource] {
        self.resources = match self.api.list_resources(&connector.id).await {
            Ok(resources) => resources,
            Err(e) => {
                warn!(connector = %connector.id, error = %e, "failed to load resources");
                Vec::new()
            }
        };
        self.connector = Some(connector);
        self.action = None;
        self.form_values.clear();
        self.last_result = None;
        &self.resources
    }

    pub fn selected_connector(&self) -> Option<&Connector> {
        self.connector.as_ref()
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    // ---- actions ----

    /// Select an action of the current connector and build its form. When the full
    /// definition cannot be fetched the listing summary is parsed instead.
    pub async fn select_action(&mut self, action_id: &str) -> RuntimeResult<&SelectedAction> {
        let connector = self.connector.as_ref().ok_or_else(|| ExecutionError::not_found("No connector selected"))?;
        let (resource, summary) = self
            .resources
            .iter()
            .find_map(|r| r.action(action_id).map(|a| (r.name.clone(), a.clone())))
            .ok_or_else(|| ExecutionError::not_found(format!("Action not found: {}", action_id)))?;

        let (definition, from_summary) = match self.api.get_action(&connector.id, action_id).await {
            Ok(definition) if !definition.is_null() => (definition, false),
            Ok(_) => (summary.to_definition(), true),
            Err(e) => {
                warn!(connector = %connector.id, action = action_id, error = %e, "failed to load action definition");
                (summary.to_definition(), true)
            }
        };

        let schema = parse_action_schema(&definition);
        info!(action = action_id, method = %schema.method, fields = schema.field_count(), "action selected");

        self.form_values.clear();
        self.last_result = None;
        Ok(&*self.action.insert(SelectedAction {
            summary,
            resource: Some(resource),
            definition,
            schema,
            from_summary,
        }))
    }

    pub fn selected_action(&self) -> Option<&SelectedAction> {
        self.action.as_ref()
    }

    // ---- form ----

    pub fn form_values(&self) -> &FormValues {
        &self.form_values
    }

    pub fn set_value(&mut self, name: impl Into<String>, value: JsonValue) {
        self.form_values.insert(name.into(), value);
    }

    pub fn set_values(&mut self, values: FormValues) {
        self.form_values.extend(values);
    }

    /// Fill every field with a demo value; returns how many were filled
    pub fn autofill(&mut self, today: NaiveDate) -> RuntimeResult<usize> {
        let action = self.action.as_ref().ok_or_else(|| ExecutionError::not_found("No action selected"))?;
        let values = autofill(&action.schema, today);
        let count = values.len();
        self.form_values.extend(values);
        Ok(count)
    }

    pub async fn apply_template(&mut self, id_or_name: &str) -> RuntimeResult<SavedTemplate> {
        let template = self
            .templates
            .find(id_or_name)
            .await?
            .ok_or_else(|| ExecutionError::not_found(format!("Template not found: {}", id_or_name)))?;
        self.form_values.extend(template.form_values.clone());
        Ok(template)
    }

    pub async fn save_template(&self, name: &str) -> RuntimeResult<SavedTemplate> {
        let (connector, action) = self.selection()?;
        Ok(self.templates.save(name, &connector.id, &action.summary.id, self.form_values.clone()).await?)
    }

    // ---- execution ----

    pub async fn execute(&mut self) -> RuntimeResult<&ExecutionResult> {
        let (connector, action) = self.selection()?;
        let result = self
            .executor
            .execute(connector, &action.action_ref(), &action.schema, &self.form_values)
            .await;
        Ok(&*self.last_result.insert(result))
    }

    pub fn last_result(&self) -> Option<&ExecutionResult> {
        self.last_result.as_ref()
    }

    /// Re-select the recorded connector and action and restore the recorded values.
    /// Nothing is executed.
    pub async fn rerun(&mut self, activity_id: &str) -> RuntimeResult<ActivityRecord> {
        let record = self
            .activity_log()
            .find(activity_id)
            .await?
            .ok_or_else(|| ExecutionError::not_found(format!("Activity not found: {}", activity_id)))?;

        let connector = self.find_connector(&record.connector_id).await?;
        self.select_connector(connector).await;
        self.select_action(&record.action_id).await?;
        self.form_values = record.form_values.clone();
        Ok(record)
    }

    fn selection(&self) -> RuntimeResult<(&Connector, &SelectedAction)> {
        let connector = self.connector.as_ref().ok_or_else(|| ExecutionError::not_found("No connector selected"))?;
        let action = self.action.as_ref().ok_or_else(|| ExecutionError::not_found("No action selected"))?;
        Ok((connector, action))
    }

    // ---- credentials ----

    /// Run the acquisition flow for a connector. Cancellation is not an error and yields `None`.
    pub async fn connect(&mut self, connector_id: &str) -> RuntimeResult<Option<Credential>> {
        match self.acquire(connector_id).await? {
            AcquisitionOutcome::Resolved(credential) => Ok(Some(credential)),
            AcquisitionOutcome::Cancelled => {
                info!(connector = connector_id, "connect cancelled");
                Ok(None)
            }
            AcquisitionOutcome::Failed(e) => Err(e.into()),
        }
    }

    /// Like `connect`, but cancellation is reported as an error
    pub async fn reconnect(&mut self, connector_id: &str) -> RuntimeResult<Credential> {
        Ok(self.acquire(connector_id).await?.into_result()?)
    }

    async fn acquire(&mut self, connector_id: &str) -> RuntimeResult<AcquisitionOutcome> {
        let connector = self.find_connector(connector_id).await?;
        let outcome = self.resolver.acquire(&connector).await;
        if matches!(outcome, AcquisitionOutcome::Resolved(_)) {
            self.load_connectors().await?;
        }
        Ok(outcome)
    }

    pub async fn disconnect(&mut self, connector_id: &str, credential_id: &str) -> RuntimeResult<()> {
        self.api.delete_credential(connector_id, credential_id).await?;
        info!(connector = connector_id, credential = credential_id, "credential deleted");
        self.load_connectors().await?;
        Ok(())
    }

    /// Probe a connector by listing its resources; returns the resource count
    pub async fn test_connection(&self, connector_id: &str) -> RuntimeResult<usize> {
        Ok(self.api.list_resources(connector_id).await?.len())
    }
}
