//! Interactive credential acquisition as an explicit state machine
//!
//! ```text
//! Idle -> AwaitingUserInput -> AwaitingExternalAuth -> Verifying -> Resolved
//!                 |                    |    ^              |
//!                 v                    v    +--------------+ (attempts left)
//!             Cancelled            Cancelled               -> Failed
//! ```

use crate::error::AuthError;
use crate::interaction::{AuthInteraction, Confirmation, UrlOpener};
use conduit_client::{authorization_url, ConnectorApi, NewCredential};
use conduit_core::{AuxiliaryField, Connector, Credential};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use tracing::{debug, info, warn};

pub const DEFAULT_REDIRECT_URI: &str = "https://embedded.runalloy.com/oauth/callback";
pub const DEFAULT_AUTHENTICATION_TYPE: &str = "oauth2";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcquisitionConfig {
    pub authentication_type: String,
    pub redirect_uri: String,
    /// How many times the credential list is re-checked after confirmation
    pub verify_attempts: u32,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            authentication_type: DEFAULT_AUTHENTICATION_TYPE.to_string(),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            verify_attempts: 1,
        }
    }
}

#[derive(Debug)]
pub enum AcquisitionState {
    Idle,
    AwaitingUserInput { fields: Vec<AuxiliaryField> },
    AwaitingExternalAuth { url: String, attempts_left: u32, opened: bool },
    Verifying { url: String, attempts_left: u32 },
    Resolved(Credential),
    Failed(AuthError),
    Cancelled,
}

impl AcquisitionState {
    pub fn name(&self) -> &'static str {
        match self {
            AcquisitionState::Idle => "idle",
            AcquisitionState::AwaitingUserInput { .. } => "awaiting_user_input",
            AcquisitionState::AwaitingExternalAuth { .. } => "awaiting_external_auth",
            AcquisitionState::Verifying { .. } => "verifying",
            AcquisitionState::Resolved(_) => "resolved",
            AcquisitionState::Failed(_) => "failed",
            AcquisitionState::Cancelled => "cancelled",
        }
    }

    /// Terminal states become an outcome; anything else is handed back
    fn into_outcome(self) -> Result<AcquisitionOutcome, AcquisitionState> {
        match self {
            AcquisitionState::Resolved(credential) => Ok(AcquisitionOutcome::Resolved(credential)),
            AcquisitionState::Failed(error) => Ok(AcquisitionOutcome::Failed(error)),
            AcquisitionState::Cancelled => Ok(AcquisitionOutcome::Cancelled),
            pending => Err(pending),
        }
    }
}

#[derive(Debug)]
pub enum AcquisitionOutcome {
    Resolved(Credential),
    Cancelled,
    Failed(AuthError),
}

impl AcquisitionOutcome {
    pub fn into_result(self) -> Result<Credential, AuthError> {
        match self {
            AcquisitionOutcome::Resolved(credential) => Ok(credential),
            AcquisitionOutcome::Cancelled => Err(AuthError::Cancelled),
            AcquisitionOutcome::Failed(error) => Err(error),
        }
    }
}

/// One run of the acquisition flow for one connector
pub struct AcquisitionFlow<'a> {
    pub api: &'a dyn ConnectorApi,
    pub interaction: &'a dyn AuthInteraction,
    pub opener: &'a dyn UrlOpener,
    pub config: &'a AcquisitionConfig,
    pub connector: &'a Connector,
}

impl<'a> AcquisitionFlow<'a> {
    pub async fn run(self) -> AcquisitionOutcome {
        info!(connector = %self.connector.id, "starting credential acquisition");
        let mut state = AcquisitionState::Idle;
        loop {
            let next = self.step(state).await;
            debug!(connector = %self.connector.id, state = next.name(), "acquisition transition");
            match next.into_outcome() {
                Ok(outcome) => return outcome,
                Err(pending) => state = pending,
            }
        }
    }

    async fn step(&self, state: AcquisitionState) -> AcquisitionState {
        match state {
            AcquisitionState::Idle => AcquisitionState::AwaitingUserInput { fields: self.auxiliary_fields().await },
            AcquisitionState::AwaitingUserInput { fields } => self.request_authorization(&fields).await,
            AcquisitionState::AwaitingExternalAuth { url, attempts_left, opened } => {
                if !opened {
                    if let Err(e) = self.opener.open(&url) {
                        warn!(connector = %self.connector.id, error = %e, "could not open authorization URL");
                    }
                }
                match self.interaction.await_confirmation(self.connector, &url).await {
                    Ok(Confirmation::Authenticated) => AcquisitionState::Verifying { url, attempts_left },
                    Ok(Confirmation::Cancelled) => AcquisitionState::Cancelled,
                    Err(e) => AcquisitionState::Failed(e),
                }
            }
            AcquisitionState::Verifying { url, attempts_left } => {
                match self.api.list_credentials(&self.connector.id).await {
                    Ok(credentials) => match credentials.into_iter().next() {
                        Some(credential) => {
                            info!(connector = %self.connector.id, credential = %credential.id, "credential acquired");
                            AcquisitionState::Resolved(credential)
                        }
                        None if attempts_left > 1 => {
                            self.interaction.notify_incomplete(self.connector).await;
                            AcquisitionState::AwaitingExternalAuth { url, attempts_left: attempts_left - 1, opened: true }
                        }
                        None => AcquisitionState::Failed(AuthError::Incomplete),
                    },
                    Err(e) => AcquisitionState::Failed(AuthError::Remote(e)),
                }
            }
            terminal => terminal,
        }
    }

    /// Metadata problems are not fatal; the flow proceeds without auxiliary inputs
    async fn auxiliary_fields(&self) -> Vec<AuxiliaryField> {
        match self.api.credential_metadata(&self.connector.id).await {
            Ok(metadata) => metadata.map(|m| m.auxiliary_fields).unwrap_or_default(),
            Err(e) => {
                warn!(connector = %self.connector.id, error = %e, "could not fetch credential metadata");
                Vec::new()
            }
        }
    }

    async fn request_authorization(&self, fields: &[AuxiliaryField]) -> AcquisitionState {
        let values = match self.interaction.collect_inputs(self.connector, fields).await {
            Ok(Some(values)) => values,
            Ok(None) => return AcquisitionState::Cancelled,
            Err(e) => return AcquisitionState::Failed(e),
        };

        let data = if fields.is_empty() {
            None
        } else {
            let mut data = Map::new();
            for field in fields {
                let value = values.get(&field.name).map(|v| v.trim()).unwrap_or_default();
                if value.is_empty() {
                    return AcquisitionState::Failed(AuthError::MissingInput(field.label.clone()));
                }
                data.insert(field.name.clone(), JsonValue::String(value.to_string()));
            }
            Some(data)
        };

        let request = NewCredential {
            authentication_type: self.config.authentication_type.clone(),
            redirect_uri: self.config.redirect_uri.clone(),
            data,
        };
        let response = match self.api.create_credential(&self.connector.id, &request).await {
            Ok(response) => response,
            Err(e) => return AcquisitionState::Failed(AuthError::Remote(e)),
        };

        match authorization_url(&response) {
            Some(url) => AcquisitionState::AwaitingExternalAuth {
                url,
                attempts_left: self.config.verify_attempts.max(1),
                opened: false,
            },
            None => AcquisitionState::Failed(AuthError::NoAuthorizationUrl),
        }
    }
}
