use crate::error::{AuthError, AuthResult};
use crate::flow::{AcquisitionConfig, AcquisitionFlow, AcquisitionOutcome};
use crate::interaction::{AuthInteraction, UrlOpener};
use conduit_client::ConnectorApi;
use conduit_core::{Connector, Credential};
use std::sync::Arc;
use tracing::{debug, info};

/// Finds a usable credential for a connector, running the acquisition flow when there is none
#[derive(Clone)]
pub struct CredentialResolver {
    api: Arc<dyn ConnectorApi>,
    interaction: Arc<dyn AuthInteraction>,
    opener: Arc<dyn UrlOpener>,
    config: AcquisitionConfig,
}

impl CredentialResolver {
    pub fn new(
        api: Arc<dyn ConnectorApi>,
        interaction: Arc<dyn AuthInteraction>,
        opener: Arc<dyn UrlOpener>,
    ) -> Self {
        Self { api, interaction, opener, config: AcquisitionConfig::default() }
    }

    pub fn with_config(mut self, config: AcquisitionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &AcquisitionConfig {
        &self.config
    }

    /// First listed credential, or one acquired interactively. Listing errors other than
    /// 401/403/404 are returned as-is; acquisition runs at most once per call.
    pub async fn ensure_credential(&self, connector: &Connector) -> AuthResult<Credential> {
        match self.api.list_credentials(&connector.id).await {
            Ok(credentials) => {
                if let Some(credential) = credentials.into_iter().next() {
                    debug!(connector = %connector.id, credential = %credential.id, "using existing credential");
                    return Ok(credential);
                }
                info!(connector = %connector.id, "no credential on file");
            }
            Err(e) if e.is_auth_class() => {
                info!(connector = %connector.id, error = %e, "credential missing or expired");
            }
            Err(e) => return Err(AuthError::Remote(e)),
        }

        self.acquire(connector).await.into_result()
    }

    /// Run the acquisition flow unconditionally (connect / reconnect)
    pub async fn acquire(&self, connector: &Connector) -> AcquisitionOutcome {
        AcquisitionFlow {
            api: self.api.as_ref(),
            interaction: self.interaction.as_ref(),
            opener: self.opener.as_ref(),
            config: &self.config,
            connector,
        }
        .run()
        .await
    }
}
