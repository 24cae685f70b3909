//! Headless implementations of the interaction capabilities, driven by a prepared script

use crate::error::AuthResult;
use crate::interaction::{AuthInteraction, Confirmation, UrlOpener};
use async_trait::async_trait;
use conduit_client::MemoryConnectorApi;
use conduit_core::{AuxiliaryField, Connector, Credential};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
pub enum ConfirmStep {
    Confirm,
    /// Confirm after the credential has appeared on the remote side
    ConfirmGranting(Credential),
    Cancel,
}

#[derive(Debug, Default)]
struct Script {
    inputs: VecDeque<Option<HashMap<String, String>>>,
    confirmations: VecDeque<ConfirmStep>,
    log: Vec<String>,
}

/// Replays scripted answers; once a script runs out it submits empty inputs and confirms
#[derive(Debug, Clone, Default)]
pub struct ScriptedInteraction {
    api: Option<MemoryConnectorApi>,
    script: Arc<Mutex<Script>>,
}

impl ScriptedInteraction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remote fake that `ConfirmGranting` steps add credentials to
    pub fn with_api(mut self, api: MemoryConnectorApi) -> Self {
        self.api = Some(api);
        self
    }

    pub async fn push_inputs(&self, values: &[(&str, &str)]) {
        let values = values.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        self.script.lock().await.inputs.push_back(Some(values));
    }

    pub async fn cancel_inputs(&self) {
        self.script.lock().await.inputs.push_back(None);
    }

    pub async fn push_confirmation(&self, step: ConfirmStep) {
        self.script.lock().await.confirmations.push_back(step);
    }

    /// Prompts shown so far: `inputs <connector> [fields]`, `confirm <url>`, `incomplete <connector>`
    pub async fn log(&self) -> Vec<String> {
        self.script.lock().await.log.clone()
    }
}

#[async_trait]
impl AuthInteraction for ScriptedInteraction {
    async fn collect_inputs(
        &self,
        connector: &Connector,
        fields: &[AuxiliaryField],
    ) -> AuthResult<Option<HashMap<String, String>>> {
        let mut script = self.script.lock().await;
        let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
        script.log.push(format!("inputs {} [{}]", connector.id, names.join(",")));
        Ok(script.inputs.pop_front().unwrap_or_else(|| Some(HashMap::new())))
    }

    async fn await_confirmation(&self, connector: &Connector, url: &str) -> AuthResult<Confirmation> {
        let step = {
            let mut script = self.script.lock().await;
            script.log.push(format!("confirm {}", url));
            script.confirmations.pop_front().unwrap_or(ConfirmStep::Confirm)
        };
        match step {
            ConfirmStep::Confirm => Ok(Confirmation::Authenticated),
            ConfirmStep::ConfirmGranting(credential) => {
                if let Some(api) = &self.api {
                    api.add_credential(&connector.id, credential).await;
                }
                Ok(Confirmation::Authenticated)
            }
            ConfirmStep::Cancel => Ok(Confirmation::Cancelled),
        }
    }

    async fn notify_incomplete(&self, connector: &Connector) {
        self.script.lock().await.log.push(format!("incomplete {}", connector.id));
    }
}

/// Remembers every URL it was asked to open
#[derive(Debug, Clone, Default)]
pub struct RecordingUrlOpener {
    opened: Arc<StdMutex<Vec<String>>>,
    fail: bool,
}

impl RecordingUrlOpener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self { fail: true, ..Self::default() }
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().map(|urls| urls.clone()).unwrap_or_default()
    }
}

impl UrlOpener for RecordingUrlOpener {
    fn open(&self, url: &str) -> Result<(), String> {
        if let Ok(mut urls) = self.opened.lock() {
            urls.push(url.to_string());
        }
        if self.fail {
            return Err("no display".to_string());
        }
        Ok(())
    }
}
