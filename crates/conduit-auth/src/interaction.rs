//! Capabilities the acquisition flow needs from whoever is driving it

use crate::error::AuthResult;
use async_trait::async_trait;
use conduit_core::{AuxiliaryField, Connector};
use std::collections::HashMap;
use tracing::debug;

/// Answer to the "have you finished authorizing?" prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Authenticated,
    Cancelled,
}

#[async_trait]
pub trait AuthInteraction: Send + Sync {
    /// Ask for the connector's auxiliary inputs. Called even when there are none so the
    /// user can back out; `None` cancels.
    async fn collect_inputs(
        &self,
        connector: &Connector,
        fields: &[AuxiliaryField],
    ) -> AuthResult<Option<HashMap<String, String>>>;

    /// Block until the user confirms the external authorization or cancels
    async fn await_confirmation(&self, connector: &Connector, url: &str) -> AuthResult<Confirmation>;

    /// Verification found no credential yet and another confirmation will be requested
    async fn notify_incomplete(&self, connector: &Connector);
}

pub trait UrlOpener: Send + Sync {
    fn open(&self, url: &str) -> Result<(), String>;
}

/// Opens URLs in the desktop's default browser
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemUrlOpener;

impl UrlOpener for SystemUrlOpener {
    fn open(&self, url: &str) -> Result<(), String> {
        debug!(url, "opening authorization URL");
        opener::open(url).map_err(|e| e.to_string())
    }
}

/// Never opens anything; the interaction is expected to show the URL
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualUrlOpener;

impl UrlOpener for ManualUrlOpener {
    fn open(&self, _url: &str) -> Result<(), String> {
        Err("browser launch disabled".to_string())
    }
}
