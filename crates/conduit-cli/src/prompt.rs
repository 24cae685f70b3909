//! Terminal prompts for the credential acquisition flow

use crate::utils::ColoredOutput;
use async_trait::async_trait;
use conduit_auth::{AuthError, AuthInteraction, AuthResult, Confirmation};
use conduit_core::{AuxiliaryField, Connector};
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use std::collections::HashMap;

fn prompt_error(e: dialoguer::Error) -> AuthError {
    AuthError::Interaction(e.to_string())
}

/// Runs a dialoguer prompt on the blocking pool so it never stalls a runtime worker
async fn blocking_prompt<T, F>(prompt: F) -> AuthResult<T>
where
    T: Send + 'static,
    F: FnOnce(&ColorfulTheme) -> Result<T, dialoguer::Error> + Send + 'static,
{
    tokio::task::spawn_blocking(move || prompt(&ColorfulTheme::default()))
        .await
        .map_err(|e| AuthError::Interaction(e.to_string()))?
        .map_err(prompt_error)
}

/// Drives the acquisition flow with dialoguer prompts
#[derive(Default)]
pub struct TerminalInteraction;

impl TerminalInteraction {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuthInteraction for TerminalInteraction {
    async fn collect_inputs(
        &self,
        connector: &Connector,
        fields: &[AuxiliaryField],
    ) -> AuthResult<Option<HashMap<String, String>>> {
        println!();
        println!("{}", ColoredOutput::highlight(&format!("Connect {}", connector.label())));
        if !fields.is_empty() {
            println!("{}", ColoredOutput::dim("This connector needs a few details before authorizing."));
        }

        let proceed = blocking_prompt(|theme| {
            Confirm::with_theme(theme).with_prompt("Start authorization?").default(true).interact_opt()
        })
        .await?;
        if proceed != Some(true) {
            return Ok(None);
        }

        let mut values = HashMap::new();
        for field in fields {
            let label = field.label.clone();
            let value: String = blocking_prompt(move |theme| {
                Input::with_theme(theme).with_prompt(label).allow_empty(true).interact_text()
            })
            .await?;
            values.insert(field.name.clone(), value);
        }
        Ok(Some(values))
    }

    async fn await_confirmation(&self, connector: &Connector, url: &str) -> AuthResult<Confirmation> {
        println!();
        println!("Authorize {} in your browser:", connector.label());
        println!("  {}", ColoredOutput::info(url));

        let done = blocking_prompt(|theme| {
            Confirm::with_theme(theme).with_prompt("Have you completed authorization?").default(true).interact_opt()
        })
        .await?;
        Ok(match done {
            Some(true) => Confirmation::Authenticated,
            _ => Confirmation::Cancelled,
        })
    }

    async fn notify_incomplete(&self, connector: &Connector) {
        println!(
            "{} no credential for {} yet. Finish in the browser, then confirm again.",
            ColoredOutput::warning("Not complete:"),
            connector.label()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_blocking_prompt_returns_value_and_maps_errors() {
        let value = blocking_prompt(|_| Ok(42)).await.unwrap();
        assert_eq!(value, 42);

        let err = blocking_prompt::<(), _>(|_| Err(std::io::Error::other("terminal closed").into()))
            .await
            .unwrap_err();
        assert!(matches!(&err, AuthError::Interaction(msg) if msg.contains("terminal closed")));
    }
}
