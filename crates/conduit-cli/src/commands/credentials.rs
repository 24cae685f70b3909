//! Credential management: list, connect, reconnect, disconnect, test

use crate::{
    cli::{CredentialsCommand, OutputFormat},
    context::AppContext,
    error::{CliError, CliResult},
    utils::ColoredOutput,
};
use conduit_core::mask_secret;
use dialoguer::{theme::ColorfulTheme, Confirm};
use serde_json::json;

pub async fn run(ctx: &mut AppContext, command: CredentialsCommand) -> CliResult<()> {
    match command {
        CredentialsCommand::List { connector, format } => list(ctx, &connector, format).await,
        CredentialsCommand::Connect { connector } => {
            match ctx.session.connect(&connector).await? {
                Some(credential) => {
                    println!("{} {} ({})", ColoredOutput::success("✓ Connected"), connector, credential.id)
                }
                None => println!("{}", ColoredOutput::dim("Connection cancelled")),
            }
            Ok(())
        }
        CredentialsCommand::Reconnect { connector } => {
            let credential = ctx.session.reconnect(&connector).await?;
            println!("{} {} ({})", ColoredOutput::success("✓ Reconnected"), connector, credential.id);
            Ok(())
        }
        CredentialsCommand::Disconnect { connector, credential, yes } => {
            disconnect(ctx, &connector, credential, yes).await
        }
        CredentialsCommand::Test { connector } => {
            let count = ctx.session.test_connection(&connector).await?;
            println!(
                "{} {} is connected and working properly ({} resource(s))",
                ColoredOutput::success("✓ Connection Successful!"),
                connector,
                count
            );
            Ok(())
        }
    }
}

async fn list(ctx: &AppContext, connector_id: &str, format: OutputFormat) -> CliResult<()> {
    let credentials = ctx.session.api().list_credentials(connector_id).await?;
    match format {
        OutputFormat::Table => {
            if credentials.is_empty() {
                println!("{}", ColoredOutput::info("Not connected"));
                return Ok(());
            }
            for credential in &credentials {
                let name = credential.name.as_deref().unwrap_or("-");
                println!("{:<40} {}", credential.id, name);
            }
        }
        _ => println!("{}", format.format_json(&json!({ "credentials": credentials }))?),
    }
    Ok(())
}

async fn disconnect(
    ctx: &mut AppContext,
    connector_id: &str,
    credential_id: Option<String>,
    yes: bool,
) -> CliResult<()> {
    let credential_id = match credential_id {
        Some(id) => id,
        None => ctx
            .session
            .api()
            .list_credentials(connector_id)
            .await?
            .into_iter()
            .next()
            .map(|c| c.id)
            .ok_or_else(|| CliError::InvalidArgument(format!("{} has no credentials", connector_id)))?,
    };

    if !yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!(
                "Disconnect {} (credential {})? This cannot be undone.",
                connector_id,
                mask_secret(&credential_id)
            ))
            .default(false)
            .interact()?;
        if !confirmed {
            return Ok(());
        }
    }

    ctx.session.disconnect(connector_id, &credential_id).await?;
    println!("{} {}", ColoredOutput::success("✓ Disconnected"), connector_id);
    Ok(())
}
