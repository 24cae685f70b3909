//! Saved API key and user id

use crate::{
    cli::{Cli, ConfigCommand},
    context::{open_store, resolve_session},
    error::{CliError, CliResult},
    utils::ColoredOutput,
};
use conduit_core::mask_secret;
use conduit_store::{SessionConfig, SessionConfigStore};

pub async fn run(cli: &Cli, command: &ConfigCommand) -> CliResult<()> {
    let store = open_store(&cli.data_dir).await?;
    let saved = SessionConfigStore::new(store.clone());

    match command {
        ConfigCommand::Set { api_key, user_id } => {
            if api_key.is_none() && user_id.is_none() {
                return Err(CliError::InvalidArgument("nothing to set; pass --api-key and/or --user-id".to_string()));
            }
            saved.save(&SessionConfig { api_key: api_key.clone(), user_id: user_id.clone() }).await?;
            println!("{}", ColoredOutput::success("Configuration saved"));
        }
        ConfigCommand::Show => {
            let effective = resolve_session(cli, &store).await?;
            let api_key = effective.api_key.as_deref().map(mask_secret).unwrap_or_else(|| "(not set)".to_string());
            let user_id = effective.user_id.as_deref().unwrap_or("(not set)");
            println!("{:<12} {}", "base url", cli.base_url);
            println!("{:<12} {}", "api version", cli.api_version);
            println!("{:<12} {}", "api key", api_key);
            println!("{:<12} {}", "user id", user_id);
            println!("{:<12} {}", "data dir", cli.data_dir);
        }
        ConfigCommand::Clear => {
            saved.clear().await?;
            println!("{}", ColoredOutput::success("Saved configuration cleared"));
        }
    }
    Ok(())
}
