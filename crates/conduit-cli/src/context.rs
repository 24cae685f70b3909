//! Wiring shared by every command: configuration, stores, API client and session

use crate::cli::Cli;
use crate::error::{CliError, CliResult};
use crate::prompt::TerminalInteraction;
use conduit_auth::{AcquisitionConfig, CredentialResolver, ManualUrlOpener, SystemUrlOpener, UrlOpener};
use conduit_client::{ApiClient, ApiConfig, ConnectorApi, DEFAULT_USER_HEADER};
use conduit_runtime::Session;
use conduit_store::{KvStore, MemoryKvStore, SessionConfig, SessionConfigStore, SqliteKvStore};
use dialoguer::{theme::ColorfulTheme, Input, Password};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

pub const DATABASE_FILE: &str = "conduit.db";

pub async fn open_store(data_dir: &str) -> CliResult<Arc<dyn KvStore>> {
    let path = Path::new(data_dir).join(DATABASE_FILE);
    debug!(path = %path.display(), "opening local store");
    Ok(Arc::new(SqliteKvStore::open(path).await?))
}

/// Flags and environment win over values saved with `conduit config set`
pub async fn resolve_session(cli: &Cli, store: &Arc<dyn KvStore>) -> CliResult<SessionConfig> {
    let saved = SessionConfigStore::new(store.clone()).load().await?;
    let non_empty = |v: &Option<String>| v.clone().filter(|s| !s.trim().is_empty());
    Ok(SessionConfig {
        api_key: non_empty(&cli.api_key).or(saved.api_key),
        user_id: non_empty(&cli.user_id).or(saved.user_id),
    })
}

/// Ask for whatever is still missing; answers live only for this process
fn prompt_missing(config: &mut SessionConfig) -> CliResult<()> {
    let theme = ColorfulTheme::default();
    if config.api_key.as_deref().map_or(true, |k| k.trim().is_empty()) {
        config.api_key = Some(Password::with_theme(&theme).with_prompt("API key").interact()?);
    }
    if config.user_id.as_deref().map_or(true, |u| u.trim().is_empty()) {
        let user_id: String = Input::with_theme(&theme).with_prompt("User id").interact_text()?;
        config.user_id = Some(user_id);
    }
    Ok(())
}

pub struct AppContext {
    pub client: ApiClient,
    pub session: Session,
    /// Durable store under the data directory
    pub store: Arc<dyn KvStore>,
    /// Session-scoped API key and user id
    pub session_config: SessionConfigStore,
}

impl AppContext {
    /// With `interactive` set, a missing API key or user id is prompted for instead of failing
    pub async fn build(cli: &Cli, interactive: bool) -> CliResult<Self> {
        let store = open_store(&cli.data_dir).await?;

        let mut resolved = resolve_session(cli, &store).await?;
        if !resolved.is_complete() {
            if !interactive {
                return Err(CliError::MissingConfig(
                    "API key and user id are required (--api-key/--user-id, CONDUIT_API_KEY/CONDUIT_USER_ID or `conduit config set`)"
                        .to_string(),
                ));
            }
            prompt_missing(&mut resolved)?;
        }

        let session_config = SessionConfigStore::new(Arc::new(MemoryKvStore::new()));
        session_config.save(&resolved).await?;

        let config = ApiConfig {
            base_url: cli.base_url.clone(),
            api_key: resolved.api_key.unwrap_or_default(),
            user_id: resolved.user_id.unwrap_or_default(),
            api_version: cli.api_version.clone(),
            user_header: DEFAULT_USER_HEADER.to_string(),
        };
        debug!(config = ?config, "API configuration");
        let client = ApiClient::new(config)?;

        let api: Arc<dyn ConnectorApi> = Arc::new(client.clone());
        let opener: Arc<dyn UrlOpener> =
            if cli.no_browser { Arc::new(ManualUrlOpener) } else { Arc::new(SystemUrlOpener) };
        let resolver = CredentialResolver::new(api.clone(), Arc::new(TerminalInteraction::new()), opener)
            .with_config(AcquisitionConfig { redirect_uri: cli.redirect_uri.clone(), ..Default::default() });
        let session = Session::new(api, resolver, store.clone());

        Ok(Self { client, session, store, session_config })
    }
}
