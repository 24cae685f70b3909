//! Error types for the CLI

use conduit_auth::AuthError;
use conduit_client::ClientError;
use conduit_runtime::ExecutionError;
use conduit_store::StoreError;
use thiserror::Error;

/// CLI-specific errors
#[derive(Debug, Error)]
pub enum CliError {
    #[error("API error: {0}")]
    Client(#[from] ClientError),

    #[error("{0}")]
    Auth(#[from] AuthError),

    #[error("{0}")]
    Execution(#[from] ExecutionError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    #[error("General error: {0}")]
    General(String),
}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        Self::General(format!("{:#}", err))
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
