use conduit_client::ClientError;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Authentication cancelled")]
    Cancelled,

    #[error("Authentication was not completed. Please try again.")]
    Incomplete,

    #[error("Please enter {0}")]
    MissingInput(String),

    #[error("No OAuth URL returned")]
    NoAuthorizationUrl,

    #[error("Interaction failed: {0}")]
    Interaction(String),

    #[error(transparent)]
    Remote(#[from] ClientError),
}

impl AuthError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, AuthError::Cancelled)
    }
}

pub type AuthResult<T> = Result<T, AuthError>;
