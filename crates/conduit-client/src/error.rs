use serde_json::Value as JsonValue;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response; the message is `"<status> <reason>"`
    #[error("{status} {reason}")]
    Status { status: u16, reason: String, body: JsonValue },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    pub fn status(status: u16, reason: impl Into<String>) -> Self {
        ClientError::Status { status, reason: reason.into(), body: JsonValue::Null }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// 401/403/404 while listing credentials mean the credential is missing or expired
    pub fn is_auth_class(&self) -> bool {
        matches!(self.status_code(), Some(401 | 403 | 404))
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidConfig(format!("Invalid URL: {}", err))
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
