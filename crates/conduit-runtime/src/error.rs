use conduit_auth::AuthError;
use conduit_client::ClientError;
use conduit_core::FailureKind;
use conduit_store::StoreError;
use thiserror::Error;

pub type RuntimeResult<T> = Result<T, ExecutionError>;

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Please fill in: {}", missing.join(", "))]
    Validation { missing: Vec<String> },

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Remote(#[from] ClientError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("{0}")]
    NotFound(String),
}

impl ExecutionError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn failure_kind(&self) -> FailureKind {
        match self {
            ExecutionError::Validation { .. } => FailureKind::Validation,
            ExecutionError::Auth(AuthError::Cancelled) => FailureKind::Cancelled,
            ExecutionError::Auth(AuthError::Remote(_)) => FailureKind::Remote,
            ExecutionError::Auth(_) => FailureKind::Authentication,
            ExecutionError::Remote(_) | ExecutionError::Store(_) | ExecutionError::NotFound(_) => FailureKind::Remote,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.failure_kind() == FailureKind::Cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_kinds() {
        let missing = ExecutionError::Validation { missing: vec!["Channel".into(), "Text".into()] };
        assert_eq!(missing.to_string(), "Please fill in: Channel, Text");
        assert_eq!(missing.failure_kind(), FailureKind::Validation);

        let cancelled = ExecutionError::from(AuthError::Cancelled);
        assert!(cancelled.is_cancelled());
        assert_eq!(cancelled.to_string(), "Authentication cancelled");

        assert_eq!(ExecutionError::from(AuthError::Incomplete).failure_kind(), FailureKind::Authentication);
        let remote = ExecutionError::from(ClientError::status(502, "Bad Gateway"));
        assert_eq!(remote.failure_kind(), FailureKind::Remote);
        assert_eq!(remote.to_string(), "502 Bad Gateway");
    }
}
