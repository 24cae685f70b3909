//! Credential resolution and the interactive open-URL / confirm acquisition flow

pub mod error;
pub mod flow;
pub mod interaction;
pub mod resolver;
pub mod scripted;

pub use error::{AuthError, AuthResult};
pub use flow::{
    AcquisitionConfig, AcquisitionFlow, AcquisitionOutcome, AcquisitionState, DEFAULT_AUTHENTICATION_TYPE,
    DEFAULT_REDIRECT_URI,
};
pub use interaction::{AuthInteraction, Confirmation, ManualUrlOpener, SystemUrlOpener, UrlOpener};
pub use resolver::CredentialResolver;
pub use scripted::{ConfirmStep, RecordingUrlOpener, ScriptedInteraction};
