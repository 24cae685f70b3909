pub mod error;
pub mod field;
pub mod sanitization;
pub mod types;

// Re-export commonly used types
pub use error::{CoreError, CoreResult};
pub use field::{
    ActionSchema, FieldDescriptor, FieldKind, FieldLocation, FormValues, HttpMethod,
    RequestPayload, SelectOption,
};
pub use sanitization::{is_sensitive_field, mask_secret, sanitize_json_value};
pub use types::{
    ActionSummary, ActivityRecord, AuxiliaryField, Connector, ConnectorStatus, Credential,
    CredentialMetadata, CredentialStatus, FailureKind, Resource, SavedTemplate,
};
