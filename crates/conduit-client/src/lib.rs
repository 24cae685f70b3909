//! Client for the remote connector API: HTTP transport, call history and credential status

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod history;
pub mod memory;
pub mod response;
pub mod status;

pub use api::{authorization_url, ConnectorApi, ExecuteRequest, NewCredential};
pub use client::ApiClient;
pub use config::{ApiConfig, DEFAULT_API_VERSION, DEFAULT_BASE_URL, DEFAULT_USER_HEADER};
pub use error::{ClientError, ClientResult};
pub use history::{CallHistory, CallRecord, CredentialCheckGroup, HistoryEntry, MAX_HISTORY_ENTRIES};
pub use memory::MemoryConnectorApi;
pub use status::{categories, connector_statuses, filter_connectors};
