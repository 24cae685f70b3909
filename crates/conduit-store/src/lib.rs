pub mod activity;
pub mod error;
pub mod kv;
pub mod memory;
pub mod session;
#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod templates;

pub use activity::{ActivityLog, ACTIVITY_KEY, MAX_ACTIVITY_ENTRIES};
pub use error::{StoreError, StoreResult};
pub use kv::KvStore;
pub use memory::MemoryKvStore;
pub use session::{SessionConfig, SessionConfigStore, SESSION_API_KEY, SESSION_USER_ID};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteKvStore;
pub use templates::{TemplateStore, TEMPLATES_KEY};
