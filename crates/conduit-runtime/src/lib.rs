pub mod error;
pub mod execution;
pub mod session;

pub use error::{ExecutionError, RuntimeResult};
pub use execution::{missing_required_fields, ActionExecutor, ActionRef, ExecutionMetadata, ExecutionResult};
pub use session::{SelectedAction, Session};
