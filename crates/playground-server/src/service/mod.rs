//! Application state, configuration and upload storage.

mod config;
mod media_type;
mod state;
mod storage;

pub use crate::service::config::{ServiceConfig, ServiceConfigBuilder};
pub use crate::service::media_type::{extension_for, is_multipart_form};
pub use crate::service::state::ServiceState;
pub use crate::service::storage::{StoredFile, UploadStorage};
// Re-export error types from crate root for convenience
pub use crate::{Error as ServiceError, ErrorKind as ServiceErrorKind, Result};
