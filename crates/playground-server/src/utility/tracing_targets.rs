//! Centralized tracing target constants for structured logging.
//!
//! This module defines the tracing target strings used throughout the crate,
//! providing a single source of truth for log categorization and filtering.

/// Upload request handling including dispatch and response mapping.
pub const TRACING_TARGET_UPLOAD: &str = "playground_server::handler::upload";

/// Upload strategy selection and content-type classification.
pub const TRACING_TARGET_DISPATCH: &str = "playground_server::handler::upload::dispatch";

/// Upload directory management and file writes.
pub const TRACING_TARGET_STORAGE: &str = "playground_server::service::storage";

/// Service error to HTTP error conversions.
pub const TRACING_TARGET_SERVICE_ERROR: &str = "playground_server::handler::service";

/// Error recovery including middleware errors and request failures.
pub const TRACING_TARGET_RECOVERY_ERROR: &str = "playground_server::recovery::error";

/// Panic recovery including handler panics and service failures.
pub const TRACING_TARGET_RECOVERY_PANIC: &str = "playground_server::recovery::panic";
