//! Middleware for `axum::Router` and HTTP request processing.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use axum::Router;
//! use playground_server::middleware::{
//!     RecoveryConfig, RouterObservabilityExt, RouterRecoveryExt,
//! };
//!
//! let app: Router = Router::new()
//!     .with_recovery(&RecoveryConfig::default())
//!     .with_observability();
//! ```

mod observability;
mod recovery;
pub mod security;

pub use observability::RouterObservabilityExt;
pub use recovery::{RecoveryConfig, RouterRecoveryExt};
