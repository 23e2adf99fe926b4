//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use playground_server::handler::routes;
//! use playground_server::service::{ServiceConfig, ServiceState};
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = ServiceConfig::default();
//! let state = ServiceState::from_config(&config)?;
//! let router: axum::Router = routes(&state).with_state(state);
//! # Ok(())
//! # }
//! ```
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod error;
pub mod response;
mod upload;

use axum::Router;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorKind, Result};
pub use crate::handler::response::{FileInfo, ResponseEnvelope, write_error};
pub use crate::handler::upload::{
    FormUpload, RawUpload, UploadDispatcher, UploadOutcome, UploadStrategy,
};
use crate::service::ServiceState;

/// Answers requests no route matched with a `404` envelope.
#[inline]
pub async fn not_found() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns a [`Router`] with all API routes and no fallback.
///
/// Use this to serve something else, such as static assets, for unmatched
/// paths.
pub fn api_routes(state: &ServiceState) -> Router<ServiceState> {
    Router::new().merge(upload::routes(state))
}

/// Returns a [`Router`] with all API routes and the `404` envelope fallback.
pub fn routes(state: &ServiceState) -> Router<ServiceState> {
    api_routes(state).fallback(not_found)
}
