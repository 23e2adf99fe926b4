//! Request body size limiting middleware.

use axum::extract::DefaultBodyLimit;

/// Default maximum request body size: 32MB
pub const DEFAULT_MAX_BODY_SIZE: usize = 32 * 1024 * 1024;

/// Creates a body limit layer for body consuming extractors.
///
/// Replaces axum's 2MB default, which would otherwise cap multipart uploads
/// well below the configured upload size. Raw body streams are not affected
/// by this layer and are bounded by the upload storage instead.
///
/// # Examples
///
/// ```rust
/// use playground_server::middleware::security::create_body_limit_layer;
///
/// // Allow up to 32MB
/// let layer = create_body_limit_layer(32 * 1024 * 1024);
/// ```
pub fn create_body_limit_layer(max_size: usize) -> DefaultBodyLimit {
    DefaultBodyLimit::max(max_size)
}
