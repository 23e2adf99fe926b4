//! Security middleware for HTTP requests.

mod body_limit;

pub use body_limit::{DEFAULT_MAX_BODY_SIZE, create_body_limit_layer};
