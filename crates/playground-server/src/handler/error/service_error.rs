//! Service error to HTTP error conversion implementation.
//!
//! This module maps service layer failures onto HTTP errors with proper
//! status codes and logs them before they are written to the client.

use super::http_error::{Error as HttpError, ErrorKind};
use crate::utility::tracing_targets::TRACING_TARGET_SERVICE_ERROR;

impl From<crate::Error> for HttpError<'static> {
    fn from(error: crate::Error) -> Self {
        use crate::ErrorKind as ServiceErrorKind;

        let source = std::error::Error::source(&error).map(ToString::to_string);

        match error.kind() {
            ServiceErrorKind::Transfer => {
                tracing::warn!(
                    target: TRACING_TARGET_SERVICE_ERROR,
                    error = %error,
                    source = ?source,
                    "Upload transfer failed"
                );
            }
            ServiceErrorKind::TooLarge => {
                tracing::warn!(
                    target: TRACING_TARGET_SERVICE_ERROR,
                    error = %error,
                    "Upload rejected by size limit"
                );
            }
            ServiceErrorKind::FileSystem => {
                tracing::error!(
                    target: TRACING_TARGET_SERVICE_ERROR,
                    error = %error,
                    source = ?source,
                    "File system operation failed"
                );
            }
            ServiceErrorKind::Config => {
                tracing::error!(
                    target: TRACING_TARGET_SERVICE_ERROR,
                    error = %error,
                    error_kind = %error.kind(),
                    "Service operation failed"
                );
            }
        }

        let context = match source {
            Some(source) => format!("{}: {}", error.message(), source),
            None => error.message().to_owned(),
        };

        match error.kind() {
            ServiceErrorKind::Transfer => ErrorKind::BadRequest
                .with_message("Failed to read upload")
                .with_context(context),
            ServiceErrorKind::TooLarge => ErrorKind::PayloadTooLarge.with_context(context),
            ServiceErrorKind::FileSystem => ErrorKind::StorageFailure.with_context(context),
            ServiceErrorKind::Config => ErrorKind::InternalServerError.into_error(),
        }
    }
}
