use std::borrow::Cow;

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use super::FileInfo;
use crate::utility::tracing_targets::TRACING_TARGET_UPLOAD;

/// Message attached to successful uploads.
pub const FILE_CREATED_MESSAGE: &str = "file created";

/// JSON envelope wrapping every response of the upload API.
///
/// Successful uploads carry `file`, failures carry `error`. The type itself
/// does not enforce the exclusivity; any combination serializes and
/// deserializes faithfully. `message`, `error` and `file` are omitted from the
/// JSON when empty or absent.
#[must_use = "envelopes do nothing unless serialized"]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// HTTP status code of the response.
    pub status: u16,
    /// Human-readable message.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    /// Error description, present on failures only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Stored file metadata, present on successful uploads only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<FileInfo>,
}

impl ResponseEnvelope {
    /// Creates an envelope carrying only a status code.
    #[inline]
    pub fn new(status: StatusCode) -> Self {
        Self {
            status: status.as_u16(),
            ..Self::default()
        }
    }

    /// Creates the `201 Created` envelope for a stored file.
    pub fn created(file: FileInfo) -> Self {
        Self::new(StatusCode::CREATED)
            .with_message(FILE_CREATED_MESSAGE)
            .with_file(file)
    }

    /// Creates a failure envelope with the given status and error text.
    pub fn failure(status: StatusCode, error: impl Into<String>) -> Self {
        Self::new(status).with_error(error)
    }

    /// Sets the human-readable message.
    #[inline]
    pub fn with_message(self, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..self
        }
    }

    /// Sets the error text.
    #[inline]
    pub fn with_error(self, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..self
        }
    }

    /// Attaches stored file metadata.
    #[inline]
    pub fn with_file(self, file: FileInfo) -> Self {
        Self {
            file: Some(file),
            ..self
        }
    }

    /// Returns the status as a [`StatusCode`].
    ///
    /// Values outside of `100..=999` are reported as `500 Internal Server Error`.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Serializes the envelope into JSON bytes.
    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    /// Deserializes an envelope from JSON bytes.
    pub fn from_json(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}

impl IntoResponse for ResponseEnvelope {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match self.to_json() {
            Ok(body) => (
                status,
                [
                    (header::CONTENT_TYPE, mime::APPLICATION_JSON.essence_str()),
                    (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
                ],
                body,
            )
                .into_response(),
            Err(err) => {
                tracing::error!(
                    target: TRACING_TARGET_UPLOAD,
                    error = %err,
                    "failed to serialize response envelope"
                );
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

/// Writes an error envelope containing only `status` and `error`.
///
/// The response carries `Content-Type: application/json`,
/// `X-Content-Type-Options: nosniff` and exactly the given status code.
pub fn write_error<'a>(status: StatusCode, error: impl Into<Cow<'a, str>>) -> Response {
    ResponseEnvelope::failure(status, error.into().into_owned()).into_response()
}
