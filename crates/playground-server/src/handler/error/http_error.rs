//! HTTP error handling with builder pattern for dynamic error responses.
//!
//! Errors are rendered through [`write_error`], so every failure of the
//! upload API reaches the client as a [`ResponseEnvelope`] carrying the
//! status code and the error text.
//!
//! [`ResponseEnvelope`]: crate::handler::response::ResponseEnvelope

use std::borrow::Cow;
use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::handler::response::write_error;

/// The error type for HTTP handlers in the server.
#[derive(Clone)]
#[must_use = "errors do nothing unless serialized"]
pub struct Error<'a> {
    kind: ErrorKind,
    context: Option<Cow<'a, str>>,
    message: Option<Cow<'a, str>>,
}

impl Error<'static> {
    /// Creates a new [`Error`] with the specified kind.
    #[inline]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
            message: None,
        }
    }
}

impl<'a> Error<'a> {
    /// Attaches context information to the error.
    ///
    /// Context is appended to the message in the rendered error text.
    #[inline]
    pub fn with_context(self, context: impl Into<Cow<'a, str>>) -> Self {
        Self {
            context: Some(context.into()),
            ..self
        }
    }

    /// Sets a custom user-friendly message for the error.
    #[inline]
    pub fn with_message(self, message: impl Into<Cow<'a, str>>) -> Self {
        Self {
            message: Some(message.into()),
            ..self
        }
    }

    /// Returns the error kind.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the context if present.
    #[inline]
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Returns the custom message if present.
    #[inline]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns the text written to the `error` field of the envelope.
    pub fn error_text(&self) -> String {
        let message = self
            .message
            .as_deref()
            .unwrap_or_else(|| self.kind.default_message());

        match self.context.as_deref() {
            Some(context) => format!("{message}: {context}"),
            None => message.to_owned(),
        }
    }
}

impl Default for Error<'static> {
    #[inline]
    fn default() -> Self {
        Self::new(ErrorKind::default())
    }
}

impl fmt::Debug for Error<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug_struct = f.debug_struct("Error");
        debug_struct
            .field("kind", &self.kind)
            .field("name", &self.kind.name())
            .field("status", &self.kind.status_code());

        if let Some(ref context) = self.context {
            debug_struct.field("context", context);
        }

        if let Some(ref message) = self.message {
            debug_struct.field("custom_message", message);
        }

        debug_struct.finish()
    }
}

impl fmt::Display for Error<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): {}",
            self.kind.name(),
            self.kind.status_code().as_u16(),
            self.error_text()
        )
    }
}

impl std::error::Error for Error<'_> {}

impl IntoResponse for Error<'_> {
    fn into_response(self) -> Response {
        write_error(self.kind.status_code(), self.error_text())
    }
}

impl From<ErrorKind> for Error<'static> {
    #[inline]
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

/// A specialized [`Result`] type for HTTP operations.
///
/// [`Result`]: std::result::Result
pub type Result<T, E = Error<'static>> = std::result::Result<T, E>;

/// Enumeration of all HTTP error kinds of the upload API.
///
/// Each variant corresponds to a specific HTTP status code and error scenario.
#[must_use = "error kinds do nothing unless used to create errors"]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    // 4xx Client Errors
    /// 400 Bad Request - Malformed body or unusable file name
    BadRequest,
    /// 400 Bad Request - Multipart body lacks the expected file field
    MissingField,
    /// 404 Not Found - Unknown route
    NotFound,
    /// 405 Method Not Allowed - Non-POST request on the upload endpoint
    MethodNotAllowed,
    /// 413 Payload Too Large - Body exceeds the upload cap
    PayloadTooLarge,
    /// 415 Unsupported Media Type - Content type cannot be mapped to a file
    UnsupportedMediaType,

    // 5xx Server Errors
    /// 500 Internal Server Error - Directory or file write failure
    StorageFailure,
    /// 500 Internal Server Error - Unexpected server error
    #[default]
    InternalServerError,
}

impl ErrorKind {
    /// Converts this error kind into a full [`Error`].
    #[inline]
    pub fn into_error(self) -> Error<'static> {
        Error::new(self)
    }

    /// Creates an [`Error`] with the specified context.
    #[inline]
    pub fn with_context<'a>(self, context: impl Into<Cow<'a, str>>) -> Error<'a> {
        Error::new(self).with_context(context)
    }

    /// Creates an [`Error`] with the specified message.
    #[inline]
    pub fn with_message<'a>(self, message: impl Into<Cow<'a, str>>) -> Error<'a> {
        Error::new(self).with_message(message)
    }

    /// Returns the snake case identifier of this error kind.
    #[inline]
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Returns the HTTP status code for this error kind.
    pub const fn status_code(self) -> StatusCode {
        match self {
            Self::BadRequest | Self::MissingField => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::StorageFailure | Self::InternalServerError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns the message used when no custom message is set.
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::BadRequest => "The request could not be processed due to invalid data",
            Self::MissingField => "The multipart form is missing the file field",
            Self::NotFound => "The requested resource was not found",
            Self::MethodNotAllowed => "Method not allowed",
            Self::PayloadTooLarge => "The request body exceeds the upload limit",
            Self::UnsupportedMediaType => "Unsupported media type",
            Self::StorageFailure => "The uploaded file could not be stored",
            Self::InternalServerError => {
                "An internal server error occurred. Please try again later"
            }
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl IntoResponse for ErrorKind {
    #[inline]
    fn into_response(self) -> Response {
        Error::new(self).into_response()
    }
}
