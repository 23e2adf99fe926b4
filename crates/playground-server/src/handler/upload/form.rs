//! Multipart form uploads.

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::{StatusCode, header};
use futures::StreamExt;

use super::{UploadOutcome, UploadStrategy};
use crate::handler::response::clean_file_name;
use crate::handler::{Error, ErrorKind, Result};
use crate::service::{ServiceError, UploadStorage, is_multipart_form};
use crate::utility::tracing_targets::TRACING_TARGET_UPLOAD;

/// Longest file name, in bytes, most file systems accept for one component.
const MAX_FILE_NAME_LEN: usize = 255;

/// Stores the file part of a `multipart/form-data` body.
///
/// Parts are scanned in order until the one named after the configured form
/// field shows up; its content is streamed straight into the upload directory
/// under the cleaned client file name.
#[derive(Debug, Clone)]
pub struct FormUpload {
    field_name: String,
}

impl FormUpload {
    /// Creates a new strategy looking for the given form field.
    pub fn new(field_name: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
        }
    }
}

#[async_trait::async_trait]
impl UploadStrategy for FormUpload {
    fn name(&self) -> &'static str {
        "multipart"
    }

    async fn try_store(
        &self,
        request: Request,
        storage: &UploadStorage,
    ) -> Result<UploadOutcome> {
        let is_form = request
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(is_multipart_form);

        if !is_form {
            return Ok(UploadOutcome::NotApplicable(request));
        }

        let mut multipart = Multipart::from_request(request, &())
            .await
            .map_err(rejection_error)?;

        while let Some(field) = multipart.next_field().await.map_err(|err| {
            tracing::warn!(
                target: TRACING_TARGET_UPLOAD,
                error = %err,
                "failed to read multipart field"
            );
            multipart_error(err)
        })? {
            if field.name() != Some(self.field_name.as_str()) {
                tracing::trace!(
                    target: TRACING_TARGET_UPLOAD,
                    field = field.name().unwrap_or_default(),
                    "skipping multipart field"
                );
                continue;
            }

            let file_name = clean_file_name(field.file_name().unwrap_or_default());
            if file_name.is_empty() {
                return Err(ErrorKind::BadRequest
                    .with_message("Invalid file name")
                    .with_context("The file part has no usable file name"));
            }

            if file_name.len() > MAX_FILE_NAME_LEN {
                return Err(ErrorKind::BadRequest
                    .with_message("Invalid file name")
                    .with_context(format!("Longer than {MAX_FILE_NAME_LEN} bytes")));
            }

            let body = field.map(|chunk| chunk.map_err(chunk_error));
            let stored = storage.write_stream(&file_name, body).await?;
            return Ok(UploadOutcome::Stored(stored));
        }

        Err(ErrorKind::MissingField.with_context(format!("expected field '{}'", self.field_name)))
    }
}

fn rejection_error(rejection: MultipartRejection) -> Error<'static> {
    match rejection {
        MultipartRejection::InvalidBoundary(_) => ErrorKind::BadRequest
            .with_message("Invalid multipart boundary")
            .with_context("The Content-Type header is missing a valid boundary parameter"),
        _ => ErrorKind::BadRequest
            .with_message("Invalid multipart request")
            .with_context(rejection.body_text()),
    }
}

fn multipart_error(err: MultipartError) -> Error<'static> {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ErrorKind::PayloadTooLarge.with_context(err.body_text());
    }

    ErrorKind::BadRequest
        .with_message("Invalid multipart data")
        .with_context(err.body_text())
}

fn chunk_error(err: MultipartError) -> ServiceError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ServiceError::too_large("Multipart body exceeds the upload limit").with_source(err);
    }

    ServiceError::transfer("Failed to read multipart file part").with_source(err)
}
