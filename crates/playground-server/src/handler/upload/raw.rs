//! Raw body uploads.

use axum::extract::Request;
use axum::http::header;
use futures::StreamExt;
use uuid::Uuid;

use super::{UploadOutcome, UploadStrategy};
use crate::handler::{ErrorKind, Result};
use crate::service::{ServiceError, UploadStorage, extension_for};

/// Stores the whole request body as a file.
///
/// The file is named after a random UUID, with the extension derived from the
/// declared `Content-Type`. The body itself is never inspected.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawUpload;

impl RawUpload {
    /// Creates a new [`RawUpload`].
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl UploadStrategy for RawUpload {
    fn name(&self) -> &'static str {
        "raw"
    }

    async fn try_store(
        &self,
        request: Request,
        storage: &UploadStorage,
    ) -> Result<UploadOutcome> {
        let Some(content_type) = request.headers().get(header::CONTENT_TYPE) else {
            return Err(ErrorKind::UnsupportedMediaType
                .with_context("The Content-Type header is missing"));
        };

        let Some(extension) = content_type.to_str().ok().and_then(extension_for) else {
            let content_type = String::from_utf8_lossy(content_type.as_bytes()).into_owned();
            return Err(ErrorKind::UnsupportedMediaType.with_context(content_type));
        };

        let file_name = format!("{}.{extension}", Uuid::new_v4().simple());
        let body = request.into_body().into_data_stream().map(|chunk| {
            chunk.map_err(|err| ServiceError::transfer("Failed to read request body").with_source(err))
        });

        let stored = storage.write_stream(&file_name, body).await?;
        Ok(UploadOutcome::Stored(stored))
    }
}
