//! Ordered dispatch of upload requests to strategies.

use std::fmt;
use std::sync::Arc;

use axum::extract::Request;
use axum::http::header;

use super::{FormUpload, RawUpload, UploadOutcome, UploadStrategy};
use crate::handler::{ErrorKind, Result};
use crate::service::{ServiceState, StoredFile, UploadStorage};
use crate::utility::tracing_targets::TRACING_TARGET_DISPATCH;

/// Hands an upload request to the first strategy that accepts it.
///
/// The default order is multipart form first, raw body second. Since the raw
/// strategy accepts any request, a request never falls through both.
#[derive(Clone)]
pub struct UploadDispatcher {
    strategies: Arc<[Box<dyn UploadStrategy>]>,
    storage: UploadStorage,
    max_upload_size: u64,
}

impl UploadDispatcher {
    /// Creates a dispatcher trying `strategies` in order.
    pub fn new(
        storage: UploadStorage,
        max_upload_size: u64,
        strategies: Vec<Box<dyn UploadStrategy>>,
    ) -> Self {
        Self {
            strategies: strategies.into(),
            storage,
            max_upload_size,
        }
    }

    /// Creates the default dispatcher for the application state.
    pub fn from_state(state: &ServiceState) -> Self {
        let config = state.config();
        let strategies: Vec<Box<dyn UploadStrategy>> = vec![
            Box::new(FormUpload::new(config.upload_form_field.clone())),
            Box::new(RawUpload::new()),
        ];

        Self::new(
            state.upload_storage().clone(),
            config.max_upload_size as u64,
            strategies,
        )
    }

    /// Stores the upload carried by `request`.
    ///
    /// A declared `Content-Length` above the upload cap is rejected before
    /// any strategy runs.
    pub async fn dispatch(&self, request: Request) -> Result<StoredFile> {
        let declared_length = request
            .headers()
            .get(header::CONTENT_LENGTH)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<u64>().ok());

        if let Some(length) = declared_length
            && length > self.max_upload_size
        {
            tracing::warn!(
                target: TRACING_TARGET_DISPATCH,
                content_length = length,
                max_upload_size = self.max_upload_size,
                "rejecting oversized upload"
            );
            return Err(ErrorKind::PayloadTooLarge.with_context(format!(
                "Content-Length {length} exceeds the limit of {} bytes",
                self.max_upload_size
            )));
        }

        let mut request = request;
        for strategy in self.strategies.iter() {
            match strategy.try_store(request, &self.storage).await? {
                UploadOutcome::Stored(stored) => {
                    tracing::debug!(
                        target: TRACING_TARGET_DISPATCH,
                        strategy = strategy.name(),
                        file_name = %stored.name,
                        "upload stored"
                    );
                    return Ok(stored);
                }
                UploadOutcome::NotApplicable(returned) => {
                    tracing::trace!(
                        target: TRACING_TARGET_DISPATCH,
                        strategy = strategy.name(),
                        "strategy does not apply"
                    );
                    request = returned;
                }
            }
        }

        Err(ErrorKind::UnsupportedMediaType.with_context("No upload strategy accepts the request"))
    }
}

impl fmt::Debug for UploadDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let strategies: Vec<_> = self.strategies.iter().map(|s| s.name()).collect();
        f.debug_struct("UploadDispatcher")
            .field("strategies", &strategies)
            .field("storage", &self.storage)
            .field("max_upload_size", &self.max_upload_size)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http;
    use tempfile::TempDir;

    use super::*;

    /// Strategy that never applies.
    struct Decline;

    #[async_trait::async_trait]
    impl UploadStrategy for Decline {
        fn name(&self) -> &'static str {
            "decline"
        }

        async fn try_store(
            &self,
            request: Request,
            _storage: &UploadStorage,
        ) -> Result<UploadOutcome> {
            Ok(UploadOutcome::NotApplicable(request))
        }
    }

    fn raw_request(content_type: &str, body: &'static str) -> anyhow::Result<Request> {
        let request = http::Request::builder()
            .method("POST")
            .uri("/api/upload")
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body))?;
        Ok(request)
    }

    #[tokio::test]
    async fn declined_requests_reach_the_next_strategy() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        let storage = UploadStorage::new(temp.path(), 1024);
        let strategies: Vec<Box<dyn UploadStrategy>> =
            vec![Box::new(Decline), Box::new(RawUpload::new())];
        let dispatcher = UploadDispatcher::new(storage, 1024, strategies);

        let stored = dispatcher
            .dispatch(raw_request("text/plain", "passed along")?)
            .await?;

        assert!(stored.name.ends_with(".txt"));
        assert_eq!(tokio::fs::read_to_string(&stored.path).await?, "passed along");
        Ok(())
    }

    #[tokio::test]
    async fn unclaimed_requests_are_unsupported() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        let storage = UploadStorage::new(temp.path().join("upload"), 1024);
        let dispatcher = UploadDispatcher::new(storage, 1024, vec![Box::new(Decline)]);

        let error = dispatcher
            .dispatch(raw_request("text/plain", "nobody wants this")?)
            .await
            .expect_err("no strategy should accept the request");

        assert_eq!(error.kind(), ErrorKind::UnsupportedMediaType);
        assert!(!temp.path().join("upload").exists());
        Ok(())
    }

    #[tokio::test]
    async fn declared_length_above_the_cap_is_rejected() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        let storage = UploadStorage::new(temp.path(), 4);
        let dispatcher = UploadDispatcher::new(storage, 4, vec![Box::new(RawUpload::new())]);

        let mut request = raw_request("text/plain", "too long")?;
        request
            .headers_mut()
            .insert(header::CONTENT_LENGTH, "8".parse()?);

        let error = dispatcher
            .dispatch(request)
            .await
            .expect_err("upload should exceed the limit");
        assert_eq!(error.kind(), ErrorKind::PayloadTooLarge);
        Ok(())
    }

    #[tokio::test]
    async fn streamed_bodies_above_the_cap_are_rejected() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        let storage = UploadStorage::new(temp.path(), 4);
        let dispatcher = UploadDispatcher::new(storage, 4, vec![Box::new(RawUpload::new())]);

        let error = dispatcher
            .dispatch(raw_request("application/octet-stream", "too long")?)
            .await
            .expect_err("upload should exceed the limit");
        assert_eq!(error.kind(), ErrorKind::PayloadTooLarge);
        Ok(())
    }

    #[tokio::test]
    async fn raw_uploads_require_a_known_content_type() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        let storage = UploadStorage::new(temp.path(), 1024);
        let dispatcher = UploadDispatcher::new(storage, 1024, vec![Box::new(RawUpload::new())]);

        let request = http::Request::builder()
            .method("POST")
            .uri("/api/upload")
            .body(Body::from("no content type"))?;
        let error = dispatcher
            .dispatch(request)
            .await
            .expect_err("missing content type should be rejected");
        assert_eq!(error.kind(), ErrorKind::UnsupportedMediaType);

        let error = dispatcher
            .dispatch(raw_request("application/x-not-registered", "data")?)
            .await
            .expect_err("unknown content type should be rejected");
        assert_eq!(error.kind(), ErrorKind::UnsupportedMediaType);
        Ok(())
    }
}
