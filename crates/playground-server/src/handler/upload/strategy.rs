//! The [`UploadStrategy`] seam between the dispatcher and body formats.

use axum::extract::Request;

use crate::handler::Result;
use crate::service::{StoredFile, UploadStorage};

/// Outcome of offering a request to an [`UploadStrategy`].
#[derive(Debug)]
pub enum UploadOutcome {
    /// The strategy handled the request and wrote the file.
    Stored(StoredFile),
    /// The request is not in the format of the strategy.
    ///
    /// The request is handed back untouched, body included.
    NotApplicable(Request),
}

/// A way of turning an upload request into a stored file.
///
/// Strategies are tried in order by the [`UploadDispatcher`]. A strategy
/// decides applicability from the request head only; once it starts
/// consuming the body it must either store the file or fail.
///
/// [`UploadDispatcher`]: super::UploadDispatcher
#[async_trait::async_trait]
pub trait UploadStrategy: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Stores the upload, or returns the request if it does not apply.
    async fn try_store(&self, request: Request, storage: &UploadStorage) -> Result<UploadOutcome>;
}
