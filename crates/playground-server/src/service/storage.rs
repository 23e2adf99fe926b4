//! Upload directory management and streaming file writes.

use std::path::{Path, PathBuf};
use std::pin::pin;
use std::sync::Arc;

use bytes::Bytes;
use futures::{Stream, StreamExt};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::service::{Result, ServiceError};
use crate::utility::tracing_targets::TRACING_TARGET_STORAGE;

/// A file written to the upload directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// File name relative to the upload directory.
    pub name: String,
    /// Full path of the written file.
    pub path: PathBuf,
    /// Number of bytes written.
    pub size: u64,
}

/// Writes uploads into a single directory.
///
/// Files are opened with create + truncate, so a second upload with the same
/// name replaces the first. Concurrent writers of the same name are not
/// serialized, and a transfer that fails midway leaves the partially written
/// file in place.
#[derive(Debug, Clone)]
pub struct UploadStorage {
    upload_dir: Arc<Path>,
    max_file_size: u64,
}

impl UploadStorage {
    /// Creates a new storage rooted at `upload_dir`.
    ///
    /// Files growing beyond `max_file_size` bytes are rejected mid-transfer.
    pub fn new(upload_dir: impl Into<PathBuf>, max_file_size: u64) -> Self {
        Self {
            upload_dir: Arc::from(upload_dir.into()),
            max_file_size,
        }
    }

    /// Returns the upload directory.
    #[inline]
    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Returns the path a file with the given name is stored at.
    #[inline]
    pub fn resolve(&self, file_name: &str) -> PathBuf {
        self.upload_dir.join(file_name)
    }

    /// Creates the upload directory if it does not exist yet.
    ///
    /// Safe to call concurrently: `create_dir_all` reports an already existing
    /// directory, including one created by a racing caller, as success.
    pub async fn ensure_upload_dir(&self) -> Result<()> {
        match fs::create_dir_all(&self.upload_dir).await {
            Ok(()) => Ok(()),
            Err(err) => {
                tracing::error!(
                    target: TRACING_TARGET_STORAGE,
                    upload_dir = %self.upload_dir.display(),
                    error = %err,
                    "failed to create upload directory"
                );
                Err(ServiceError::file_system("Failed to create upload directory").with_source(err))
            }
        }
    }

    /// Streams `body` into the file `file_name` inside the upload directory.
    ///
    /// `file_name` must already be reduced to a single path component.
    /// The copy stops at the first chunk error, which is how a client
    /// disconnect surfaces; the error is returned unchanged.
    pub async fn write_stream<S>(&self, file_name: &str, body: S) -> Result<StoredFile>
    where
        S: Stream<Item = Result<Bytes>>,
    {
        self.ensure_upload_dir().await?;

        let path = self.resolve(file_name);
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .await
            .map_err(|err| {
                tracing::error!(
                    target: TRACING_TARGET_STORAGE,
                    path = %path.display(),
                    error = %err,
                    "failed to open upload file"
                );
                ServiceError::file_system("Failed to create file").with_source(err)
            })?;

        let mut body = pin!(body);
        let mut size = 0u64;

        while let Some(chunk) = body.next().await {
            let chunk = chunk.inspect_err(|err| {
                tracing::warn!(
                    target: TRACING_TARGET_STORAGE,
                    path = %path.display(),
                    written = size,
                    error = %err,
                    "upload body ended with an error"
                );
            })?;

            size += chunk.len() as u64;
            if size > self.max_file_size {
                tracing::warn!(
                    target: TRACING_TARGET_STORAGE,
                    path = %path.display(),
                    max_file_size = self.max_file_size,
                    "upload exceeds the size limit"
                );
                return Err(ServiceError::too_large(format!(
                    "Upload exceeds the limit of {} bytes",
                    self.max_file_size
                )));
            }

            file.write_all(&chunk).await.map_err(|err| {
                tracing::error!(
                    target: TRACING_TARGET_STORAGE,
                    path = %path.display(),
                    error = %err,
                    "failed to write upload chunk"
                );
                ServiceError::file_system("Failed to write file").with_source(err)
            })?;
        }

        file.flush()
            .await
            .map_err(|err| ServiceError::file_system("Failed to flush file").with_source(err))?;

        tracing::debug!(
            target: TRACING_TARGET_STORAGE,
            path = %path.display(),
            size,
            "upload written"
        );

        Ok(StoredFile {
            name: file_name.to_owned(),
            path,
            size,
        })
    }
}
