//! Application state.

use std::sync::Arc;

use crate::service::{Result, ServiceConfig, UploadStorage};

/// Application state shared by the route builders.
#[must_use = "state does nothing unless you use it"]
#[derive(Debug, Clone)]
pub struct ServiceState {
    config: Arc<ServiceConfig>,
    upload_storage: UploadStorage,
}

impl ServiceState {
    /// Initializes application state from configuration.
    ///
    /// The upload directory is not touched here; it is created lazily by the
    /// first upload.
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        config.validate()?;

        let upload_storage =
            UploadStorage::new(config.upload_dir(), config.max_upload_size as u64);

        Ok(Self {
            config: Arc::new(config.clone()),
            upload_storage,
        })
    }

    /// Returns the configuration the state was built from.
    #[inline]
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Returns the upload storage.
    #[inline]
    pub fn upload_storage(&self) -> &UploadStorage {
        &self.upload_storage
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn builds_state_without_touching_the_disk() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        let upload_dir = temp.path().join("upload");
        let config = ServiceConfig::builder()
            .with_upload_dir(upload_dir.clone())
            .build()?;

        let state = ServiceState::from_config(&config)?;
        assert_eq!(state.upload_storage().upload_dir(), upload_dir);
        assert!(!upload_dir.exists());
        Ok(())
    }

    #[test]
    fn rejects_invalid_config() {
        let config = ServiceConfig {
            max_upload_size: 0,
            ..ServiceConfig::default()
        };
        assert!(ServiceState::from_config(&config).is_err());
    }
}
