use std::path::{Path, PathBuf};

#[cfg(feature = "config")]
use clap::Args;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::service::{Result, ServiceError};

/// Default values for configuration options.
mod defaults {
    use std::path::PathBuf;

    /// Default directory for uploaded files.
    pub const UPLOAD_DIR: &str = "./static/upload";

    /// Default multipart form field carrying the file.
    pub const UPLOAD_FORM_FIELD: &str = "file";

    /// Default upload cap: 32 MiB.
    pub const MAX_UPLOAD_SIZE: usize = 32 * 1024 * 1024;

    /// Default upload directory as a path.
    pub fn upload_dir() -> PathBuf {
        UPLOAD_DIR.into()
    }
}

/// App [`state`] configuration.
///
/// [`state`]: crate::service::ServiceState
#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
#[builder(
    pattern = "owned",
    setter(into, prefix = "with"),
    build_fn(validate = "Self::validate")
)]
pub struct ServiceConfig {
    /// Directory where uploaded files are stored.
    ///
    /// Created on the first upload if it does not exist yet.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "UPLOAD_DIR", default_value = defaults::UPLOAD_DIR)
    )]
    #[builder(default = "defaults::upload_dir()")]
    pub upload_dir: PathBuf,

    /// Name of the multipart form field carrying the uploaded file.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "UPLOAD_FORM_FIELD", default_value = defaults::UPLOAD_FORM_FIELD)
    )]
    #[builder(default = "defaults::UPLOAD_FORM_FIELD.to_string()")]
    pub upload_form_field: String,

    /// Maximum accepted request body size in bytes.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "MAX_UPLOAD_SIZE", default_value_t = defaults::MAX_UPLOAD_SIZE)
    )]
    #[builder(default = "defaults::MAX_UPLOAD_SIZE")]
    pub max_upload_size: usize,
}

impl ServiceConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder::default()
    }

    /// Returns the upload directory.
    #[inline]
    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Validates all configuration values.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the upload directory or form field
    /// is empty, or the upload cap is zero.
    pub fn validate(&self) -> Result<()> {
        if self.upload_dir.as_os_str().is_empty() {
            return Err(ServiceError::config("Upload directory cannot be empty"));
        }

        if self.upload_form_field.is_empty() {
            return Err(ServiceError::config("Upload form field cannot be empty"));
        }

        if self.max_upload_size == 0 {
            return Err(ServiceError::config(
                "Maximum upload size must be greater than 0",
            ));
        }

        Ok(())
    }
}

impl ServiceConfigBuilder {
    /// Wrapper for builder validation that returns String errors.
    fn validate(builder: &ServiceConfigBuilder) -> Result<(), String> {
        if let Some(upload_dir) = &builder.upload_dir
            && upload_dir.as_os_str().is_empty()
        {
            return Err("Upload directory cannot be empty".to_string());
        }

        if let Some(form_field) = &builder.upload_form_field
            && form_field.is_empty()
        {
            return Err("Upload form field cannot be empty".to_string());
        }

        if let Some(max_upload_size) = builder.max_upload_size
            && max_upload_size == 0
        {
            return Err("Maximum upload size must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            upload_dir: defaults::upload_dir(),
            upload_form_field: defaults::UPLOAD_FORM_FIELD.to_string(),
            max_upload_size: defaults::MAX_UPLOAD_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ServiceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.upload_dir(), Path::new("./static/upload"));
        assert_eq!(config.upload_form_field, "file");
        assert_eq!(config.max_upload_size, 32 * 1024 * 1024);
    }

    #[test]
    fn builder_applies_defaults() -> anyhow::Result<()> {
        let config = ServiceConfig::builder()
            .with_upload_dir("/tmp/uploads")
            .build()?;

        assert_eq!(config.upload_dir(), Path::new("/tmp/uploads"));
        assert_eq!(config.upload_form_field, "file");
        Ok(())
    }

    #[test]
    fn builder_rejects_invalid_values() {
        assert!(
            ServiceConfig::builder()
                .with_upload_form_field("")
                .build()
                .is_err()
        );
        assert!(
            ServiceConfig::builder()
                .with_max_upload_size(0usize)
                .build()
                .is_err()
        );
        assert!(ServiceConfig::builder().with_upload_dir("").build().is_err());
    }

    #[test]
    fn validate_rejects_empty_field() {
        let config = ServiceConfig {
            upload_form_field: String::new(),
            ..ServiceConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
