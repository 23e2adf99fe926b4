//! CLI configuration management.
//!
//! This module defines the complete CLI configuration hierarchy:
//!
//! ```text
//! Cli
//! ├── server: ServerConfig       # Host, port, shutdown, static assets
//! ├── recovery: RecoveryConfig   # Request timeout
//! └── service: ServiceConfig     # Upload directory, form field, size cap
//! ```
//!
//! All configuration can be provided via CLI arguments or environment variables.
//! Use `--help` to see all available options.
//!
//! # Example
//!
//! ```bash
//! playground --upload-dir /tmp/uploads --port 9000
//!
//! # Or via environment variables
//! UPLOAD_DIR=/tmp/uploads PORT=9000 playground
//! ```

mod server;

use std::process;

use anyhow::Context;
use clap::Parser;
use playground_server::middleware::RecoveryConfig;
use playground_server::service::ServiceConfig;
use serde::{Deserialize, Serialize};
pub use server::ServerConfig;

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_SERVER_STARTUP};

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(name = "playground")]
#[command(about = "HTTP file upload playground")]
#[command(version)]
pub struct Cli {
    /// Server network and lifecycle configuration.
    #[clap(flatten)]
    pub server: ServerConfig,

    /// Request timeout configuration.
    #[clap(flatten)]
    pub recovery: RecoveryConfig,

    /// Upload handling configuration.
    #[clap(flatten)]
    pub service: ServiceConfig,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    ///
    /// The .env file is loaded before clap parses arguments, so its variables
    /// act as defaults for the `env` backed options.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Logs build information at debug level.
    fn log_build_info() {
        tracing::debug!(
            target: TRACING_TARGET_SERVER_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );
    }

    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.server
            .validate()
            .context("invalid server configuration")?;

        if self.recovery.request_timeout == 0 {
            anyhow::bail!("invalid recovery configuration: request timeout must be at least 1 second");
        }

        self.service
            .validate()
            .context("invalid upload configuration")?;

        Ok(())
    }

    /// Logs the configuration (no sensitive information).
    pub fn log(&self) {
        Self::log_build_info();
        self.server.log();

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            upload_dir = %self.service.upload_dir.display(),
            upload_form_field = %self.service.upload_form_field,
            max_upload_size = self.service.max_upload_size,
            request_timeout_secs = self.recovery.request_timeout,
            "Upload configuration"
        );
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}
