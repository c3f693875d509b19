//! Configuration loading and validation for the paperwork service.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any required variable is missing or invalid.

use std::{net::SocketAddr, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Validated service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Address the local HTTP API binds to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Root directory for durable local state. **Required.**
    pub data_dir: PathBuf,

    /// Device key file. Defaults to `<DATA_DIR>/device.key`.
    #[serde(default)]
    pub key_file: Option<PathBuf>,

    /// Ciphertext answer store file. Defaults to `<DATA_DIR>/answers.json`.
    #[serde(default)]
    pub answers_file: Option<PathBuf>,

    /// Directory holding the PDF form templates. **Required.**
    pub template_dir: PathBuf,

    /// Upper bound (seconds) on loading one template.
    #[serde(default = "default_template_load_timeout")]
    pub template_load_timeout_secs: u64,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Optional OTLP endpoint for trace export.
    #[serde(default)]
    pub otel_exporter_otlp_endpoint: Option<String>,
}

fn default_listen_addr() -> String {
    "127.0.0.1:7410".into()
}
fn default_template_load_timeout() -> u64 {
    10
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required variable is absent or cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    pub fn key_file(&self) -> PathBuf {
        self.key_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join("device.key"))
    }

    pub fn answers_file(&self) -> PathBuf {
        self.answers_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join("answers.json"))
    }

    pub fn template_load_timeout(&self) -> Duration {
        Duration::from_secs(self.template_load_timeout_secs)
    }

    /// Parsed [`Config::listen_addr`].
    ///
    /// # Errors
    ///
    /// Returns an error if the address is not `host:port`.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.listen_addr
            .parse()
            .with_context(|| format!("LISTEN_ADDR is not a socket address: {}", self.listen_addr))
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        ensure_non_empty(&self.data_dir, "DATA_DIR")?;
        ensure_non_empty(&self.template_dir, "TEMPLATE_DIR")?;
        self.socket_addr()?;

        if self.template_load_timeout_secs == 0 {
            anyhow::bail!("TEMPLATE_LOAD_TIMEOUT_SECS must be > 0");
        }
        if let Some(endpoint) = &self.otel_exporter_otlp_endpoint {
            if endpoint.trim().is_empty() {
                anyhow::bail!("OTEL_EXPORTER_OTLP_ENDPOINT must not be empty when set");
            }
        }
        Ok(())
    }
}

fn ensure_non_empty(value: &std::path::Path, name: &str) -> Result<()> {
    if value.as_os_str().is_empty() {
        anyhow::bail!("{name} is required and must not be empty");
    }
    Ok(())
}
