//! Global configuration parsing and validation.

use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::{AppError, Result};

/// Sequence counter settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct CounterConfig {
    /// Value the counter is created at; the first form number is `floor + 1`.
    #[serde(default = "default_counter_floor")]
    pub floor: i64,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            floor: default_counter_floor(),
        }
    }
}

/// Remote decoration assets embedded into rendered documents.
///
/// Every asset is optional. An empty URL is treated exactly like an
/// unreachable one: the document is rendered without it.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct AssetConfig {
    /// Full-page background for the application form.
    #[serde(default)]
    pub background_url: String,
    /// Letterhead logo for the acknowledgement receipt.
    #[serde(default)]
    pub logo_url: String,
    /// Upper bound for a single asset download.
    #[serde(default = "default_fetch_timeout_seconds")]
    pub fetch_timeout_seconds: u64,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            background_url: String::new(),
            logo_url: String::new(),
            fetch_timeout_seconds: default_fetch_timeout_seconds(),
        }
    }
}

impl AssetConfig {
    /// Fetch timeout as a [`Duration`].
    #[must_use]
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_seconds)
    }
}

fn default_counter_floor() -> i64 {
    500
}

fn default_fetch_timeout_seconds() -> u64 {
    10
}

fn default_bind_address() -> IpAddr {
    IpAddr::from([127, 0, 0, 1])
}

fn default_http_port() -> u16 {
    5000
}

fn default_public_host() -> String {
    "localhost:5000".into()
}

fn default_form_limit() -> u32 {
    500
}

fn default_db_path() -> PathBuf {
    PathBuf::from("data").join("sgwc-registry.db")
}

/// Global configuration parsed from `config.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct GlobalConfig {
    /// `SQLite` database file.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
    /// Interface the HTTP server binds to.
    #[serde(default = "default_bind_address")]
    pub bind_address: IpAddr,
    /// HTTP port; `0` lets the OS pick one.
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// Host embedded in verification QR codes when a request carries no
    /// `Host` header.
    #[serde(default = "default_public_host")]
    pub public_host: String,
    /// Maximum registrations a single operator may submit.
    #[serde(default = "default_form_limit")]
    pub form_limit_per_admin: u32,
    /// Sequence counter settings.
    #[serde(default)]
    pub counter: CounterConfig,
    /// Decoration assets.
    #[serde(default)]
    pub assets: AssetConfig,
}

impl GlobalConfig {
    /// Load and validate configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or contains
    /// invalid TOML, or if validation fails.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("failed to read config: {err}")))?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Socket address the HTTP server binds to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.http_port)
    }

    fn validate(&self) -> Result<()> {
        if self.form_limit_per_admin == 0 {
            return Err(AppError::Config(
                "form_limit_per_admin must be greater than zero".into(),
            ));
        }

        if self.counter.floor < 0 {
            return Err(AppError::Config("counter.floor must not be negative".into()));
        }

        if self.assets.fetch_timeout_seconds == 0 {
            return Err(AppError::Config(
                "assets.fetch_timeout_seconds must be greater than zero".into(),
            ));
        }

        if self.public_host.trim().is_empty() || self.public_host.contains('/') {
            return Err(AppError::Config(
                "public_host must be a bare host[:port]".into(),
            ));
        }

        Ok(())
    }
}
