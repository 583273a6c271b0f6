//! Configuration loading for CBI modules
//!
//! Resolution follows the priority order used across CBI:
//! 1. Explicit path handed in by the binary (usually a clap argument)
//! 2. `CBI_CONFIG` environment variable
//! 3. Platform config directory (`<config_dir>/cbi/config.toml`)
//! 4. Compiled defaults
//!
//! Individual values (port, services base URL) can additionally be overridden
//! per-binary through clap/env arguments; that layering is the binary's job.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Top-level TOML configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub server: ServerConfig,
    pub services: ServicesConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Port the inspection service listens on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 5750 }
    }
}

/// External service endpoints
///
/// The three collaborators (airline lookup, barcode recognition, inspection
/// registration) share one base URL; the request paths are fixed by the
/// service contracts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicesConfig {
    /// Base URL of the backend hosting the three service endpoints
    pub base_url: String,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
    /// Total per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:6060".to_string(),
            connect_timeout_secs: 5,
            request_timeout_secs: 15,
        }
    }
}

impl ServicesConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl TomlConfig {
    /// Load configuration following the resolution priority order
    ///
    /// A missing file at any priority level falls through to the next; a file
    /// that exists but fails to parse is an error (silent fallback would hide
    /// operator mistakes).
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        if let Ok(env_path) = std::env::var("CBI_CONFIG") {
            return Self::from_file(Path::new(&env_path));
        }

        if let Some(default_path) = Self::default_config_path() {
            if default_path.exists() {
                return Self::from_file(&default_path);
            }
        }

        Ok(Self::default())
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::debug!("Loading config from {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Cannot read config file {}: {}", path.display(), e))
        })?;
        toml::from_str(&content).map_err(|e| {
            Error::Config(format!("Cannot parse config file {}: {}", path.display(), e))
        })
    }

    /// Platform default config path (`<config_dir>/cbi/config.toml`)
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("cbi").join("config.toml"))
    }
}
