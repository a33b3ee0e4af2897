use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::constants;

/// Client configuration, read once at startup.
///
/// A missing config file is not an error: every field falls back to its
/// default, so a fresh install runs without any setup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Directory holding client data (read-status map)
    pub config_dir: PathBuf,
    /// Seconds between consecutive inbound polling cycles
    pub poll_backoff_secs: u64,
    pub server_host: String,
    pub server_port: u16,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            config_dir: home.join(constants::CLIENT_DATA_DIR),
            poll_backoff_secs: constants::DEFAULT_POLL_BACKOFF_SECS,
            server_host: constants::DEFAULT_SERVER_HOST.to_string(),
            server_port: constants::DEFAULT_SERVER_PORT,
        }
    }
}

impl ClientConfig {
    /// Default location of the config file (`~/.carrier.json`).
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(constants::CLIENT_CONFIG_FILE)
    }

    /// Load the configuration from `path`, or the defaults when the file
    /// does not exist. An unreadable or unparsable file is an error.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config = serde_json::from_str(&data)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(config)
    }

    /// Write the configuration to `path` as pretty-printed JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let data = serde_json::to_string_pretty(self)?;
        fs::write(path, data)
            .with_context(|| format!("writing config file {}", path.display()))?;
        Ok(())
    }

    pub fn poll_backoff(&self) -> Duration {
        Duration::from_secs(self.poll_backoff_secs)
    }

    /// `host:port` endpoint string for the transport layer.
    pub fn server_endpoint(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
