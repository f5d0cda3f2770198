//! User configuration for vidchat.
//!
//! Read from `$XDG_CONFIG_HOME/vidchat/config.toml` (or `~/.config/vidchat/config.toml`).
//! Every key is optional; a missing file means all defaults.
//!
//! ```toml
//! api_base_url = "http://localhost:8001"
//! theme = "catppuccin-mocha"
//! request_timeout_secs = 300
//! log_dir = "/tmp/vidchat-logs"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;
use vidchat_core::gateway::DEFAULT_BASE_URL;
use vidchat_core::GatewayConfig;

/// Environment variable that overrides `api_base_url`.
pub const BACKEND_URL_ENV: &str = "VIDCHAT_BACKEND_URL";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub theme: String,
    /// Absent means requests are never timed out client-side; analysis can take minutes.
    pub request_timeout_secs: Option<u64>,
    pub log_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_owned(),
            theme: "catppuccin-mocha".to_owned(),
            request_timeout_secs: None,
            log_dir: default_log_dir(),
        }
    }
}

impl Config {
    /// Reads `path`. `Ok(None)` when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the file exists but cannot be read or is not valid TOML.
    pub fn load(path: &Path) -> anyhow::Result<Option<Self>> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
        };
        let config = toml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
        Ok(Some(config))
    }

    /// Applies `VIDCHAT_BACKEND_URL` when it is set and non-empty.
    pub fn with_env_override(mut self, value: Option<String>) -> Self {
        if let Some(url) = value.filter(|v| !v.trim().is_empty()) {
            self.api_base_url = url;
        }
        self
    }

    pub fn gateway(&self) -> GatewayConfig {
        GatewayConfig::new(self.api_base_url.clone())
            .with_timeout(self.request_timeout_secs.map(Duration::from_secs))
    }
}

fn xdg_dir(var: &str, home_fallback: &str) -> PathBuf {
    std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(home_fallback)))
        .unwrap_or_else(|| PathBuf::from(home_fallback))
}

/// `$XDG_CONFIG_HOME/vidchat/config.toml`, falling back to `~/.config`.
pub fn config_path() -> PathBuf {
    xdg_dir("XDG_CONFIG_HOME", ".config").join("vidchat").join("config.toml")
}

fn default_log_dir() -> PathBuf {
    xdg_dir("XDG_STATE_HOME", ".local/state").join("vidchat")
}
