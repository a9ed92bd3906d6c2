use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use serde::Deserialize;

use crate::ip::{DEFAULT_IPV4_URL, DEFAULT_IPV6_URL};

/// Optional overrides; every field has a built-in default.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub lookup: LookupConfig,
    #[serde(default)]
    pub route53: Route53Config,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LookupConfig {
    #[serde(default = "default_ipv4_url")]
    pub ipv4_url: String,
    #[serde(default = "default_ipv6_url")]
    pub ipv6_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_ipv4_url() -> String {
    DEFAULT_IPV4_URL.to_string()
}

fn default_ipv6_url() -> String {
    DEFAULT_IPV6_URL.to_string()
}

fn default_timeout() -> u64 {
    10
}

impl LookupConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            ipv4_url: default_ipv4_url(),
            ipv6_url: default_ipv6_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Route53Config {
    /// Falls back to the AWS region chain, then us-east-1
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub endpoint_url: Option<String>,
}

impl Settings {
    /// Load from `path` if given, else from the default location if it
    /// exists, else use the built-in defaults.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = Self::config_path();
                if default_path.exists() {
                    Self::load(&default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        ensure!(
            settings.lookup.timeout_seconds > 0,
            "Invalid config file {}: lookup.timeout_seconds must be greater than zero",
            path.display()
        );

        Ok(settings)
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    pub fn config_dir() -> PathBuf {
        #[cfg(unix)]
        {
            PathBuf::from("/etc/r53up")
        }
        #[cfg(windows)]
        {
            PathBuf::from(r"C:\ProgramData\r53up")
        }
    }
}
