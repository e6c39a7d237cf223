//! TOML configuration for hawserctl.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use hawser_client::HawserConfig;
use serde::Deserialize;
use url::Url;

/// Top-level config file shape. Every section and field is optional;
/// missing values fall back to defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub api: ApiSection,
    pub gateways: GatewaySection,
    pub upload: UploadSection,
    pub cache: CacheSection,
    pub registry: RegistrySection,
    pub log: LogSection,
}

/// `[api]` section: the pinning endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ApiSection {
    /// Base URL of the pinning endpoint.
    pub endpoint: Option<String>,
    /// Bearer credential for uploads and pin management.
    pub token: Option<String>,
}

/// `[gateways]` section: retrieval gateways.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GatewaySection {
    /// Ordered gateway base URLs, most preferred first.
    pub urls: Vec<String>,
    /// Per-gateway fetch timeout in milliseconds.
    pub timeout_ms: Option<u64>,
}

/// `[upload]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UploadSection {
    /// Payloads above this many bytes are split into parts.
    pub chunk_size: Option<u32>,
    /// Maximum concurrent upload tasks.
    pub max_in_flight: Option<usize>,
}

/// `[cache]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CacheSection {
    /// How long retrieved payloads stay fresh, in milliseconds.
    pub max_age_ms: Option<u64>,
}

/// `[registry]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegistrySection {
    /// Directory for the pin registry database.
    pub path: Option<PathBuf>,
}

/// `[log]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// Log level filter, e.g. "info" or "hawser_client=debug".
    pub level: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl CliConfig {
    /// Load from a file, or all defaults when no path is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config file {}", path.display()))?;
                toml::from_str(&raw)
                    .with_context(|| format!("failed to parse config file {}", path.display()))
            }
            None => Ok(Self::default()),
        }
    }

    #[cfg(test)]
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    // ----- Effective values -----

    pub fn chunk_size(&self) -> u32 {
        self.upload.chunk_size.unwrap_or(10 * 1024 * 1024)
    }

    pub fn max_in_flight(&self) -> usize {
        self.upload.max_in_flight.unwrap_or(3)
    }

    pub fn gateway_timeout(&self) -> Duration {
        Duration::from_millis(self.gateways.timeout_ms.unwrap_or(30_000))
    }

    pub fn cache_max_age(&self) -> Duration {
        Duration::from_millis(self.cache.max_age_ms.unwrap_or(60 * 60 * 1000))
    }

    /// Registry directory, `~/.hawser/pins` unless configured.
    pub fn registry_path(&self) -> PathBuf {
        self.registry.path.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .map(|home| home.join(".hawser").join("pins"))
                .unwrap_or_else(|| PathBuf::from(".hawser/pins"))
        })
    }

    /// Client config assembled from the effective values.
    ///
    /// Fails when no gateways are configured or a gateway URL does not
    /// parse.
    pub fn to_client_config(&self) -> anyhow::Result<HawserConfig> {
        if self.gateways.urls.is_empty() {
            anyhow::bail!("no gateways configured; set [gateways] urls");
        }
        let mut gateways = Vec::with_capacity(self.gateways.urls.len());
        for raw in &self.gateways.urls {
            let url = Url::parse(raw).with_context(|| format!("invalid gateway url {raw:?}"))?;
            gateways.push(url);
        }
        Ok(HawserConfig {
            chunk_size: self.chunk_size(),
            max_in_flight: self.max_in_flight(),
            gateways,
            gateway_timeout: self.gateway_timeout(),
            cache_max_age: self.cache_max_age(),
        })
    }
}
