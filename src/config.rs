//! Configuration loaded from `~/.config/overlaykit/config.toml`.
//!
//! Every key is optional:
//!
//! ```toml
//! api_url = "http://localhost:5000/api"
//! connect_timeout_secs = 10
//! request_timeout_secs = 30
//!
//! [container]
//! width = 1280
//! height = 500
//!
//! [hls]
//! output_dir = "hls_streams"
//! segment_secs = 4
//! ```
//!
//! `OVERLAYKIT_API_URL` overrides `api_url`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::geometry::Rect;
use crate::hls::HlsConfig;
use crate::store::http::{StoreConfig, DEFAULT_API_URL};

/// Environment variable overriding the API base URL.
pub const API_URL_ENV: &str = "OVERLAYKIT_API_URL";

/// Video container dimensions used when clamping positions outside a live
/// front end.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 500.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HlsSection {
    pub output_dir: PathBuf,
    pub segment_secs: u32,
}

impl Default for HlsSection {
    fn default() -> Self {
        let defaults = HlsConfig::default();
        Self {
            output_dir: defaults.output_dir,
            segment_secs: defaults.segment_secs,
        }
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub container: ContainerConfig,
    pub hls: HlsSection,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
            container: ContainerConfig::default(),
            hls: HlsSection::default(),
        }
    }
}

impl Config {
    /// Load from the default location, then apply environment overrides.
    ///
    /// A missing file yields defaults.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&config_path())?;
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                config.api_url = url;
            }
        }
        Ok(config)
    }

    /// Load from `path`; defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        toml::from_str(&content).with_context(|| format!("invalid TOML in {}", path.display()))
    }

    #[must_use]
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            api_url: self.api_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    /// Container rect anchored at the origin.
    #[must_use]
    pub fn container(&self) -> Rect {
        Rect::sized(self.container.width, self.container.height)
    }

    #[must_use]
    pub fn hls_config(&self) -> HlsConfig {
        HlsConfig {
            output_dir: self.hls.output_dir.clone(),
            segment_secs: self.hls.segment_secs,
            ..HlsConfig::default()
        }
    }
}

/// Return the path to the config file.
#[must_use]
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("overlaykit")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.api_url, "http://localhost:5000/api");
    }

    #[test]
    fn parse_partial_config() {
        let toml_str = r#"
api_url = "https://overlays.example.com/api"

[container]
height = 720
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api_url, "https://overlays.example.com/api");
        assert_eq!(config.container(), Rect::sized(1280.0, 720.0));
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.hls.segment_secs, 4);
    }

    #[test]
    fn store_config_carries_timeouts() {
        let config: Config = toml::from_str("connect_timeout_secs = 2\nrequest_timeout_secs = 7").unwrap();
        let store = config.store_config();
        assert_eq!(store.connect_timeout, Duration::from_secs(2));
        assert_eq!(store.request_timeout, Duration::from_secs(7));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn invalid_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "api_url = [").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("invalid TOML"));
    }

    #[test]
    fn hls_section_maps_to_converter_config() {
        let config: Config = toml::from_str("[hls]\noutput_dir = \"/tmp/live\"\nsegment_secs = 6").unwrap();
        let hls = config.hls_config();
        assert_eq!(hls.output_dir, PathBuf::from("/tmp/live"));
        assert_eq!(hls.segment_secs, 6);
        assert_eq!(hls.list_size, 5);
    }
}
