//! Configuration management for the delivery desk
//!
//! This module handles loading, parsing, and validation of configuration files.

use crate::constants::{
    API_DEFAULT_BASE_URL, API_DEFAULT_TIMEOUT_SECS, API_TOKEN_DEFAULT_ENV, CONFIG_DIR_NAME, CONFIG_FILE_NAME,
    CONFIG_GENERATED, DEFAULT_PLACEHOLDER, IMAGE_CACHE_DEFAULT_CAPACITY, IMAGE_CACHE_DEFAULT_TTL_SECS,
    IMAGE_PROBE_DEFAULT_TIMEOUT_SECS,
};
use crate::utils::datetime;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub images: ImageConfig,
    pub logging: LoggingConfig,
}

/// Delivery API connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every endpoint path is resolved against
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Environment variable holding the bearer token (unset = anonymous)
    pub api_token_env: Option<String>,
}

/// Product image settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Image shown when a product image is missing or broken
    pub placeholder_url: String,
    /// Maximum number of URLs remembered as loadable
    pub cache_capacity: usize,
    /// Seconds a loadable URL is trusted before being probed again
    pub cache_ttl_secs: u64,
    /// Seconds before an image probe gives up
    pub probe_timeout_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Write log lines to stderr or `file`; the in-memory buffer is always on
    pub enabled: bool,
    /// Level filter: off, error, warn, info, debug or trace
    pub level: String,
    /// Append to this file instead of stderr
    pub file: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: API_DEFAULT_BASE_URL.to_string(),
            timeout_secs: API_DEFAULT_TIMEOUT_SECS,
            api_token_env: Some(API_TOKEN_DEFAULT_ENV.to_string()),
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            placeholder_url: DEFAULT_PLACEHOLDER.to_string(),
            cache_capacity: IMAGE_CACHE_DEFAULT_CAPACITY,
            cache_ttl_secs: IMAGE_CACHE_DEFAULT_TTL_SECS,
            probe_timeout_secs: IMAGE_PROBE_DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: "info".to_string(),
            file: None,
        }
    }
}

impl ApiConfig {
    /// Read the bearer token from the configured environment variable
    pub fn api_token(&self) -> Option<String> {
        self.api_token_env
            .as_deref()
            .and_then(|var| std::env::var(var).ok())
            .filter(|token| !token.is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl LoggingConfig {
    pub fn level_filter(&self) -> Result<log::LevelFilter> {
        self.level
            .parse::<log::LevelFilter>()
            .with_context(|| format!("Invalid logging level '{}'", self.level))
    }
}

impl Config {
    /// Load configuration from file or return defaults
    pub fn load() -> Result<Self> {
        let config_path = Self::find_config_file()?;

        if let Some(path) = config_path {
            Self::load_from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Find configuration file in order of precedence
    fn find_config_file() -> Result<Option<PathBuf>> {
        // 1. Check current directory
        let current_dir_config = PathBuf::from(CONFIG_FILE_NAME);
        if current_dir_config.exists() {
            return Ok(Some(current_dir_config));
        }

        // 2. Check XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join(CONFIG_DIR_NAME).join("config.toml");
            if xdg_config.exists() {
                return Ok(Some(xdg_config));
            }
        }

        Ok(None)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        crate::api::parse_base_url(&self.api.base_url).context("Invalid api.base_url")?;

        if self.api.timeout_secs == 0 {
            anyhow::bail!("api.timeout_secs must be greater than 0");
        }

        if let Some(var) = &self.api.api_token_env {
            if var.is_empty() {
                anyhow::bail!("api.api_token_env cannot be empty (remove it to disable authentication)");
            }
        }

        reqwest::Url::parse(&self.images.placeholder_url)
            .with_context(|| format!("Invalid images.placeholder_url '{}'", self.images.placeholder_url))?;

        if self.images.cache_capacity == 0 {
            anyhow::bail!("images.cache_capacity must be greater than 0");
        }

        if self.images.cache_ttl_secs == 0 {
            anyhow::bail!("images.cache_ttl_secs must be greater than 0");
        }

        if self.images.probe_timeout_secs == 0 {
            anyhow::bail!("images.probe_timeout_secs must be greater than 0");
        }

        self.logging.level_filter()?;

        Ok(())
    }

    /// Generate default configuration file
    pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
        let config = Self::default();
        let toml_content = toml::to_string_pretty(&config).context("Failed to serialize default config")?;

        // Add header comment
        let header = format!(
            "# Delivery Desk Configuration File\n# Generated on {}\n\n",
            datetime::ect_today_string()
        );

        let full_content = header + &toml_content;

        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        std::fs::write(&path, full_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        println!("{}: {}", CONFIG_GENERATED, path.as_ref().display());
        Ok(())
    }

    /// Get the XDG config directory path
    pub fn get_xdg_config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
            .map(|dir| dir.join(CONFIG_DIR_NAME))
    }

    /// Get the default config file path
    pub fn get_default_config_path() -> Result<PathBuf> {
        Ok(Self::get_xdg_config_dir()?.join("config.toml"))
    }
}
