//! Explorer Configuration
//!
//! Supports config files, environment variables and CLI overrides.
//!
//! Sources, later ones winning:
//!
//! 1. built-in defaults
//! 2. an explicit config file, then `config/default` and `config/local`
//! 3. `STEEXP__`-prefixed environment variables (`STEEXP__HORIZON__NETWORK=testnet`)

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use steexp_horizon::HorizonConfig;
use steexp_types::Network;

use crate::anchors::AnchorRegistry;
use crate::error::Result;
use crate::view::ListSettings;

/// Explorer configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExplorerConfig {
    /// Data provider settings
    #[serde(default)]
    pub horizon: HorizonSettings,

    /// Anchor table settings
    #[serde(default)]
    pub anchors: AnchorSettings,

    /// History sub-list settings
    #[serde(default)]
    pub lists: ListSettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Data provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HorizonSettings {
    /// Network whose public Horizon is used
    #[serde(default)]
    pub network: Network,

    /// Explicit Horizon URL, overriding the network's
    #[serde(default)]
    pub url: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for HorizonSettings {
    fn default() -> Self {
        Self {
            network: Network::default(),
            url: None,
            timeout_secs: default_timeout(),
        }
    }
}

impl HorizonSettings {
    /// Base URL in effect
    pub fn base_url(&self) -> String {
        self.url
            .clone()
            .unwrap_or_else(|| self.network.horizon_url().to_string())
    }

    /// Client configuration for these settings
    pub fn client_config(&self) -> HorizonConfig {
        HorizonConfig {
            base_url: self.base_url(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

/// Anchor table settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnchorSettings {
    /// External anchor table; the bundled table when absent
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl AnchorSettings {
    /// Build the registry these settings point at
    pub fn registry(&self) -> Arc<AnchorRegistry> {
        match &self.path {
            Some(path) => Arc::new(AnchorRegistry::load_or_empty(path)),
            None => AnchorRegistry::bundled(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error, off)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (pretty, json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

// =============================================================================
// Configuration Loading
// =============================================================================

impl ExplorerConfig {
    /// Load configuration from environment and optional config file
    ///
    /// `.env` is not read here; binaries load it before calling this.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        builder = builder
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("STEEXP")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;

        let explorer_config = config.try_deserialize().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "Using default configuration");
            ExplorerConfig::default()
        });

        Ok(explorer_config)
    }
}
