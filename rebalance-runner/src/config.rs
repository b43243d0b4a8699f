//! TOML run configuration.
//!
//! ```toml
//! [portfolio]
//! max_open_positions = 5
//! default_weight = 0.2      # optional, 1 / max_open_positions when omitted
//! profit_lock_in = 0.06
//! loss_lock_in = -0.02
//!
//! [screen]                  # optional
//! min_score = 0.25
//! top_n = 5
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use rebalance_core::{Policy, PolicyError};

use crate::screen::ScreenConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(#[from] PolicyError),

    #[error("invalid screen config: {0}")]
    InvalidScreen(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PortfolioSection {
    pub max_open_positions: usize,
    #[serde(default)]
    pub default_weight: Option<f64>,
    pub profit_lock_in: f64,
    pub loss_lock_in: f64,
}

/// Complete run configuration as read from disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RebalanceConfig {
    pub portfolio: PortfolioSection,
    #[serde(default)]
    pub screen: ScreenConfig,
}

impl RebalanceConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate. A config that parses but fails validation is
    /// still an error: nothing downstream runs on a bad policy.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.policy()?;
        config.screen.validate().map_err(ConfigError::InvalidScreen)?;
        Ok(config)
    }

    pub fn policy(&self) -> Result<Policy, PolicyError> {
        let p = &self.portfolio;
        Policy::new(p.max_open_positions, p.default_weight, p.profit_lock_in, p.loss_lock_in)
    }

    /// Deterministic identifier for this configuration (BLAKE3 of canonical JSON).
    pub fn config_id(&self) -> String {
        // serde_json::Value orders object keys, which makes the encoding canonical
        let canonical = serde_json::to_value(self)
            .map(|v| v.to_string())
            .unwrap_or_default();
        blake3::hash(canonical.as_bytes()).to_hex().to_string()
    }
}
