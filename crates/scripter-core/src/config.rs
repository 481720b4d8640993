//! Engine configuration
//!
//! Every field has a default, so an empty document is a valid
//! configuration:
//!
//! ```toml
//! max-ancestry-depth = 64
//! default-environment = "default"
//! parent-separator = "=>"
//! ```

use crate::{Error, Result};
use scripter_fs::{ConfigStore, NormalizedPath};
use scripter_meta::DEFAULT_SEPARATOR;
use serde::{Deserialize, Serialize};

const DEFAULT_MAX_ANCESTRY_DEPTH: usize = 64;
const DEFAULT_ENVIRONMENT: &str = "default";

/// Tuning knobs for a [`SignalResolver`](crate::SignalResolver)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EngineConfig {
    /// Longest parent chain accepted before resolution fails
    pub max_ancestry_depth: usize,

    /// Environment name that skips context and step resolution
    pub default_environment: String,

    /// Token between location and name in a parent reference
    pub parent_separator: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_ancestry_depth: DEFAULT_MAX_ANCESTRY_DEPTH,
            default_environment: DEFAULT_ENVIRONMENT.to_string(),
            parent_separator: DEFAULT_SEPARATOR.to_string(),
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from TOML content
    ///
    /// # Example
    ///
    /// ```
    /// use scripter_core::EngineConfig;
    ///
    /// let config = EngineConfig::parse("max-ancestry-depth = 8").unwrap();
    /// assert_eq!(config.max_ancestry_depth, 8);
    /// assert_eq!(config.default_environment, "default");
    /// ```
    pub fn parse(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file in any format `ConfigStore` understands.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        tracing::debug!(%path, "Loading engine config");
        let config: EngineConfig = ConfigStore::new().load(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_ancestry_depth == 0 {
            return Err(Error::InvalidConfig {
                message: "max-ancestry-depth must be at least 1".to_string(),
            });
        }
        if self.parent_separator.trim().is_empty() {
            return Err(Error::InvalidConfig {
                message: "parent-separator must not be blank".to_string(),
            });
        }
        Ok(())
    }
}
