//! Bridge configuration.
//!
//! [`BridgeConfig`] collects the tunables of the accessibility bridge. It can
//! be built programmatically with [`BridgeConfigBuilder`] or loaded from TOML:
//!
//! ```
//! use horizon_semantics_core::BridgeConfig;
//!
//! let config = BridgeConfig::from_toml_str(r#"
//!     log_tree = true
//!     tree_style = "ascii"
//! "#).unwrap();
//! assert!(config.log_tree);
//! assert_eq!(config.scroll_extent_for_infinity, 100_000.0);
//! ```
//!
//! Missing keys fall back to their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::logging::TreeStyle;

/// Scroll extent reported to the host in place of an infinite extent.
pub const DEFAULT_SCROLL_EXTENT_FOR_INFINITY: f32 = 100_000.0;

/// Cap applied to the scroll position when an extent is infinite.
pub const DEFAULT_SCROLL_POSITION_CAP_FOR_INFINITY: f32 = 70_000.0;

/// Configuration for the accessibility bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Extent substituted for an infinite scroll extent.
    pub scroll_extent_for_infinity: f32,
    /// Maximum scroll position reported while an extent is infinite.
    pub scroll_position_cap_for_infinity: f32,
    /// Dump the semantics tree at debug level after every update.
    pub log_tree: bool,
    /// Style of the tree dump.
    pub tree_style: TreeStyle,
    /// Check thread affinity in release builds too.
    pub enforce_thread_affinity: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            scroll_extent_for_infinity: DEFAULT_SCROLL_EXTENT_FOR_INFINITY,
            scroll_position_cap_for_infinity: DEFAULT_SCROLL_POSITION_CAP_FOR_INFINITY,
            log_tree: false,
            tree_style: TreeStyle::default(),
            enforce_thread_affinity: false,
        }
    }
}

impl BridgeConfig {
    /// Create a builder starting from the defaults.
    pub fn builder() -> BridgeConfigBuilder {
        BridgeConfigBuilder::default()
    }

    /// Parse and validate a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration from a TOML file.
    pub fn load_toml(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(
            target: "horizon_semantics::bridge",
            path = %path.display(),
            "loaded bridge configuration"
        );
        Ok(config)
    }

    /// Serialize the configuration as pretty TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check that the scroll substitution values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.scroll_extent_for_infinity.is_finite() || self.scroll_extent_for_infinity <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "scroll_extent_for_infinity",
                reason: format!(
                    "must be finite and positive, got {}",
                    self.scroll_extent_for_infinity
                ),
            });
        }
        if !self.scroll_position_cap_for_infinity.is_finite()
            || self.scroll_position_cap_for_infinity <= 0.0
            || self.scroll_position_cap_for_infinity > self.scroll_extent_for_infinity
        {
            return Err(ConfigError::Invalid {
                field: "scroll_position_cap_for_infinity",
                reason: format!(
                    "must be positive and no larger than {}, got {}",
                    self.scroll_extent_for_infinity, self.scroll_position_cap_for_infinity
                ),
            });
        }
        Ok(())
    }
}

/// Builder for [`BridgeConfig`].
#[derive(Debug, Clone, Default)]
pub struct BridgeConfigBuilder {
    config: BridgeConfig,
}

impl BridgeConfigBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the extent substituted for infinite scroll extents.
    pub fn scroll_extent_for_infinity(mut self, extent: f32) -> Self {
        self.config.scroll_extent_for_infinity = extent;
        self
    }

    /// Set the position cap applied while an extent is infinite.
    pub fn scroll_position_cap_for_infinity(mut self, cap: f32) -> Self {
        self.config.scroll_position_cap_for_infinity = cap;
        self
    }

    /// Dump the tree after every update.
    pub fn log_tree(mut self, enabled: bool) -> Self {
        self.config.log_tree = enabled;
        self
    }

    /// Set the tree dump style.
    pub fn tree_style(mut self, style: TreeStyle) -> Self {
        self.config.tree_style = style;
        self
    }

    /// Enforce thread affinity in release builds.
    pub fn enforce_thread_affinity(mut self, enforce: bool) -> Self {
        self.config.enforce_thread_affinity = enforce;
        self
    }

    /// Validate and return the configuration.
    pub fn build(self) -> Result<BridgeConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
