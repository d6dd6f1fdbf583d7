//! Configuration for valcache.

use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

use crate::{ValcacheError, ValcacheResult};

/// Number of entries a store keeps when no `max` is configured.
pub const DEFAULT_MAX_ENTRIES: usize = 1000;

/// Main configuration for valcache.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
}

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format (text, json).
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

/// Cache settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Enabled. Only consulted by the CLI; stores ignore it.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Maximum number of entries.
    ///
    /// `None` means the key was omitted and [`DEFAULT_MAX_ENTRIES`] applies.
    /// `Some(None)` records an explicit `null`, which is rejected.
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub max: Option<Option<f64>>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max: None,
        }
    }
}

fn default_true() -> bool {
    true
}

fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Option<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<f64>::deserialize(deserializer).map(Some)
}

impl CacheConfig {
    /// Cache settings with an explicit maximum.
    pub fn with_max(max: f64) -> Self {
        Self {
            max: Some(Some(max)),
            ..Self::default()
        }
    }

    /// Resolves the configured maximum.
    ///
    /// Fails with [`ValcacheError::InvalidMaxSize`] for `null`, non-finite,
    /// zero, negative or fractional values.
    pub fn max_entries(&self) -> ValcacheResult<usize> {
        match self.max {
            None => Ok(DEFAULT_MAX_ENTRIES),
            Some(Some(max)) if max.is_finite() && max >= 1.0 && max.fract() == 0.0 => {
                Ok(max as usize)
            }
            Some(_) => Err(ValcacheError::InvalidMaxSize),
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> ValcacheResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values serde cannot reject on its own.
    pub fn validate(&self) -> ValcacheResult<()> {
        if !matches!(self.general.log_format.as_str(), "text" | "json") {
            return Err(ValcacheError::config(format!(
                "unknown log_format '{}' (expected text or json)",
                self.general.log_format
            )));
        }
        self.cache.max_entries()?;
        Ok(())
    }

    /// Saves configuration to a TOML file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> ValcacheResult<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Creates default configuration.
    pub fn default_config() -> Self {
        Self {
            general: GeneralConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}
