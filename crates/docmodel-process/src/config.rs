//! Cache configuration

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Process instance cache configuration
///
/// ```toml
/// max_capacity = 500
/// time_to_idle_secs = 1800
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of cached instances
    pub max_capacity: u64,
    /// Evict instances not accessed for this many seconds; `None` disables
    pub time_to_idle_secs: Option<u64>,
}

impl CacheConfig {
    /// With maximum number of cached instances
    #[inline]
    #[must_use]
    pub fn with_max_capacity(mut self, max_capacity: u64) -> Self {
        self.max_capacity = max_capacity;
        self
    }

    /// With idle expiry
    #[inline]
    #[must_use]
    pub fn with_time_to_idle(mut self, time_to_idle: Duration) -> Self {
        self.time_to_idle_secs = Some(time_to_idle.as_secs());
        self
    }

    /// Without idle expiry
    #[inline]
    #[must_use]
    pub fn without_time_to_idle(mut self) -> Self {
        self.time_to_idle_secs = None;
        self
    }

    /// Idle expiry as duration
    #[inline]
    #[must_use]
    pub fn time_to_idle(&self) -> Option<Duration> {
        self.time_to_idle_secs.map(Duration::from_secs)
    }

    /// Parse from TOML text; missing keys take defaults
    ///
    /// # Errors
    /// Returns error on malformed TOML or invalid values
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let toml = std::fs::read_to_string(path)?;
        Self::from_toml_str(&toml)
    }

    /// Check value ranges
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] on zero capacity or zero idle time
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_capacity == 0 {
            return Err(ConfigError::Invalid("max_capacity must be positive".to_string()));
        }
        if self.time_to_idle_secs == Some(0) {
            return Err(ConfigError::Invalid(
                "time_to_idle_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 1_000,
            time_to_idle_secs: Some(3_600),
        }
    }
}
