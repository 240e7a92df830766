use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Lowest accepted `rotation_interval_secs`.
pub const ROTATION_INTERVAL_MIN_SECS: u64 = 30;
/// Highest accepted `rotation_interval_secs`.
pub const ROTATION_INTERVAL_MAX_SECS: u64 = 600;

const DEFAULT_ROTATION_INTERVAL_SECS: u64 = 60;
const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

const ENV_TAGS: &str = "VANTAGE_TAGS";
const ENV_ROTATION_INTERVAL: &str = "VANTAGE_ROTATION_INTERVAL_SECS";
const ENV_POLL_INTERVAL: &str = "VANTAGE_POLL_INTERVAL_SECS";

/// Recognized collection options.
///
/// Unrecognized keys in a configuration file are rejected by the TOML layer;
/// out-of-range values fail [`validate`](Config::validate) instead of being
/// clamped.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Comma separated `key=value` pairs merged into every metric's tag set
    /// at catalog-build time.
    pub tags: Option<String>,
    /// Seconds between parallel-counter peak rotations. Must lie within
    /// [`ROTATION_INTERVAL_MIN_SECS`]..=[`ROTATION_INTERVAL_MAX_SECS`].
    pub rotation_interval_secs: u64,
    /// Seconds between refreshes of attribute-backed metrics.
    pub attribute_poll_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tags: None,
            rotation_interval_secs: DEFAULT_ROTATION_INTERVAL_SECS,
            attribute_poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
        }
    }
}

impl Config {
    pub fn rotation_interval(&self) -> Duration {
        Duration::from_secs(self.rotation_interval_secs)
    }

    pub fn attribute_poll_interval(&self) -> Duration {
        Duration::from_secs(self.attribute_poll_interval_secs)
    }

    /// Parse the global tag list. Each entry must be `key=value` with a
    /// non-empty key.
    pub fn global_tags(&self) -> Result<BTreeMap<String, String>> {
        let mut tags = BTreeMap::new();
        let Some(raw) = self.tags.as_deref() else {
            return Ok(tags);
        };
        for entry in raw.split(',') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            let Some((key, value)) = entry.split_once('=') else {
                return Err(ConfigError::MalformedTag { tag: entry.into() }.into());
            };
            let key = key.trim();
            if key.is_empty() {
                return Err(ConfigError::MalformedTag { tag: entry.into() }.into());
            }
            tags.insert(key.to_string(), value.trim().to_string());
        }
        Ok(tags)
    }

    /// Load configuration from a TOML file.
    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(&path).map_err(|_| ConfigError::FileNotFound {
                path: path.as_ref().display().to_string(),
            })?;
        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::InvalidFormat {
            message: e.to_string(),
        })?;
        Ok(config)
    }

    /// Build a configuration from defaults plus environment overrides.
    pub fn load_from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Apply `VANTAGE_*` environment overrides on top of this configuration.
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(tags) = std::env::var(ENV_TAGS) {
            self.tags = Some(tags);
        }
        if let Some(seconds) = read_env_u64(ENV_ROTATION_INTERVAL)? {
            self.rotation_interval_secs = seconds;
        }
        if let Some(seconds) = read_env_u64(ENV_POLL_INTERVAL)? {
            self.attribute_poll_interval_secs = seconds;
        }
        Ok(())
    }
}

fn read_env_u64(variable: &str) -> Result<Option<u64>> {
    match std::env::var(variable) {
        Ok(raw) => {
            let value = raw
                .trim()
                .parse::<u64>()
                .map_err(|e| ConfigError::EnvironmentVariable {
                    variable: variable.to_string(),
                    message: e.to_string(),
                })?;
            Ok(Some(value))
        }
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.rotation_interval_secs, 60);
        assert_eq!(config.attribute_poll_interval_secs, 30);
        assert!(config.tags.is_none());
    }

    #[test]
    fn tags_parse_into_pairs() {
        let config = Config {
            tags: Some("app=shop, tier=web".into()),
            ..Config::default()
        };
        let tags = config.global_tags().unwrap();
        assert_eq!(tags.get("app").map(String::as_str), Some("shop"));
        assert_eq!(tags.get("tier").map(String::as_str), Some("web"));
    }

    #[test]
    fn malformed_tag_is_rejected() {
        let config = Config {
            tags: Some("app=shop,bogus".into()),
            ..Config::default()
        };
        assert!(config.global_tags().is_err());
    }
}
