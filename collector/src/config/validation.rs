use crate::config::types::{
    Config, ROTATION_INTERVAL_MAX_SECS, ROTATION_INTERVAL_MIN_SECS,
};
use crate::error::{ConfigError, Result};

impl Config {
    /// Validate every recognized option.
    ///
    /// Out-of-range values fail here rather than being clamped, and this runs
    /// before any periodic activity is started.
    pub fn validate(&self) -> Result<()> {
        if self.rotation_interval_secs < ROTATION_INTERVAL_MIN_SECS
            || self.rotation_interval_secs > ROTATION_INTERVAL_MAX_SECS
        {
            return Err(ConfigError::InvalidRotationInterval {
                seconds: self.rotation_interval_secs,
                min: ROTATION_INTERVAL_MIN_SECS,
                max: ROTATION_INTERVAL_MAX_SECS,
            }
            .into());
        }

        if self.attribute_poll_interval_secs == 0 {
            return Err(ConfigError::InvalidPollInterval {
                seconds: self.attribute_poll_interval_secs,
            }
            .into());
        }

        // Surface malformed tags at configuration time, not at catalog build.
        self.global_tags()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CollectorError;

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn rotation_interval_bounds_are_inclusive() {
        for seconds in [30, 60, 600] {
            let config = Config {
                rotation_interval_secs: seconds,
                ..Config::default()
            };
            assert!(config.validate().is_ok(), "{seconds}s should be accepted");
        }
        for seconds in [0, 15, 29, 601] {
            let config = Config {
                rotation_interval_secs: seconds,
                ..Config::default()
            };
            assert!(
                matches!(
                    config.validate(),
                    Err(CollectorError::Config(
                        ConfigError::InvalidRotationInterval { .. }
                    ))
                ),
                "{seconds}s should be rejected"
            );
        }
    }

    #[test]
    fn zero_poll_interval_is_rejected() {
        let config = Config {
            attribute_poll_interval_secs: 0,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(CollectorError::Config(ConfigError::InvalidPollInterval { .. }))
        ));
    }
}
