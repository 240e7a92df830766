#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use vantage_collector::catalog::Registry;
    use vantage_collector::config::Config;
    use vantage_collector::error::{CollectorError, ConfigError};
    use vantage_collector::mock::MockAttributeSource;
    use vantage_collector::services::CollectionService;

    #[tokio::test]
    async fn out_of_range_rotation_interval_fails_before_any_task_starts() {
        let registry = Arc::new(Registry::new());
        let source = Arc::new(MockAttributeSource::new());
        let config = Config {
            rotation_interval_secs: 15,
            ..Config::default()
        };

        let err = CollectionService::new(registry, source, config).unwrap_err();
        assert!(matches!(
            err,
            CollectorError::Config(ConfigError::InvalidRotationInterval { seconds: 15, .. })
        ));
    }

    #[tokio::test]
    async fn in_range_rotation_interval_is_accepted() {
        let registry = Arc::new(Registry::new());
        let source = Arc::new(MockAttributeSource::new());
        let config = Config {
            rotation_interval_secs: 60,
            ..Config::default()
        };

        assert!(CollectionService::new(registry, source, config).is_ok());
    }

    #[test]
    fn config_file_round_trips_recognized_options() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "tags = \"app=shop,tier=web\"\nrotation_interval_secs = 120\nattribute_poll_interval_secs = 15"
        )
        .unwrap();

        let config = Config::load_from_file(file.path()).unwrap();
        assert_eq!(config.rotation_interval_secs, 120);
        assert_eq!(config.attribute_poll_interval_secs, 15);
        let tags = config.global_tags().unwrap();
        assert_eq!(tags.get("app").map(String::as_str), Some("shop"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unrecognized_option_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "poll_interval = 15").unwrap();

        let err = Config::load_from_file(file.path()).unwrap_err();
        assert!(matches!(
            err,
            CollectorError::Config(ConfigError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn missing_config_file_is_reported() {
        let err = Config::load_from_file("/nonexistent/vantage.toml").unwrap_err();
        assert!(matches!(
            err,
            CollectorError::Config(ConfigError::FileNotFound { .. })
        ));
    }

    // One test owns the VANTAGE_* variables; splitting it would let the
    // parallel test runner interleave the mutations.
    #[test]
    fn environment_overrides_are_applied_and_validated() {
        std::env::set_var("VANTAGE_ROTATION_INTERVAL_SECS", "90");
        std::env::set_var("VANTAGE_TAGS", "env=staging");

        let config = Config::load_from_env().unwrap();
        assert_eq!(config.rotation_interval_secs, 90);
        assert_eq!(
            config.global_tags().unwrap().get("env").map(String::as_str),
            Some("staging")
        );

        std::env::set_var("VANTAGE_POLL_INTERVAL_SECS", "soon");
        let err = Config::load_from_env().unwrap_err();
        assert!(matches!(
            err,
            CollectorError::Config(ConfigError::EnvironmentVariable { .. })
        ));

        std::env::remove_var("VANTAGE_ROTATION_INTERVAL_SECS");
        std::env::remove_var("VANTAGE_TAGS");
        std::env::remove_var("VANTAGE_POLL_INTERVAL_SECS");
    }
}
