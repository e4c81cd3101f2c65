//! Tests for CLI vs TOML precedence rules.

use std::time::Duration;

use crate::network::AddressFamily;

use super::*;

const FILE: &str = r#"
    [monitor]
    interface = "Ethernet"
    family = "ipv4"
    retry_interval_ms = 2000
    max_retries = 3
"#;

mod cli_precedence {
    use super::*;

    #[test]
    fn cli_interface_overrides_toml() {
        let cli = cli(&["--interface", "Wi-Fi"]);

        let config = ValidatedConfig::from_raw(&cli, Some(&toml(FILE))).unwrap();

        assert_eq!(config.interface, "Wi-Fi");
    }

    #[test]
    fn cli_family_overrides_toml() {
        let cli = cli(&["--family", "ipv6"]);

        let config = ValidatedConfig::from_raw(&cli, Some(&toml(FILE))).unwrap();

        assert_eq!(config.family, AddressFamily::V6);
    }

    #[test]
    fn cli_retry_options_override_toml() {
        let cli = cli(&["--retry-interval", "100", "--max-retries", "9"]);

        let config = ValidatedConfig::from_raw(&cli, Some(&toml(FILE))).unwrap();

        assert_eq!(config.retry_policy.interval(), Duration::from_millis(100));
        assert_eq!(config.retry_policy.max_retries(), 9);
    }

    #[test]
    fn cli_family_skips_invalid_toml_family() {
        let cli = cli(&["--family", "any"]);
        let toml = toml(
            r#"
            [monitor]
            interface = "Ethernet"
            family = "bogus"
        "#,
        );

        let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();

        assert_eq!(config.family, AddressFamily::Any);
    }
}

mod toml_fallback {
    use super::*;

    #[test]
    fn toml_values_apply_without_cli() {
        let config = ValidatedConfig::from_raw(&cli(&[]), Some(&toml(FILE))).unwrap();

        assert_eq!(config.interface, "Ethernet");
        assert_eq!(config.family, AddressFamily::V4);
        assert_eq!(config.retry_policy.interval(), Duration::from_secs(2));
        assert_eq!(config.retry_policy.max_retries(), 3);
    }

    #[test]
    fn partial_retry_settings_fall_back_to_defaults() {
        let toml = toml(
            r#"
            [monitor]
            interface = "Ethernet"
            family = "ipv4"
            max_retries = 4
        "#,
        );

        let config = ValidatedConfig::from_raw(&cli(&[]), Some(&toml)).unwrap();

        assert_eq!(config.retry_policy.interval(), Duration::from_millis(500));
        assert_eq!(config.retry_policy.max_retries(), 4);
    }
}

mod boolean_flags {
    use super::*;

    #[test]
    fn json_from_cli() {
        let config = ValidatedConfig::from_raw(&cli(&["--json"]), Some(&toml(FILE))).unwrap();

        assert!(config.json);
    }

    #[test]
    fn json_from_toml() {
        let toml = toml(&format!("{FILE}\n[output]\njson = true\n"));

        let config = ValidatedConfig::from_raw(&cli(&[]), Some(&toml)).unwrap();

        assert!(config.json);
    }

    #[test]
    fn json_defaults_to_text() {
        let config = ValidatedConfig::from_raw(&cli(&[]), Some(&toml(FILE))).unwrap();

        assert!(!config.json);
    }

    #[test]
    fn verbose_comes_from_cli_only() {
        let config = ValidatedConfig::from_raw(&cli(&["-v"]), Some(&toml(FILE))).unwrap();

        assert!(config.verbose);
    }
}
