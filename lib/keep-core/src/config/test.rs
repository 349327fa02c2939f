use std::path::PathBuf;

use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use super::core_config::*;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SystemConfig {
    pub database_url: String,
}

#[test]
#[cfg(feature = "config_yaml")]
fn test_parse_config_merges_inputs() {
    let config1 = indoc::indoc! {"
        app:
            databaseUrl: 'sqlite::memory:'
        backend:
            S3:
                type: 'S3'
                display: 'backend.s3'
                order: 1
            LOCAL:
                type: 'LOCAL'
                display: 'backend.local'
                order: 0
        mount:
            maxActivePerAgent: 3
    "};

    let config2 = indoc::indoc! {"
        backend:
            S3:
                enabled: false
        mount:
            basePath: '/mnt/keep'
        vault:
            encryptionKey: '93d9182795f0d1bec61329fc2d18c4b4c1b7e65e69e20ec30a2101a9875fff7e'
    "};

    let config = AppConfig::<SystemConfig>::from_yaml(vec![config1, config2]).unwrap();

    assert_eq!(config.app.database_url, "sqlite::memory:");
    assert!(!config.core.backend.get_fields("S3").unwrap().enabled());
    assert!(config.core.backend.get_if_enabled("LOCAL").is_ok());

    assert_eq!(config.core.mount.max_active_per_agent, 3);
    assert_eq!(config.core.mount.base_path, PathBuf::from("/mnt/keep"));
    // untouched sections keep their defaults
    assert_eq!(config.core.mount.default_timeout_minutes, 60);
    assert_eq!(config.core.restore.max_active_per_agent, 4);
    assert_eq!(config.core.diff.context_lines, 3);

    assert_eq!(
        config
            .core
            .vault
            .encryption_key
            .as_ref()
            .unwrap()
            .expose_secret(),
        "93d9182795f0d1bec61329fc2d18c4b4c1b7e65e69e20ec30a2101a9875fff7e"
    );
    assert!(config.core.vault.escrow_key.is_none());
}

#[test]
#[cfg(feature = "config_yaml")]
fn test_vault_keys_are_not_serialized() {
    let config = indoc::indoc! {"
        backend: {}
        vault:
            encryptionKey: 'secret'
    "};

    let config = AppConfig::<NoCustomConfig>::from_yaml(vec![config]).unwrap();
    let serialized = serde_json::to_value(&config).unwrap();

    assert!(serialized["core"].get("vault").is_none());
}

#[test]
#[cfg(feature = "config_yaml")]
fn test_parse_config_rejects_unknown_backend_type() {
    let config = indoc::indoc! {"
        backend:
            FTP:
                type: 'FTP'
                display: 'backend.ftp'
    "};

    assert!(matches!(
        AppConfig::<NoCustomConfig>::from_yaml(vec![config]),
        Err(super::ConfigParsingError::GeneralParsingError(_))
    ));
}

#[test]
#[cfg(feature = "config_yaml")]
fn test_parse_config_rejects_unknown_entry_field() {
    let config = indoc::indoc! {"
        backend:
            S3:
                type: 'S3'
                display: 'backend.s3'
                params:
                    public:
                        region: 'eu-central-1'
    "};

    assert!(matches!(
        AppConfig::<NoCustomConfig>::from_yaml(vec![config]),
        Err(super::ConfigParsingError::GeneralParsingError(_))
    ));
}

#[test]
#[cfg(feature = "config_yaml")]
fn test_parse_config_entry_fields() {
    let config = indoc::indoc! {"
        backend:
            S3:
                type: 'S3'
                display: 'backend.s3'
    "};

    let config = AppConfig::<NoCustomConfig>::from_yaml(vec![config]).unwrap();
    let fields = config.core.backend.get_fields("S3").unwrap();

    assert_eq!(fields.r#type(), &BackendType::S3);
    assert_eq!(fields.display, "backend.s3");
    assert!(fields.order.is_none());
    assert!(fields.enabled());
}
