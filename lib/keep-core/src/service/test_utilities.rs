use std::sync::Arc;

use indoc::indoc;
use secrecy::{SecretSlice, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use shared_types::{AgentId, OrganisationId, RepositoryId, RepositoryKeyId, SnapshotId};
use time::OffsetDateTime;
use time::macros::datetime;

use crate::config::core_config::{AppConfig, BackendType};
use crate::model::agent::Agent;
use crate::model::backup_repository::BackupRepository;
use crate::model::repository_key::RepositoryKey;
use crate::provider::credential_vault::{ChaChaCredentialVault, CredentialVault};
use crate::provider::snapshot_store::model::{SnapshotSummary, UpstreamSnapshot};

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomConfig {}

pub const REPOSITORY_PASSWORD: &str = "correct horse battery staple";

pub fn generic_config() -> AppConfig<CustomConfig> {
    let config = indoc! {"
        backend:
            LOCAL:
                type: 'LOCAL'
                display: 'backend.local'
                order: 0
            S3:
                type: 'S3'
                display: 'backend.s3'
                order: 1
            B2:
                type: 'B2'
                display: 'backend.b2'
                order: 2
            REST:
                type: 'REST'
                display: 'backend.rest'
                order: 3
            SFTP:
                type: 'SFTP'
                display: 'backend.sftp'
                order: 4
                enabled: false
        restore:
            maxActivePerAgent: 4
            stagingPath: '/var/tmp/keep/restore'
        mount:
            maxActivePerAgent: 2
            basePath: '/mnt/keep'
            defaultTimeoutMinutes: 60
            maxTimeoutMinutes: 1440
        diff:
            maxTextFileSize: 1024
            contextLines: 3
        vault:
            encryptionKey: '93d9182795f0d1bec61329fc2d18c4b4c1b7e65e69e20ec30a2101a9875fff7e'
            escrowKey: '1f0b2a3c4d5e6f708192a3b4c5d6e7f8091a2b3c4d5e6f708192a3b4c5d6e7f8'
    "};

    AppConfig::from_yaml(vec![config]).unwrap()
}

pub fn test_vault() -> Arc<dyn CredentialVault> {
    Arc::new(ChaChaCredentialVault::from_config(&generic_config().core.vault).unwrap())
}

pub fn test_vault_without_escrow() -> Arc<dyn CredentialVault> {
    Arc::new(ChaChaCredentialVault::new(
        SecretSlice::from(vec![7u8; 32]),
        None,
    ))
}

pub fn secret(value: &str) -> SecretString {
    SecretString::from(value.to_owned())
}

pub fn local_backend_config() -> Value {
    json!({ "path": "/srv/backup" })
}

pub fn s3_backend_config() -> Value {
    json!({
        "bucket": "backups",
        "accessKeyId": "AKIAEXAMPLE",
        "secretAccessKey": "s3-secret"
    })
}

pub fn snapshot_id(prefix: &str) -> SnapshotId {
    format!("{prefix:0<64}").parse().unwrap()
}

pub fn dummy_agent(organisation_id: OrganisationId) -> Agent {
    let now = OffsetDateTime::now_utc();
    Agent {
        id: AgentId::new_v4(),
        organisation_id,
        name: "agent".to_owned(),
        hostname: "host-a".to_owned(),
        created_date: now,
        last_modified: now,
    }
}

/// Imported LOCAL repository whose config is encrypted with [`test_vault`].
pub fn dummy_repository(organisation_id: OrganisationId) -> BackupRepository {
    let now = OffsetDateTime::now_utc();
    let config = secret(&local_backend_config().to_string());

    BackupRepository {
        id: RepositoryId::new_v4(),
        organisation_id,
        name: "repository".to_owned(),
        backend_type: BackendType::Local,
        encrypted_config: test_vault().encrypt(&config).unwrap(),
        imported: true,
        imported_snapshot_count: 1,
        created_date: now,
        last_modified: now,
    }
}

pub fn dummy_repository_key(repository_id: RepositoryId) -> RepositoryKey {
    let now = OffsetDateTime::now_utc();
    RepositoryKey {
        id: RepositoryKeyId::new_v4(),
        repository_id,
        encrypted_password: test_vault().encrypt(&secret(REPOSITORY_PASSWORD)).unwrap(),
        escrow_encrypted_password: None,
        created_date: now,
        last_modified: now,
    }
}

pub fn dummy_upstream_snapshot(id: &SnapshotId, hostname: &str) -> UpstreamSnapshot {
    UpstreamSnapshot {
        id: id.clone(),
        short_id: id.as_str().chars().take(8).collect(),
        time: datetime!(2024-03-01 10:00:00 UTC),
        hostname: hostname.to_owned(),
        username: "root".to_owned(),
        paths: vec!["/home".to_owned()],
        tags: vec![],
        summary: Some(SnapshotSummary {
            total_files: 10,
            total_bytes: 1000,
        }),
    }
}
