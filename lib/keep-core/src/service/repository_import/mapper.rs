use itertools::Itertools;
use shared_types::{
    AgentId, ImportedSnapshotId, OrganisationId, RepositoryId, RepositoryKeyId,
};
use time::OffsetDateTime;

use super::dto::{ImportPreviewResponseDTO, UpstreamSnapshotDTO};
use crate::config::core_config::BackendType;
use crate::model::backup_repository::BackupRepository;
use crate::model::imported_snapshot::ImportedSnapshot;
use crate::model::repository_key::RepositoryKey;
use crate::provider::snapshot_store::model::UpstreamSnapshot;

impl From<UpstreamSnapshot> for UpstreamSnapshotDTO {
    fn from(value: UpstreamSnapshot) -> Self {
        Self {
            id: value.id,
            short_id: value.short_id,
            time: value.time,
            hostname: value.hostname,
            username: value.username,
            paths: value.paths,
            tags: value.tags,
        }
    }
}

pub(super) fn preview_from_snapshots(snapshots: Vec<UpstreamSnapshot>) -> ImportPreviewResponseDTO {
    let hostnames = snapshots
        .iter()
        .map(|snapshot| snapshot.hostname.clone())
        .sorted()
        .dedup()
        .collect();

    let (total_size, total_file_count) = snapshots
        .iter()
        .filter_map(|snapshot| snapshot.summary.as_ref())
        .fold((0u64, 0u64), |(size, files), summary| {
            (
                size.saturating_add(summary.total_bytes),
                files.saturating_add(summary.total_files),
            )
        });

    ImportPreviewResponseDTO {
        snapshot_count: snapshots.len() as u64,
        hostnames,
        total_size,
        total_file_count,
        snapshots: snapshots.into_iter().map(Into::into).collect(),
    }
}

pub(super) fn repository_from_import(
    organisation_id: OrganisationId,
    name: String,
    backend_type: BackendType,
    encrypted_config: Vec<u8>,
    now: OffsetDateTime,
) -> BackupRepository {
    BackupRepository {
        id: RepositoryId::new_v4(),
        organisation_id,
        name,
        backend_type,
        encrypted_config,
        imported: false,
        imported_snapshot_count: 0,
        created_date: now,
        last_modified: now,
    }
}

pub(super) fn repository_key(
    repository_id: RepositoryId,
    encrypted_password: Vec<u8>,
    escrow_encrypted_password: Option<Vec<u8>>,
    now: OffsetDateTime,
) -> RepositoryKey {
    RepositoryKey {
        id: RepositoryKeyId::new_v4(),
        repository_id,
        encrypted_password,
        escrow_encrypted_password,
        created_date: now,
        last_modified: now,
    }
}

pub(super) fn imported_snapshot_from_upstream(
    snapshot: UpstreamSnapshot,
    repository_id: RepositoryId,
    source_agent_id: Option<AgentId>,
    now: OffsetDateTime,
) -> ImportedSnapshot {
    ImportedSnapshot {
        id: ImportedSnapshotId::new_v4(),
        repository_id,
        source_agent_id,
        snapshot_id: snapshot.id,
        short_id: snapshot.short_id,
        hostname: snapshot.hostname,
        username: snapshot.username,
        snapshot_time: snapshot.time,
        paths: snapshot.paths,
        tags: snapshot.tags,
        created_date: now,
    }
}
