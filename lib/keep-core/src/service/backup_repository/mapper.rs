use super::dto::{BackupRepositoryResponseDTO, ImportedSnapshotResponseDTO};
use crate::model::backup_repository::BackupRepository;
use crate::model::imported_snapshot::ImportedSnapshot;
use crate::provider::backend::Backend;

impl BackupRepositoryResponseDTO {
    pub(crate) fn from_repository(
        repository: BackupRepository,
        backend: &Backend,
        has_escrow: bool,
    ) -> Self {
        Self {
            id: repository.id,
            organisation_id: repository.organisation_id,
            name: repository.name,
            backend_type: repository.backend_type,
            config: backend.public_config(),
            imported: repository.imported,
            imported_snapshot_count: repository.imported_snapshot_count,
            has_escrow,
            created_date: repository.created_date,
            last_modified: repository.last_modified,
        }
    }
}

impl From<ImportedSnapshot> for ImportedSnapshotResponseDTO {
    fn from(value: ImportedSnapshot) -> Self {
        Self {
            id: value.id,
            snapshot_id: value.snapshot_id,
            short_id: value.short_id,
            source_agent_id: value.source_agent_id,
            hostname: value.hostname,
            username: value.username,
            snapshot_time: value.snapshot_time,
            paths: value.paths,
            tags: value.tags,
        }
    }
}
