use serde_json::Value;
use shared_types::{AgentId, ImportedSnapshotId, OrganisationId, RepositoryId, SnapshotId};
use time::OffsetDateTime;

use crate::config::core_config::BackendType;

/// Repository as returned to callers, secrets never leave the vault.
#[derive(Clone, Debug, PartialEq)]
pub struct BackupRepositoryResponseDTO {
    pub id: RepositoryId,
    pub organisation_id: OrganisationId,
    pub name: String,
    pub backend_type: BackendType,
    /// Backend config without secret fields.
    pub config: Value,
    pub imported: bool,
    pub imported_snapshot_count: u64,
    pub has_escrow: bool,
    pub created_date: OffsetDateTime,
    pub last_modified: OffsetDateTime,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportedSnapshotResponseDTO {
    pub id: ImportedSnapshotId,
    pub snapshot_id: SnapshotId,
    pub short_id: String,
    pub source_agent_id: Option<AgentId>,
    pub hostname: String,
    pub username: String,
    pub snapshot_time: OffsetDateTime,
    pub paths: Vec<String>,
    pub tags: Vec<String>,
}

/// Replacement connection config, `type` must match the stored backend type.
#[derive(Clone, Debug)]
pub struct RotateConfigRequestDTO {
    pub r#type: String,
    pub config: Value,
}
