use secrecy::SecretString;
use serde_json::Value;
use shared_types::{AgentId, OrganisationId, SnapshotId};
use time::OffsetDateTime;

use crate::service::backup_repository::dto::BackupRepositoryResponseDTO;

/// Connection to an external repository, `type` is a key of the `backend` config block.
#[derive(Clone, Debug)]
pub struct RepositoryAccessRequestDTO {
    pub organisation_id: OrganisationId,
    pub r#type: String,
    pub config: Value,
    pub password: SecretString,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifyAccessResponseDTO {
    pub success: bool,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpstreamSnapshotDTO {
    pub id: SnapshotId,
    pub short_id: String,
    pub time: OffsetDateTime,
    pub hostname: String,
    pub username: String,
    pub paths: Vec<String>,
    pub tags: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportPreviewResponseDTO {
    pub snapshots: Vec<UpstreamSnapshotDTO>,
    pub snapshot_count: u64,
    /// Sorted and unique.
    pub hostnames: Vec<String>,
    pub total_size: u64,
    pub total_file_count: u64,
}

/// Empty lists select everything, both lists set select the intersection.
#[derive(Clone, Debug, Default)]
pub struct ImportFilterDTO {
    pub snapshot_ids: Vec<String>,
    pub hostnames: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct ImportRepositoryRequestDTO {
    pub access: RepositoryAccessRequestDTO,
    pub name: String,
    pub escrow_enabled: bool,
    pub filter: ImportFilterDTO,
    pub source_agent_id: Option<AgentId>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImportRepositoryResponseDTO {
    pub repository: BackupRepositoryResponseDTO,
    pub snapshots_imported: u64,
}
