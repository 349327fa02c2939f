use shared_types::{AgentId, OrganisationId, RepositoryId, SnapshotId, SnapshotMountId};
use time::OffsetDateTime;

use crate::model::common::GetListResponse;
use crate::model::snapshot_mount::MountStatus;
use crate::provider::backend::model::ConnectionParams;

#[derive(Clone, Debug)]
pub struct CreateSnapshotMountRequestDTO {
    pub organisation_id: OrganisationId,
    pub agent_id: AgentId,
    pub repository_id: RepositoryId,
    pub snapshot_id: SnapshotId,
    /// Falls back to the configured default, capped by the configured maximum.
    pub timeout_minutes: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnapshotMountResponseDTO {
    pub id: SnapshotMountId,
    pub organisation_id: OrganisationId,
    pub agent_id: AgentId,
    pub repository_id: RepositoryId,
    pub snapshot_id: SnapshotId,
    pub mount_path: String,
    pub status: MountStatus,
    pub mounted_at: Option<OffsetDateTime>,
    pub expires_at: Option<OffsetDateTime>,
    pub unmounted_at: Option<OffsetDateTime>,
    pub error_message: Option<String>,
    pub created_date: OffsetDateTime,
    pub last_modified: OffsetDateTime,
}

pub type GetSnapshotMountListResponseDTO = GetListResponse<SnapshotMountResponseDTO>;

/// Handed to the agent executing the mount.
#[derive(Clone, Debug)]
pub struct MountJobDTO {
    pub mount: SnapshotMountResponseDTO,
    pub source: ConnectionParams,
}
