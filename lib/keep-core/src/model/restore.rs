use serde::{Deserialize, Serialize};
use shared_types::{AgentId, OrganisationId, RepositoryId, RestoreId, SnapshotId};
use strum::{AsRefStr, Display, EnumString};
use time::OffsetDateTime;

use super::common::GetListResponse;
use super::list_query::ListPagination;

#[derive(Clone, Debug, PartialEq)]
pub struct Restore {
    pub id: RestoreId,
    pub organisation_id: OrganisationId,
    pub target_agent_id: AgentId,
    pub source_agent_id: Option<AgentId>,
    pub repository_id: RepositoryId,
    pub snapshot_id: SnapshotId,
    /// Absent for cloud restores.
    pub target_path: Option<String>,
    pub include_paths: Vec<String>,
    pub exclude_paths: Vec<String>,
    pub path_mappings: Vec<PathMapping>,
    pub status: RestoreStatus,
    pub progress: RestoreProgress,
    pub cloud_target: Option<CloudTarget>,
    pub cloud_progress: Option<CloudProgress>,
    pub verify_upload: bool,
    pub error_message: Option<String>,
    pub failure_reason: Option<RestoreFailureReason>,
    pub created_date: OffsetDateTime,
    pub started_at: Option<OffsetDateTime>,
    pub completed_at: Option<OffsetDateTime>,
    pub last_modified: OffsetDateTime,
    /// Incremented by every stored update, writers pass the version they read.
    pub version: u64,
}

impl Restore {
    pub fn is_cross_agent(&self) -> bool {
        self.source_agent_id
            .is_some_and(|source| source != self.target_agent_id)
    }

    pub fn is_cloud(&self) -> bool {
        self.cloud_target.is_some()
    }
}

#[derive(
    Clone, Copy, Debug, Eq, PartialEq, Hash, Display, EnumString, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RestoreStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl RestoreStatus {
    pub const ACTIVE: [RestoreStatus; 2] = [RestoreStatus::Pending, RestoreStatus::Running];

    /// Single source of truth for the restore lifecycle.
    pub fn can_transition_to(&self, next: RestoreStatus) -> bool {
        use RestoreStatus::*;

        matches!(
            (self, next),
            (Pending, Running) | (Pending, Failed) | (Running, Completed) | (Running, Failed)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RestoreStatus::Completed | RestoreStatus::Failed)
    }

    pub fn is_active(&self) -> bool {
        Self::ACTIVE.contains(self)
    }
}

#[derive(
    Clone, Copy, Debug, Eq, PartialEq, Display, EnumString, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RestoreFailureReason {
    Error,
    Cancelled,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreProgress {
    pub files_restored: u64,
    pub bytes_restored: u64,
    pub total_files: Option<u64>,
    pub total_bytes: Option<u64>,
    pub current_file: Option<String>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathMapping {
    pub source_path: String,
    pub target_path: String,
}

#[derive(
    Clone, Copy, Debug, Eq, PartialEq, Hash, Display, EnumString, AsRefStr, Serialize, Deserialize,
)]
pub enum CloudTargetType {
    #[serde(rename = "s3")]
    #[strum(serialize = "s3")]
    S3,
    #[serde(rename = "b2")]
    #[strum(serialize = "b2")]
    B2,
    #[serde(rename = "restic-repo")]
    #[strum(serialize = "restic-repo")]
    ResticRepo,
}

/// Destination of a cloud restore. Only non-secret connection fields are
/// readable; credentials stay vault-encrypted.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CloudTarget {
    pub r#type: CloudTargetType,
    pub bucket: Option<String>,
    pub region: Option<String>,
    pub endpoint: Option<String>,
    pub prefix: Option<String>,
    pub repository_uri: Option<String>,
    pub encrypted_credentials: Vec<u8>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudProgress {
    pub total_files: Option<u64>,
    pub total_bytes: Option<u64>,
    pub uploaded_files: u64,
    pub uploaded_bytes: u64,
    pub current_file: Option<String>,
    pub verified_checksum: Option<String>,
}

impl CloudProgress {
    pub fn percent_complete(&self) -> f64 {
        match self.total_bytes {
            Some(total) if total > 0 => self.uploaded_bytes as f64 / total as f64 * 100.0,
            _ => 0.0,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpdateRestoreRequest {
    pub status: Option<RestoreStatus>,
    pub progress: Option<RestoreProgress>,
    pub cloud_progress: Option<CloudProgress>,
    pub error_message: Option<String>,
    pub failure_reason: Option<RestoreFailureReason>,
    pub started_at: Option<OffsetDateTime>,
    pub completed_at: Option<OffsetDateTime>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CreateRestoreResult {
    Created(RestoreId),
    AgentLimitReached,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RestoreListQuery {
    pub organisation_id: OrganisationId,
    pub target_agent_id: Option<AgentId>,
    pub repository_id: Option<RepositoryId>,
    pub status: Option<Vec<RestoreStatus>>,
    pub pagination: Option<ListPagination>,
}

pub type GetRestoreList = GetListResponse<Restore>;
