use serde::{Deserialize, Serialize};
use shared_types::{AgentId, OrganisationId, RepositoryId, SnapshotId, SnapshotMountId};
use strum::{AsRefStr, Display, EnumString};
use time::OffsetDateTime;

use super::common::GetListResponse;
use super::list_query::ListPagination;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SnapshotMount {
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

#[derive(
    Clone, Copy, Debug, Eq, PartialEq, Hash, Display, EnumString, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MountStatus {
    Requested,
    Mounting,
    Mounted,
    Unmounting,
    Unmounted,
    Error,
}

impl MountStatus {
    /// States that block another mount of the same snapshot on the same agent.
    pub const ACTIVE: [MountStatus; 3] = [
        MountStatus::Requested,
        MountStatus::Mounting,
        MountStatus::Mounted,
    ];

    pub fn can_transition_to(&self, next: MountStatus) -> bool {
        use MountStatus::*;

        match (self, next) {
            (Requested, Mounting) | (Mounting, Mounted) | (Mounted, Unmounting) => true,
            (Unmounting, Unmounted) => true,
            (current, Error) => !current.is_terminal(),
            _ => false,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, MountStatus::Unmounted | MountStatus::Error)
    }

    pub fn is_active(&self) -> bool {
        Self::ACTIVE.contains(self)
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct UpdateSnapshotMountRequest {
    pub status: Option<MountStatus>,
    pub mounted_at: Option<OffsetDateTime>,
    pub unmounted_at: Option<OffsetDateTime>,
    pub error_message: Option<String>,
}

/// Outcome of a guarded mount insert, the checks and the insert run atomically.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CreateSnapshotMountResult {
    Created(SnapshotMountId),
    AlreadyActive(Box<SnapshotMount>),
    AgentLimitReached,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SnapshotMountListQuery {
    pub organisation_id: OrganisationId,
    pub agent_id: Option<AgentId>,
    pub pagination: Option<ListPagination>,
}

pub type GetSnapshotMountList = GetListResponse<SnapshotMount>;
