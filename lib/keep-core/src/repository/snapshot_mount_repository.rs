use shared_types::{AgentId, SnapshotId, SnapshotMountId};
use time::OffsetDateTime;

use super::error::DataLayerError;
use crate::model::snapshot_mount::{
    CreateSnapshotMountResult, GetSnapshotMountList, MountStatus, SnapshotMount,
    SnapshotMountListQuery, UpdateSnapshotMountRequest,
};

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait::async_trait]
pub trait SnapshotMountRepository: Send + Sync {
    /// Inserts the mount unless the agent already has an active mount of the
    /// same snapshot or has reached `max_active_per_agent` active mounts.
    async fn create_mount(
        &self,
        request: SnapshotMount,
        max_active_per_agent: u64,
    ) -> Result<CreateSnapshotMountResult, DataLayerError>;

    async fn get_mount(&self, id: &SnapshotMountId)
    -> Result<Option<SnapshotMount>, DataLayerError>;

    /// Active mount of the snapshot on the agent, `snapshot_id` must match exactly.
    async fn get_active_mount(
        &self,
        agent_id: &AgentId,
        snapshot_id: &SnapshotId,
    ) -> Result<Option<SnapshotMount>, DataLayerError>;

    async fn get_mount_list(
        &self,
        query: SnapshotMountListQuery,
    ) -> Result<GetSnapshotMountList, DataLayerError>;

    /// Active mounts whose `expires_at` is not after `now`.
    async fn get_expired_mounts(
        &self,
        now: OffsetDateTime,
    ) -> Result<Vec<SnapshotMount>, DataLayerError>;

    /// Applies the update only while the mount is still in `expected_status`,
    /// otherwise fails with [`DataLayerError::RecordNotUpdated`].
    async fn update_mount(
        &self,
        id: &SnapshotMountId,
        expected_status: MountStatus,
        request: UpdateSnapshotMountRequest,
    ) -> Result<(), DataLayerError>;
}
