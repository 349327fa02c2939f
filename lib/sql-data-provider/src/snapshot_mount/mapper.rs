use keep_core::model::snapshot_mount::SnapshotMount;
use keep_core::repository::error::DataLayerError;
use sea_orm::Set;

use crate::entity::snapshot_mount;

impl From<SnapshotMount> for snapshot_mount::ActiveModel {
    fn from(value: SnapshotMount) -> Self {
        Self {
            id: Set(value.id),
            organisation_id: Set(value.organisation_id),
            agent_id: Set(value.agent_id),
            repository_id: Set(value.repository_id),
            snapshot_id: Set(value.snapshot_id),
            mount_path: Set(value.mount_path),
            status: Set(value.status.into()),
            mounted_at: Set(value.mounted_at),
            expires_at: Set(value.expires_at),
            unmounted_at: Set(value.unmounted_at),
            error_message: Set(value.error_message),
            created_date: Set(value.created_date),
            last_modified: Set(value.last_modified),
        }
    }
}

impl TryFrom<snapshot_mount::Model> for SnapshotMount {
    type Error = DataLayerError;

    fn try_from(value: snapshot_mount::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id,
            organisation_id: value.organisation_id,
            agent_id: value.agent_id,
            repository_id: value.repository_id,
            snapshot_id: value.snapshot_id,
            mount_path: value.mount_path,
            status: value.status.into(),
            mounted_at: value.mounted_at,
            expires_at: value.expires_at,
            unmounted_at: value.unmounted_at,
            error_message: value.error_message,
            created_date: value.created_date,
            last_modified: value.last_modified,
        })
    }
}
