use shared_types::{SnapshotId, SnapshotMountId};
use time::{Duration, OffsetDateTime};

use super::dto::{CreateSnapshotMountRequestDTO, SnapshotMountResponseDTO};
use crate::config::core_config::MountConfig;
use crate::model::snapshot_mount::{MountStatus, SnapshotMount};

pub(super) fn mount_from_create_request(
    request: CreateSnapshotMountRequestDTO,
    snapshot_id: SnapshotId,
    timeout_minutes: u32,
    config: &MountConfig,
    now: OffsetDateTime,
) -> SnapshotMount {
    let id = SnapshotMountId::new_v4();

    SnapshotMount {
        mount_path: config
            .base_path
            .join(id.to_string())
            .to_string_lossy()
            .into_owned(),
        id,
        organisation_id: request.organisation_id,
        agent_id: request.agent_id,
        repository_id: request.repository_id,
        snapshot_id,
        status: MountStatus::Requested,
        mounted_at: None,
        expires_at: Some(now + Duration::minutes(timeout_minutes.into())),
        unmounted_at: None,
        error_message: None,
        created_date: now,
        last_modified: now,
    }
}

impl From<SnapshotMount> for SnapshotMountResponseDTO {
    fn from(value: SnapshotMount) -> Self {
        Self {
            id: value.id,
            organisation_id: value.organisation_id,
            agent_id: value.agent_id,
            repository_id: value.repository_id,
            snapshot_id: value.snapshot_id,
            mount_path: value.mount_path,
            status: value.status,
            mounted_at: value.mounted_at,
            expires_at: value.expires_at,
            unmounted_at: value.unmounted_at,
            error_message: value.error_message,
            created_date: value.created_date,
            last_modified: value.last_modified,
        }
    }
}
