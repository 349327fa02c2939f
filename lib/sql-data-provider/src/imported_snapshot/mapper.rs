use keep_core::model::imported_snapshot::ImportedSnapshot;
use sea_orm::Set;

use crate::entity::imported_snapshot;

impl From<ImportedSnapshot> for imported_snapshot::ActiveModel {
    fn from(value: ImportedSnapshot) -> Self {
        Self {
            id: Set(value.id),
            repository_id: Set(value.repository_id),
            source_agent_id: Set(value.source_agent_id),
            snapshot_id: Set(value.snapshot_id),
            short_id: Set(value.short_id),
            hostname: Set(value.hostname),
            username: Set(value.username),
            snapshot_time: Set(value.snapshot_time),
            paths: Set(value.paths.into()),
            tags: Set(value.tags.into()),
            created_date: Set(value.created_date),
        }
    }
}

impl From<imported_snapshot::Model> for ImportedSnapshot {
    fn from(value: imported_snapshot::Model) -> Self {
        Self {
            id: value.id,
            repository_id: value.repository_id,
            source_agent_id: value.source_agent_id,
            snapshot_id: value.snapshot_id,
            short_id: value.short_id,
            hostname: value.hostname,
            username: value.username,
            snapshot_time: value.snapshot_time,
            paths: value.paths.into(),
            tags: value.tags.into(),
            created_date: value.created_date,
        }
    }
}
