use keep_core::model::restore::RestoreStatus;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, Set};
use shared_types::{AgentId, OrganisationId, RepositoryId, RestoreId, SnapshotId};
use time::OffsetDateTime;
use time::macros::datetime;

use crate::DataLayer;
use crate::entity::common::StringList;
use crate::entity::{agent, backup_repository, restore};

pub const SNAPSHOT_ID: &str = "4bba301e7d31fb7b7bc6e4b5ebad9b0ac6bbd2c8e1f5c2d0ddf71c9c0e7c4a11";

pub fn get_dummy_date() -> OffsetDateTime {
    datetime!(2026-04-02 21:37 UTC)
}

pub fn snapshot_id() -> SnapshotId {
    SNAPSHOT_ID.parse().unwrap()
}

pub async fn setup_test_data_layer_and_connection() -> DataLayer {
    DataLayer::create("sqlite::memory:").await.unwrap()
}

pub async fn insert_agent(
    db: &DatabaseConnection,
    organisation_id: OrganisationId,
    name: &str,
) -> Result<AgentId, DbErr> {
    let agent = agent::ActiveModel {
        id: Set(AgentId::new_v4()),
        organisation_id: Set(organisation_id),
        name: Set(name.to_owned()),
        hostname: Set(format!("{name}.example.com")),
        created_date: Set(get_dummy_date()),
        last_modified: Set(get_dummy_date()),
    }
    .insert(db)
    .await?;

    Ok(agent.id)
}

pub async fn insert_backup_repository(
    db: &DatabaseConnection,
    organisation_id: OrganisationId,
) -> Result<RepositoryId, DbErr> {
    let repository = backup_repository::ActiveModel {
        id: Set(RepositoryId::new_v4()),
        organisation_id: Set(organisation_id),
        name: Set("offsite".to_owned()),
        backend_type: Set(backup_repository::BackendType::S3),
        encrypted_config: Set(vec![1, 2, 3]),
        imported: Set(false),
        imported_snapshot_count: Set(0),
        created_date: Set(get_dummy_date()),
        last_modified: Set(get_dummy_date()),
    }
    .insert(db)
    .await?;

    Ok(repository.id)
}

pub async fn insert_restore(
    db: &DatabaseConnection,
    organisation_id: OrganisationId,
    target_agent_id: AgentId,
    repository_id: RepositoryId,
    status: RestoreStatus,
    created_date: OffsetDateTime,
) -> Result<restore::Model, DbErr> {
    restore::ActiveModel {
        id: Set(RestoreId::new_v4()),
        organisation_id: Set(organisation_id),
        target_agent_id: Set(target_agent_id),
        source_agent_id: Set(None),
        repository_id: Set(repository_id),
        snapshot_id: Set(snapshot_id()),
        target_path: Set(Some("/restore".to_owned())),
        include_paths: Set(StringList::default()),
        exclude_paths: Set(StringList::default()),
        path_mappings: Set(Default::default()),
        status: Set(status.into()),
        progress: Set(Default::default()),
        cloud_target: Set(None),
        cloud_credentials: Set(None),
        cloud_progress: Set(None),
        verify_upload: Set(false),
        error_message: Set(None),
        failure_reason: Set(None),
        created_date: Set(created_date),
        started_at: Set(None),
        completed_at: Set(None),
        last_modified: Set(created_date),
        version: Set(0),
    }
    .insert(db)
    .await
}
