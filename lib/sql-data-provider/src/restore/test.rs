use keep_core::model::list_query::ListPagination;
use keep_core::model::restore::{
    CloudProgress, CloudTarget, CloudTargetType, CreateRestoreResult, PathMapping, Restore,
    RestoreFailureReason, RestoreListQuery, RestoreProgress, RestoreStatus, UpdateRestoreRequest,
};
use keep_core::repository::error::DataLayerError;
use keep_core::repository::restore_repository::RestoreRepository;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set, Unchanged};
use shared_types::{AgentId, OrganisationId, RepositoryId, RestoreId};
use time::Duration;

use super::RestoreProvider;
use crate::entity::restore;
use crate::test_utilities::{
    get_dummy_date, insert_agent, insert_backup_repository, insert_restore,
    setup_test_data_layer_and_connection, snapshot_id,
};

struct TestSetup {
    db: DatabaseConnection,
    provider: RestoreProvider,
    organisation_id: OrganisationId,
    agent_id: AgentId,
    repository_id: RepositoryId,
}

async fn setup() -> TestSetup {
    let data_layer = setup_test_data_layer_and_connection().await;
    let db = data_layer.db;
    let organisation_id = OrganisationId::new_v4();
    let agent_id = insert_agent(&db, organisation_id, "app-03").await.unwrap();
    let repository_id = insert_backup_repository(&db, organisation_id)
        .await
        .unwrap();

    TestSetup {
        provider: RestoreProvider { db: db.clone() },
        db,
        organisation_id,
        agent_id,
        repository_id,
    }
}

fn cloud_restore(setup: &TestSetup) -> Restore {
    Restore {
        id: RestoreId::new_v4(),
        organisation_id: setup.organisation_id,
        target_agent_id: setup.agent_id,
        source_agent_id: Some(setup.agent_id),
        repository_id: setup.repository_id,
        snapshot_id: snapshot_id(),
        target_path: None,
        include_paths: vec!["/etc".to_string()],
        exclude_paths: vec!["/etc/ssl/private".to_string()],
        path_mappings: vec![PathMapping {
            source_path: "/etc".to_string(),
            target_path: "/config".to_string(),
        }],
        status: RestoreStatus::Pending,
        progress: RestoreProgress::default(),
        cloud_target: Some(CloudTarget {
            r#type: CloudTargetType::S3,
            bucket: Some("dr-bucket".to_string()),
            region: Some("eu-central-1".to_string()),
            endpoint: None,
            prefix: Some("app-03/".to_string()),
            repository_uri: None,
            encrypted_credentials: vec![7, 7, 7],
        }),
        cloud_progress: None,
        verify_upload: true,
        error_message: None,
        failure_reason: None,
        created_date: get_dummy_date(),
        started_at: None,
        completed_at: None,
        last_modified: get_dummy_date(),
        version: 0,
    }
}

const MAX_ACTIVE: u64 = 4;

async fn create(setup: &TestSetup, restore: Restore) -> RestoreId {
    match setup.provider.create_restore(restore, MAX_ACTIVE).await.unwrap() {
        CreateRestoreResult::Created(id) => id,
        CreateRestoreResult::AgentLimitReached => panic!("restore not created"),
    }
}

#[tokio::test]
async fn test_create_and_get_cloud_restore() {
    let setup = setup().await;
    let restore = cloud_restore(&setup);

    let id = create(&setup, restore.clone()).await;

    let stored = setup.provider.get_restore(&id).await.unwrap().unwrap();
    assert_eq!(stored, restore);
    assert!(stored.is_cloud());
}

#[tokio::test]
async fn test_create_restore_unknown_agent() {
    let setup = setup().await;
    let mut restore = cloud_restore(&setup);
    restore.target_agent_id = AgentId::new_v4();

    let result = setup.provider.create_restore(restore, MAX_ACTIVE).await;
    assert!(matches!(result, Err(DataLayerError::RecordNotFound)));
}

#[tokio::test]
async fn test_cloud_target_without_credentials_fails_mapping() {
    let setup = setup().await;
    let id = create(&setup, cloud_restore(&setup)).await;

    restore::ActiveModel {
        id: Unchanged(id),
        cloud_credentials: Set(None),
        ..Default::default()
    }
    .update(&setup.db)
    .await
    .unwrap();

    assert!(matches!(
        setup.provider.get_restore(&id).await,
        Err(DataLayerError::MappingError)
    ));
}

#[tokio::test]
async fn test_update_restore_progress_and_completion() {
    let setup = setup().await;
    let id = create(&setup, cloud_restore(&setup)).await;

    let cloud_progress = CloudProgress {
        total_files: Some(10),
        total_bytes: Some(1000),
        uploaded_files: 10,
        uploaded_bytes: 1000,
        current_file: None,
        verified_checksum: Some("ab12".to_string()),
    };
    setup
        .provider
        .update_restore(
            &id,
            0,
            UpdateRestoreRequest {
                status: Some(RestoreStatus::Failed),
                cloud_progress: Some(cloud_progress.clone()),
                error_message: Some("Cancelled".to_string()),
                failure_reason: Some(RestoreFailureReason::Cancelled),
                completed_at: Some(get_dummy_date()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let stored = setup.provider.get_restore(&id).await.unwrap().unwrap();
    assert_eq!(stored.status, RestoreStatus::Failed);
    assert_eq!(stored.cloud_progress, Some(cloud_progress));
    assert_eq!(stored.failure_reason, Some(RestoreFailureReason::Cancelled));
    assert_eq!(stored.completed_at, Some(get_dummy_date()));
    assert_eq!(stored.started_at, None);
    assert_eq!(stored.include_paths, vec!["/etc".to_string()]);
    assert_eq!(stored.version, 1);
}

#[tokio::test]
async fn test_update_restore_with_stale_version() {
    let setup = setup().await;
    let id = create(&setup, cloud_restore(&setup)).await;

    setup
        .provider
        .update_restore(
            &id,
            0,
            UpdateRestoreRequest {
                progress: Some(RestoreProgress {
                    files_restored: 20,
                    bytes_restored: 2000,
                    ..Default::default()
                }),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    // second writer read the row before the first update
    let result = setup
        .provider
        .update_restore(
            &id,
            0,
            UpdateRestoreRequest {
                progress: Some(RestoreProgress {
                    files_restored: 10,
                    bytes_restored: 1000,
                    ..Default::default()
                }),
                ..Default::default()
            },
        )
        .await;

    assert!(matches!(result, Err(DataLayerError::RecordNotUpdated)));
    let stored = setup.provider.get_restore(&id).await.unwrap().unwrap();
    assert_eq!(stored.progress.files_restored, 20);
    assert_eq!(stored.version, 1);
}

#[tokio::test]
async fn test_update_missing_restore() {
    let setup = setup().await;

    let result = setup
        .provider
        .update_restore(
            &RestoreId::new_v4(),
            0,
            UpdateRestoreRequest {
                status: Some(RestoreStatus::Running),
                ..Default::default()
            },
        )
        .await;

    assert!(matches!(result, Err(DataLayerError::RecordNotUpdated)));
}

#[tokio::test]
async fn test_create_restore_agent_limit_counts_active_only() {
    let setup = setup().await;
    for status in [
        RestoreStatus::Pending,
        RestoreStatus::Running,
        RestoreStatus::Completed,
        RestoreStatus::Failed,
    ] {
        insert_restore(
            &setup.db,
            setup.organisation_id,
            setup.agent_id,
            setup.repository_id,
            status,
            get_dummy_date(),
        )
        .await
        .unwrap();
    }

    let restore = cloud_restore(&setup);
    let restore_id = restore.id;
    let result = setup
        .provider
        .create_restore(restore.clone(), 2)
        .await
        .unwrap();
    assert_eq!(result, CreateRestoreResult::AgentLimitReached);
    assert!(setup.provider.get_restore(&restore_id).await.unwrap().is_none());

    let result = setup.provider.create_restore(restore, 3).await.unwrap();
    assert_eq!(result, CreateRestoreResult::Created(restore_id));
}

#[tokio::test]
async fn test_get_restore_list_filters_and_pages_newest_first() {
    let setup = setup().await;
    let mut ids = vec![];
    for day in 0..5 {
        let restore = insert_restore(
            &setup.db,
            setup.organisation_id,
            setup.agent_id,
            setup.repository_id,
            RestoreStatus::Completed,
            get_dummy_date() + Duration::days(day),
        )
        .await
        .unwrap();
        ids.push(restore.id);
    }
    insert_restore(
        &setup.db,
        setup.organisation_id,
        setup.agent_id,
        setup.repository_id,
        RestoreStatus::Running,
        get_dummy_date(),
    )
    .await
    .unwrap();

    let page = setup
        .provider
        .get_restore_list(RestoreListQuery {
            organisation_id: setup.organisation_id,
            target_agent_id: Some(setup.agent_id),
            repository_id: None,
            status: Some(vec![RestoreStatus::Completed]),
            pagination: Some(ListPagination {
                page: 0,
                page_size: 2,
            }),
        })
        .await
        .unwrap();

    assert_eq!(page.total_items, 5);
    assert_eq!(page.total_pages, 3);
    let page_ids: Vec<_> = page.values.iter().map(|restore| restore.id).collect();
    assert_eq!(page_ids, vec![ids[4], ids[3]]);

    let other_organisation = setup
        .provider
        .get_restore_list(RestoreListQuery {
            organisation_id: OrganisationId::new_v4(),
            target_agent_id: None,
            repository_id: None,
            status: None,
            pagination: None,
        })
        .await
        .unwrap();
    assert_eq!(other_organisation.total_items, 0);
    assert!(other_organisation.values.is_empty());
}
