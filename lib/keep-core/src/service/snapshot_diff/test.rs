use std::sync::Arc;

use shared_types::{OrganisationId, SnapshotId};
use time::macros::datetime;
use time::OffsetDateTime;

use super::SnapshotDiffService;
use super::dto::{
    ChangeType, CompareSnapshotsRequestDTO, DiffStatsDTO, FileDiffContentDTO, FileDiffRequestDTO,
};
use crate::model::backup_repository::BackupRepository;
use crate::proto::session_provider::NoSessionProvider;
use crate::provider::snapshot_store::MockSnapshotStore;
use crate::provider::snapshot_store::error::SnapshotStoreError;
use crate::provider::snapshot_store::model::{FileNode, NodeChange, NodeType};
use crate::repository::backup_repository_repository::MockBackupRepositoryRepository;
use crate::repository::repository_key_repository::MockRepositoryKeyRepository;
use crate::service::error::{EntityNotFoundError, ServiceError, ValidationError};
use crate::service::test_utilities::*;

#[derive(Default)]
struct Repositories {
    pub backup_repository_repository: MockBackupRepositoryRepository,
    pub repository_key_repository: MockRepositoryKeyRepository,
    pub snapshot_store: MockSnapshotStore,
}

fn setup_service(repositories: Repositories) -> SnapshotDiffService {
    SnapshotDiffService::new(
        Arc::new(repositories.backup_repository_repository),
        Arc::new(repositories.repository_key_repository),
        Arc::new(repositories.snapshot_store),
        test_vault(),
        Arc::new(NoSessionProvider),
        Arc::new(generic_config().core),
    )
}

/// Repository lookups and snapshot resolution succeed, the store is left
/// open for test specific expectations.
fn repositories_for(repository: &BackupRepository) -> Repositories {
    let mut backup_repository_repository = MockBackupRepositoryRepository::default();
    let stored = repository.clone();
    backup_repository_repository
        .expect_get_repository()
        .returning(move |_| Ok(Some(stored.clone())));

    let mut repository_key_repository = MockRepositoryKeyRepository::default();
    let repository_id = repository.id;
    repository_key_repository
        .expect_get_key_by_repository()
        .returning(move |_| Ok(Some(dummy_repository_key(repository_id))));

    let mut snapshot_store = MockSnapshotStore::default();
    snapshot_store
        .expect_get_snapshot()
        .returning(|_, id| Ok(Some(dummy_upstream_snapshot(id, "host-a"))));

    Repositories {
        backup_repository_repository,
        repository_key_repository,
        snapshot_store,
    }
}

fn compare_request(repository: &BackupRepository) -> CompareSnapshotsRequestDTO {
    CompareSnapshotsRequestDTO {
        organisation_id: repository.organisation_id,
        repository_id: repository.id,
        snapshot_id_1: snapshot_id("a1"),
        snapshot_id_2: snapshot_id("b2"),
    }
}

fn file_request(repository: &BackupRepository, path: &str) -> FileDiffRequestDTO {
    FileDiffRequestDTO {
        organisation_id: repository.organisation_id,
        repository_id: repository.id,
        snapshot_id_1: snapshot_id("a1"),
        snapshot_id_2: snapshot_id("b2"),
        path: path.to_owned(),
    }
}

fn node(path: &str, node_type: NodeType, size: u64, mtime: OffsetDateTime) -> FileNode {
    FileNode {
        path: path.to_owned(),
        name: path.rsplit('/').next().unwrap_or_default().to_owned(),
        node_type,
        size,
        mtime: Some(mtime),
        content_hash: None,
    }
}

fn node_change(path: &str, before: Option<FileNode>, after: Option<FileNode>) -> NodeChange {
    NodeChange {
        path: path.to_owned(),
        before,
        after,
    }
}

const T1: OffsetDateTime = datetime!(2024-03-01 10:00:00 UTC);
const T2: OffsetDateTime = datetime!(2024-03-02 10:00:00 UTC);

#[tokio::test]
async fn test_compare_classifies_and_counts() {
    let repository = dummy_repository(OrganisationId::new_v4());
    let mut repositories = repositories_for(&repository);

    repositories
        .snapshot_store
        .expect_diff()
        .once()
        .withf(|_, from, to| *from == snapshot_id("a1") && *to == snapshot_id("b2"))
        .return_once(|_, _, _| {
            Ok(vec![
                node_change("/srv/new.txt", None, Some(node("/srv/new.txt", NodeType::File, 300, T2))),
                node_change("/srv", Some(node("/srv", NodeType::Dir, 0, T1)), Some(node("/srv", NodeType::Dir, 0, T2))),
                node_change("/etc/old.conf", Some(node("/etc/old.conf", NodeType::File, 40, T1)), None),
                node_change(
                    "/etc/grown",
                    Some(node("/etc/grown", NodeType::File, 100, T1)),
                    Some(node("/etc/grown", NodeType::File, 150, T2)),
                ),
                node_change(
                    "/etc/shrunk",
                    Some(node("/etc/shrunk", NodeType::File, 100, T1)),
                    Some(node("/etc/shrunk", NodeType::File, 70, T2)),
                ),
                node_change(
                    "/etc/touched",
                    Some(node("/etc/touched", NodeType::File, 10, T1)),
                    Some(node("/etc/touched", NodeType::File, 10, T2)),
                ),
                node_change("/opt/app", None, Some(node("/opt/app", NodeType::Dir, 0, T2))),
                node_change("/opt/link", None, Some(node("/opt/link", NodeType::Symlink, 8, T2))),
            ])
        });

    let service = setup_service(repositories);
    let result = service.compare(compare_request(&repository)).await.unwrap();

    let paths: Vec<_> = result.changes.iter().map(|change| change.path.as_str()).collect();
    assert_eq!(
        paths,
        [
            "/etc/grown",
            "/etc/old.conf",
            "/etc/shrunk",
            "/etc/touched",
            "/opt/app",
            "/opt/link",
            "/srv/new.txt",
        ]
    );

    similar_asserts::assert_eq!(
        result.stats,
        DiffStatsDTO {
            files_added: 2,
            files_removed: 1,
            files_modified: 3,
            dirs_added: 1,
            dirs_removed: 0,
            total_size_added: 300 + 8 + 50,
            total_size_removed: 40 + 30,
        }
    );

    let file_changes = result.changes.iter().filter(|change| !change.is_dir).count() as u64;
    let dir_changes = result.changes.iter().filter(|change| change.is_dir).count() as u64;
    assert_eq!(
        result.stats.files_added + result.stats.files_removed + result.stats.files_modified,
        file_changes
    );
    assert_eq!(result.stats.dirs_added + result.stats.dirs_removed, dir_changes);
}

#[tokio::test]
async fn test_compare_prefers_content_hash_over_mtime() {
    let repository = dummy_repository(OrganisationId::new_v4());
    let mut repositories = repositories_for(&repository);

    let hashed = |mtime, hash: &str| FileNode {
        content_hash: Some(hash.to_owned()),
        ..node("/data/blob", NodeType::File, 64, mtime)
    };
    let changes = vec![
        node_change("/data/blob", Some(hashed(T1, "aa")), Some(hashed(T2, "aa"))),
        node_change("/data/other", Some(hashed(T1, "aa")), Some(hashed(T1, "bb"))),
    ];
    repositories
        .snapshot_store
        .expect_diff()
        .once()
        .return_once(move |_, _, _| Ok(changes));

    let service = setup_service(repositories);
    let result = service.compare(compare_request(&repository)).await.unwrap();

    assert_eq!(result.changes.len(), 1);
    assert_eq!(result.changes[0].path, "/data/other");
    assert_eq!(result.changes[0].change_type, ChangeType::Modified);
}

#[tokio::test]
async fn test_compare_node_type_switch() {
    let repository = dummy_repository(OrganisationId::new_v4());
    let mut repositories = repositories_for(&repository);

    repositories
        .snapshot_store
        .expect_diff()
        .once()
        .return_once(|_, _, _| {
            Ok(vec![node_change(
                "/data",
                Some(node("/data", NodeType::File, 5, T1)),
                Some(node("/data", NodeType::Dir, 0, T2)),
            )])
        });

    let service = setup_service(repositories);
    let result = service.compare(compare_request(&repository)).await.unwrap();

    assert_eq!(result.stats.files_removed, 1);
    assert_eq!(result.stats.dirs_added, 1);
    assert_eq!(result.stats.total_size_removed, 5);
}

#[tokio::test]
async fn test_compare_unknown_snapshot() {
    let repository = dummy_repository(OrganisationId::new_v4());
    let mut repositories = repositories_for(&repository);
    repositories.snapshot_store = MockSnapshotStore::default();
    repositories
        .snapshot_store
        .expect_get_snapshot()
        .returning(|_, id| {
            if *id == snapshot_id("a1") {
                Ok(Some(dummy_upstream_snapshot(id, "host-a")))
            } else {
                Ok(None)
            }
        });

    let service = setup_service(repositories);
    let result = service.compare(compare_request(&repository)).await;

    assert!(matches!(
        result,
        Err(ServiceError::EntityNotFound(EntityNotFoundError::Snapshot(id))) if id == snapshot_id("b2")
    ));
}

/// Matches the `maxTextFileSize` of the generic test config.
const MAX_TEXT_SIZE: u64 = 1024;

fn store_with_files(
    repositories: &mut Repositories,
    old: Option<&'static [u8]>,
    new: Option<&'static [u8]>,
) {
    let content_for = move |id: &SnapshotId| if *id == snapshot_id("a1") { old } else { new };

    repositories
        .snapshot_store
        .expect_list_files()
        .times(2)
        .returning(move |_, id, prefix| {
            let path = prefix.unwrap_or_default();
            Ok(content_for(id)
                .map(|content| node(&path, NodeType::File, content.len() as u64, T1))
                .into_iter()
                .collect())
        });

    let reads = [old, new]
        .into_iter()
        .flatten()
        .filter(|content| content.len() as u64 <= MAX_TEXT_SIZE)
        .count();
    repositories
        .snapshot_store
        .expect_read_file()
        .times(reads)
        .returning(move |_, id, path| {
            content_for(id)
                .map(<[u8]>::to_vec)
                .ok_or_else(|| SnapshotStoreError::PathNotFound(path.to_owned()))
        });
}

#[tokio::test]
async fn test_diff_file_text() {
    let repository = dummy_repository(OrganisationId::new_v4());
    let mut repositories = repositories_for(&repository);
    store_with_files(
        &mut repositories,
        Some(b"listen 80\nworkers 2\n"),
        Some(b"listen 80\nworkers 4\n"),
    );

    let service = setup_service(repositories);
    let result = service
        .diff_file(file_request(&repository, "/etc/app.conf"))
        .await
        .unwrap();

    assert_eq!(result.change_type, Some(ChangeType::Modified));
    let FileDiffContentDTO::Text {
        unified_diff,
        old_content,
        new_content,
    } = result.content
    else {
        panic!("expected text diff");
    };
    assert!(unified_diff.starts_with("--- a/etc/app.conf\n+++ b/etc/app.conf\n"));
    assert!(unified_diff.contains("-workers 2\n"));
    assert!(unified_diff.contains("+workers 4\n"));
    assert_eq!(old_content.as_deref(), Some("listen 80\nworkers 2\n"));
    assert_eq!(new_content.as_deref(), Some("listen 80\nworkers 4\n"));
}

#[tokio::test]
async fn test_diff_file_added() {
    let repository = dummy_repository(OrganisationId::new_v4());
    let mut repositories = repositories_for(&repository);
    store_with_files(&mut repositories, None, Some(b"hello\n"));

    let service = setup_service(repositories);
    let result = service
        .diff_file(file_request(&repository, "/home/readme"))
        .await
        .unwrap();

    assert_eq!(result.change_type, Some(ChangeType::Added));
    assert!(matches!(
        result.content,
        FileDiffContentDTO::Text { old_content: None, new_content: Some(_), .. }
    ));
}

#[tokio::test]
async fn test_diff_file_binary() {
    let repository = dummy_repository(OrganisationId::new_v4());
    let mut repositories = repositories_for(&repository);
    store_with_files(&mut repositories, Some(b"\x00\x01\x02"), Some(b"\x00\x01"));

    let service = setup_service(repositories);
    let result = service
        .diff_file(file_request(&repository, "/bin/tool"))
        .await
        .unwrap();

    let FileDiffContentDTO::Binary {
        old_size,
        new_size,
        old_sha256,
        new_sha256,
    } = result.content
    else {
        panic!("expected binary diff");
    };
    assert_eq!(old_size, Some(3));
    assert_eq!(new_size, Some(2));
    assert_ne!(old_sha256, new_sha256);
    assert_eq!(old_sha256.map(|hash| hash.len()), Some(64));
}

#[tokio::test]
async fn test_diff_file_large_text_treated_as_binary() {
    static LARGE: [u8; 2048] = [b'a'; 2048];

    let repository = dummy_repository(OrganisationId::new_v4());
    let mut repositories = repositories_for(&repository);
    store_with_files(&mut repositories, Some(b"a"), Some(&LARGE));

    let service = setup_service(repositories);
    let result = service
        .diff_file(file_request(&repository, "/var/log/big"))
        .await
        .unwrap();

    assert!(matches!(
        result.content,
        FileDiffContentDTO::Binary {
            old_size: Some(1),
            new_size: Some(2048),
            old_sha256: Some(_),
            new_sha256: None,
        }
    ));
}

#[tokio::test]
async fn test_diff_file_oversized_content_not_read() {
    const HUGE: u64 = 8 * 1024 * 1024 * 1024;

    let repository = dummy_repository(OrganisationId::new_v4());
    let mut repositories = repositories_for(&repository);
    repositories
        .snapshot_store
        .expect_list_files()
        .times(2)
        .returning(|_, id, prefix| {
            let size = if *id == snapshot_id("a1") { HUGE } else { HUGE + 1 };
            Ok(vec![node(&prefix.unwrap_or_default(), NodeType::File, size, T1)])
        });
    repositories.snapshot_store.expect_read_file().never();

    let service = setup_service(repositories);
    let result = service
        .diff_file(file_request(&repository, "/var/lib/disk.img"))
        .await
        .unwrap();

    assert_eq!(result.change_type, Some(ChangeType::Modified));
    assert_eq!(
        result.content,
        FileDiffContentDTO::Binary {
            old_size: Some(HUGE),
            new_size: Some(HUGE + 1),
            old_sha256: None,
            new_sha256: None,
        }
    );
}

#[tokio::test]
async fn test_diff_file_directory_is_not_a_file() {
    let repository = dummy_repository(OrganisationId::new_v4());
    let mut repositories = repositories_for(&repository);
    repositories
        .snapshot_store
        .expect_list_files()
        .times(2)
        .returning(|_, _, prefix| {
            let path = prefix.unwrap_or_default();
            Ok(vec![
                node(&path, NodeType::Dir, 0, T1),
                node(&format!("{path}/inner"), NodeType::File, 3, T1),
            ])
        });
    repositories.snapshot_store.expect_read_file().never();

    let service = setup_service(repositories);
    let result = service.diff_file(file_request(&repository, "/etc")).await;

    assert!(matches!(
        result,
        Err(ServiceError::EntityNotFound(EntityNotFoundError::SnapshotPath { .. }))
    ));
}

#[tokio::test]
async fn test_diff_file_missing_in_both() {
    let repository = dummy_repository(OrganisationId::new_v4());
    let mut repositories = repositories_for(&repository);
    store_with_files(&mut repositories, None, None);

    let service = setup_service(repositories);
    let result = service
        .diff_file(file_request(&repository, "/nowhere"))
        .await;

    assert!(matches!(
        result,
        Err(ServiceError::EntityNotFound(EntityNotFoundError::SnapshotPath { .. }))
    ));
}

#[tokio::test]
async fn test_diff_file_relative_path() {
    let repository = dummy_repository(OrganisationId::new_v4());
    let service = setup_service(Repositories::default());

    let result = service
        .diff_file(file_request(&repository, "etc/app.conf"))
        .await;

    assert!(matches!(
        result,
        Err(ServiceError::Validation(ValidationError::PathNotAbsolute { .. }))
    ));
}
