use std::sync::Arc;

pub mod agent_repository;
pub mod backup_repository_repository;
pub mod error;
pub mod imported_snapshot_repository;
pub mod repository_key_repository;
pub mod restore_repository;
pub mod snapshot_mount_repository;

use agent_repository::AgentRepository;
use backup_repository_repository::BackupRepositoryRepository;
use imported_snapshot_repository::ImportedSnapshotRepository;
use repository_key_repository::RepositoryKeyRepository;
use restore_repository::RestoreRepository;
use snapshot_mount_repository::SnapshotMountRepository;

/// Persistence entry point handed to [`crate::KeepCore`].
pub trait DataRepository: Send + Sync {
    fn get_agent_repository(&self) -> Arc<dyn AgentRepository>;
    fn get_backup_repository_repository(&self) -> Arc<dyn BackupRepositoryRepository>;
    fn get_repository_key_repository(&self) -> Arc<dyn RepositoryKeyRepository>;
    fn get_imported_snapshot_repository(&self) -> Arc<dyn ImportedSnapshotRepository>;
    fn get_restore_repository(&self) -> Arc<dyn RestoreRepository>;
    fn get_snapshot_mount_repository(&self) -> Arc<dyn SnapshotMountRepository>;
}
