use std::sync::Arc;

use agent::AgentProvider;
use backup_repository::BackupRepositoryProvider;
use imported_snapshot::ImportedSnapshotProvider;
use keep_core::repository::DataRepository;
use keep_core::repository::agent_repository::AgentRepository;
use keep_core::repository::backup_repository_repository::BackupRepositoryRepository;
use keep_core::repository::error::DataLayerError;
use keep_core::repository::imported_snapshot_repository::ImportedSnapshotRepository;
use keep_core::repository::repository_key_repository::RepositoryKeyRepository;
use keep_core::repository::restore_repository::RestoreRepository;
use keep_core::repository::snapshot_mount_repository::SnapshotMountRepository;
use migration::{Migrator, MigratorTrait};
use repository_key::RepositoryKeyProvider;
use restore::RestoreProvider;
use sea_orm::DatabaseConnection;
use snapshot_mount::SnapshotMountProvider;

mod common;
mod entity;
mod list_query;
mod mapper;

pub mod agent;
pub mod backup_repository;
pub mod imported_snapshot;
pub mod repository_key;
pub mod restore;
pub mod snapshot_mount;

#[cfg(test)]
pub(crate) mod test_utilities;

#[derive(Clone)]
pub struct DataLayer {
    // Used for tests for now
    #[allow(unused)]
    db: DatabaseConnection,
    agent_repository: Arc<dyn AgentRepository>,
    backup_repository_repository: Arc<dyn BackupRepositoryRepository>,
    repository_key_repository: Arc<dyn RepositoryKeyRepository>,
    imported_snapshot_repository: Arc<dyn ImportedSnapshotRepository>,
    restore_repository: Arc<dyn RestoreRepository>,
    snapshot_mount_repository: Arc<dyn SnapshotMountRepository>,
}

impl DataLayer {
    /// Connects to `database_url` and brings the schema up to date.
    pub async fn create(database_url: &str) -> Result<Self, DataLayerError> {
        let db = sea_orm::Database::connect(database_url)
            .await
            .map_err(|e| DataLayerError::Db(e.into()))?;

        Migrator::up(&db, None)
            .await
            .map_err(|e| DataLayerError::Db(e.into()))?;

        tracing::info!("Database migrations applied");

        Ok(Self::build(db))
    }

    pub fn build(db: DatabaseConnection) -> Self {
        Self {
            agent_repository: Arc::new(AgentProvider { db: db.clone() }),
            backup_repository_repository: Arc::new(BackupRepositoryProvider { db: db.clone() }),
            repository_key_repository: Arc::new(RepositoryKeyProvider { db: db.clone() }),
            imported_snapshot_repository: Arc::new(ImportedSnapshotProvider { db: db.clone() }),
            restore_repository: Arc::new(RestoreProvider { db: db.clone() }),
            snapshot_mount_repository: Arc::new(SnapshotMountProvider { db: db.clone() }),
            db,
        }
    }
}

impl DataRepository for DataLayer {
    fn get_agent_repository(&self) -> Arc<dyn AgentRepository> {
        self.agent_repository.clone()
    }

    fn get_backup_repository_repository(&self) -> Arc<dyn BackupRepositoryRepository> {
        self.backup_repository_repository.clone()
    }

    fn get_repository_key_repository(&self) -> Arc<dyn RepositoryKeyRepository> {
        self.repository_key_repository.clone()
    }

    fn get_imported_snapshot_repository(&self) -> Arc<dyn ImportedSnapshotRepository> {
        self.imported_snapshot_repository.clone()
    }

    fn get_restore_repository(&self) -> Arc<dyn RestoreRepository> {
        self.restore_repository.clone()
    }

    fn get_snapshot_mount_repository(&self) -> Arc<dyn SnapshotMountRepository> {
        self.snapshot_mount_repository.clone()
    }
}
