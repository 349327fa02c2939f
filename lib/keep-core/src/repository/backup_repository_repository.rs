use shared_types::RepositoryId;

use super::error::DataLayerError;
use crate::model::backup_repository::{BackupRepository, UpdateBackupRepositoryRequest};

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait::async_trait]
pub trait BackupRepositoryRepository: Send + Sync {
    async fn create_repository(
        &self,
        request: BackupRepository,
    ) -> Result<RepositoryId, DataLayerError>;

    async fn get_repository(
        &self,
        id: &RepositoryId,
    ) -> Result<Option<BackupRepository>, DataLayerError>;

    async fn update_repository(
        &self,
        id: &RepositoryId,
        request: UpdateBackupRepositoryRequest,
    ) -> Result<(), DataLayerError>;

    async fn delete_repository(&self, id: &RepositoryId) -> Result<(), DataLayerError>;
}
