use shared_types::RepositoryId;

use super::error::DataLayerError;
use crate::model::imported_snapshot::ImportedSnapshot;

/// Imported snapshot rows are append-only, they are only removed together
/// with the repository of an incomplete import.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait::async_trait]
pub trait ImportedSnapshotRepository: Send + Sync {
    async fn create_many(&self, request: Vec<ImportedSnapshot>) -> Result<(), DataLayerError>;

    async fn get_by_repository(
        &self,
        repository_id: &RepositoryId,
    ) -> Result<Vec<ImportedSnapshot>, DataLayerError>;

    async fn delete_by_repository(&self, repository_id: &RepositoryId)
    -> Result<(), DataLayerError>;
}
