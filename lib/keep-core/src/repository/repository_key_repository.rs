use shared_types::{RepositoryId, RepositoryKeyId};

use super::error::DataLayerError;
use crate::model::repository_key::RepositoryKey;

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait::async_trait]
pub trait RepositoryKeyRepository: Send + Sync {
    async fn create_key(&self, request: RepositoryKey) -> Result<RepositoryKeyId, DataLayerError>;

    async fn get_key_by_repository(
        &self,
        repository_id: &RepositoryId,
    ) -> Result<Option<RepositoryKey>, DataLayerError>;

    async fn delete_by_repository(&self, repository_id: &RepositoryId)
    -> Result<(), DataLayerError>;
}
