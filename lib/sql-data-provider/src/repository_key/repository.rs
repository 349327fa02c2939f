use autometrics::autometrics;
use keep_core::model::repository_key::RepositoryKey;
use keep_core::repository::error::DataLayerError;
use keep_core::repository::repository_key_repository::RepositoryKeyRepository;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter};
use shared_types::{RepositoryId, RepositoryKeyId};

use super::RepositoryKeyProvider;
use crate::entity::repository_key;
use crate::mapper::to_data_layer_error;

#[autometrics]
#[async_trait::async_trait]
impl RepositoryKeyRepository for RepositoryKeyProvider {
    async fn create_key(&self, request: RepositoryKey) -> Result<RepositoryKeyId, DataLayerError> {
        let key = repository_key::ActiveModel::from(request)
            .insert(&self.db)
            .await
            .map_err(to_data_layer_error)?;

        Ok(key.id)
    }

    async fn get_key_by_repository(
        &self,
        repository_id: &RepositoryId,
    ) -> Result<Option<RepositoryKey>, DataLayerError> {
        repository_key::Entity::find()
            .filter(repository_key::Column::RepositoryId.eq(repository_id))
            .one(&self.db)
            .await
            .map_err(to_data_layer_error)?
            .map(TryInto::try_into)
            .transpose()
    }

    async fn delete_by_repository(
        &self,
        repository_id: &RepositoryId,
    ) -> Result<(), DataLayerError> {
        repository_key::Entity::delete_many()
            .filter(repository_key::Column::RepositoryId.eq(repository_id))
            .exec(&self.db)
            .await
            .map_err(to_data_layer_error)?;

        Ok(())
    }
}
