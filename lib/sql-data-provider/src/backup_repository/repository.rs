use autometrics::autometrics;
use keep_core::model::backup_repository::{BackupRepository, UpdateBackupRepositoryRequest};
use keep_core::repository::backup_repository_repository::BackupRepositoryRepository;
use keep_core::repository::error::DataLayerError;
use sea_orm::{ActiveModelTrait, EntityTrait, Set, Unchanged};
use shared_types::RepositoryId;
use time::OffsetDateTime;

use super::BackupRepositoryProvider;
use crate::entity::backup_repository;
use crate::mapper::{counter_to_db, to_data_layer_error, to_update_data_layer_error};

#[autometrics]
#[async_trait::async_trait]
impl BackupRepositoryRepository for BackupRepositoryProvider {
    async fn create_repository(
        &self,
        request: BackupRepository,
    ) -> Result<RepositoryId, DataLayerError> {
        let repository = backup_repository::ActiveModel::try_from(request)?
            .insert(&self.db)
            .await
            .map_err(to_data_layer_error)?;

        Ok(repository.id)
    }

    async fn get_repository(
        &self,
        id: &RepositoryId,
    ) -> Result<Option<BackupRepository>, DataLayerError> {
        backup_repository::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(to_data_layer_error)?
            .map(TryInto::try_into)
            .transpose()
    }

    async fn update_repository(
        &self,
        id: &RepositoryId,
        request: UpdateBackupRepositoryRequest,
    ) -> Result<(), DataLayerError> {
        let imported_snapshot_count = match request.imported_snapshot_count {
            Some(count) => Set(counter_to_db(count)?),
            None => Default::default(),
        };

        let update_model = backup_repository::ActiveModel {
            id: Unchanged(*id),
            last_modified: Set(OffsetDateTime::now_utc()),
            encrypted_config: request
                .encrypted_config
                .map(Set)
                .unwrap_or_default(),
            imported: request.imported.map(Set).unwrap_or_default(),
            imported_snapshot_count,
            ..Default::default()
        };

        update_model
            .update(&self.db)
            .await
            .map_err(to_update_data_layer_error)?;

        Ok(())
    }

    async fn delete_repository(&self, id: &RepositoryId) -> Result<(), DataLayerError> {
        let result = backup_repository::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(to_data_layer_error)?;

        if result.rows_affected == 0 {
            return Err(DataLayerError::RecordNotFound);
        }

        Ok(())
    }
}
