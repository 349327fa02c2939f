use autometrics::autometrics;
use keep_core::model::imported_snapshot::ImportedSnapshot;
use keep_core::repository::error::DataLayerError;
use keep_core::repository::imported_snapshot_repository::ImportedSnapshotRepository;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use shared_types::RepositoryId;

use super::ImportedSnapshotProvider;
use crate::entity::imported_snapshot;
use crate::mapper::to_data_layer_error;

#[autometrics]
#[async_trait::async_trait]
impl ImportedSnapshotRepository for ImportedSnapshotProvider {
    async fn create_many(&self, request: Vec<ImportedSnapshot>) -> Result<(), DataLayerError> {
        if request.is_empty() {
            return Ok(());
        }

        imported_snapshot::Entity::insert_many(
            request
                .into_iter()
                .map(imported_snapshot::ActiveModel::from),
        )
        .exec(&self.db)
        .await
        .map_err(to_data_layer_error)?;

        Ok(())
    }

    async fn get_by_repository(
        &self,
        repository_id: &RepositoryId,
    ) -> Result<Vec<ImportedSnapshot>, DataLayerError> {
        let snapshots = imported_snapshot::Entity::find()
            .filter(imported_snapshot::Column::RepositoryId.eq(repository_id))
            .order_by_asc(imported_snapshot::Column::SnapshotTime)
            .all(&self.db)
            .await
            .map_err(to_data_layer_error)?;

        Ok(snapshots.into_iter().map(Into::into).collect())
    }

    async fn delete_by_repository(
        &self,
        repository_id: &RepositoryId,
    ) -> Result<(), DataLayerError> {
        imported_snapshot::Entity::delete_many()
            .filter(imported_snapshot::Column::RepositoryId.eq(repository_id))
            .exec(&self.db)
            .await
            .map_err(to_data_layer_error)?;

        Ok(())
    }
}
