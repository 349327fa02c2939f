use shared_types::RestoreId;

use super::error::DataLayerError;
use crate::model::restore::{
    CreateRestoreResult, GetRestoreList, Restore, RestoreListQuery, UpdateRestoreRequest,
};

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait::async_trait]
pub trait RestoreRepository: Send + Sync {
    /// Inserts the restore unless the target agent already has
    /// `max_active_per_agent` active restores. Count and insert are atomic.
    async fn create_restore(
        &self,
        request: Restore,
        max_active_per_agent: u64,
    ) -> Result<CreateRestoreResult, DataLayerError>;

    async fn get_restore(&self, id: &RestoreId) -> Result<Option<Restore>, DataLayerError>;

    async fn get_restore_list(
        &self,
        query: RestoreListQuery,
    ) -> Result<GetRestoreList, DataLayerError>;

    /// Stores the update only if the row is still at `expected_version`,
    /// otherwise fails with [`DataLayerError::RecordNotUpdated`].
    async fn update_restore(
        &self,
        id: &RestoreId,
        expected_version: u64,
        request: UpdateRestoreRequest,
    ) -> Result<(), DataLayerError>;
}
