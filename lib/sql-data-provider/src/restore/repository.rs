use autometrics::autometrics;
use keep_core::model::restore::{
    CreateRestoreResult, GetRestoreList, Restore, RestoreListQuery, RestoreStatus,
    UpdateRestoreRequest,
};
use keep_core::repository::error::DataLayerError;
use keep_core::repository::restore_repository::RestoreRepository;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, QueryTrait, Select, Set, TransactionTrait,
};
use shared_types::{AgentId, RestoreId};
use time::OffsetDateTime;

use super::RestoreProvider;
use crate::entity::{agent, restore};
use crate::list_query::get_page;
use crate::mapper::{counter_to_db, to_data_layer_error, to_update_data_layer_error};

#[autometrics]
#[async_trait::async_trait]
impl RestoreRepository for RestoreProvider {
    async fn create_restore(
        &self,
        request: Restore,
        max_active_per_agent: u64,
    ) -> Result<CreateRestoreResult, DataLayerError> {
        let tx = self.db.begin().await.map_err(to_data_layer_error)?;

        // serialises concurrent requests for the same agent
        agent::Entity::find_by_id(request.target_agent_id)
            .lock_exclusive()
            .one(&tx)
            .await
            .map_err(to_data_layer_error)?
            .ok_or(DataLayerError::RecordNotFound)?;

        let active = active_restores_of(&request.target_agent_id)
            .count(&tx)
            .await
            .map_err(to_data_layer_error)?;
        if active >= max_active_per_agent {
            return Ok(CreateRestoreResult::AgentLimitReached);
        }

        let restore = restore::ActiveModel::try_from(request)?
            .insert(&tx)
            .await
            .map_err(to_data_layer_error)?;
        tx.commit().await.map_err(to_data_layer_error)?;

        Ok(CreateRestoreResult::Created(restore.id))
    }

    async fn get_restore(&self, id: &RestoreId) -> Result<Option<Restore>, DataLayerError> {
        restore::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(to_data_layer_error)?
            .map(TryInto::try_into)
            .transpose()
    }

    async fn get_restore_list(
        &self,
        query: RestoreListQuery,
    ) -> Result<GetRestoreList, DataLayerError> {
        let select = restore::Entity::find()
            .filter(restore::Column::OrganisationId.eq(query.organisation_id))
            .apply_if(query.target_agent_id, |select, agent_id| {
                select.filter(restore::Column::TargetAgentId.eq(agent_id))
            })
            .apply_if(query.repository_id, |select, repository_id| {
                select.filter(restore::Column::RepositoryId.eq(repository_id))
            })
            .apply_if(query.status, |select, status| {
                select.filter(
                    restore::Column::Status
                        .is_in(status.into_iter().map(restore::RestoreStatus::from)),
                )
            })
            .order_by_desc(restore::Column::CreatedDate)
            .order_by_desc(restore::Column::Id);

        get_page(&self.db, select, &query.pagination).await
    }

    async fn update_restore(
        &self,
        id: &RestoreId,
        expected_version: u64,
        request: UpdateRestoreRequest,
    ) -> Result<(), DataLayerError> {
        let update_model = restore::ActiveModel {
            last_modified: Set(OffsetDateTime::now_utc()),
            status: request
                .status
                .map(|status| Set(status.into()))
                .unwrap_or_default(),
            progress: request
                .progress
                .map(|progress| Set(progress.into()))
                .unwrap_or_default(),
            cloud_progress: request
                .cloud_progress
                .map(|progress| Set(Some(progress.into())))
                .unwrap_or_default(),
            error_message: request
                .error_message
                .map(|message| Set(Some(message)))
                .unwrap_or_default(),
            failure_reason: request
                .failure_reason
                .map(|reason| Set(Some(reason.into())))
                .unwrap_or_default(),
            started_at: request
                .started_at
                .map(|date| Set(Some(date)))
                .unwrap_or_default(),
            completed_at: request
                .completed_at
                .map(|date| Set(Some(date)))
                .unwrap_or_default(),
            ..Default::default()
        };

        let result = restore::Entity::update_many()
            .set(update_model)
            .col_expr(
                restore::Column::Version,
                Expr::col(restore::Column::Version).add(1),
            )
            .filter(restore::Column::Id.eq(id))
            .filter(restore::Column::Version.eq(counter_to_db(expected_version)?))
            .exec(&self.db)
            .await
            .map_err(to_update_data_layer_error)?;

        if result.rows_affected == 0 {
            return Err(DataLayerError::RecordNotUpdated);
        }

        Ok(())
    }
}

fn active_restores_of(agent_id: &AgentId) -> Select<restore::Entity> {
    restore::Entity::find()
        .filter(restore::Column::TargetAgentId.eq(agent_id))
        .filter(restore::Column::Status.is_in(RestoreStatus::ACTIVE.map(restore::RestoreStatus::from)))
}
