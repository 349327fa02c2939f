use autometrics::autometrics;
use keep_core::model::snapshot_mount::{
    CreateSnapshotMountResult, GetSnapshotMountList, MountStatus, SnapshotMount,
    SnapshotMountListQuery, UpdateSnapshotMountRequest,
};
use keep_core::repository::error::DataLayerError;
use keep_core::repository::snapshot_mount_repository::SnapshotMountRepository;
use sea_orm::sea_query::SimpleExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, QueryTrait, Select, Set, TransactionTrait,
};
use shared_types::{AgentId, SnapshotId, SnapshotMountId};
use time::OffsetDateTime;

use super::SnapshotMountProvider;
use crate::entity::{agent, snapshot_mount};
use crate::list_query::get_page;
use crate::mapper::{to_data_layer_error, to_update_data_layer_error};

fn is_active() -> SimpleExpr {
    snapshot_mount::Column::Status.is_in(MountStatus::ACTIVE.map(snapshot_mount::MountStatus::from))
}

fn active_mounts_of(agent_id: &AgentId) -> Select<snapshot_mount::Entity> {
    snapshot_mount::Entity::find()
        .filter(snapshot_mount::Column::AgentId.eq(agent_id))
        .filter(is_active())
}

async fn find_active_mount(
    db: &impl ConnectionTrait,
    agent_id: &AgentId,
    snapshot_id: &SnapshotId,
) -> Result<Option<SnapshotMount>, DataLayerError> {
    active_mounts_of(agent_id)
        .filter(snapshot_mount::Column::SnapshotId.eq(snapshot_id))
        .order_by_desc(snapshot_mount::Column::CreatedDate)
        .one(db)
        .await
        .map_err(to_data_layer_error)?
        .map(TryInto::try_into)
        .transpose()
}

#[autometrics]
#[async_trait::async_trait]
impl SnapshotMountRepository for SnapshotMountProvider {
    async fn create_mount(
        &self,
        request: SnapshotMount,
        max_active_per_agent: u64,
    ) -> Result<CreateSnapshotMountResult, DataLayerError> {
        let tx = self.db.begin().await.map_err(to_data_layer_error)?;

        // serialises concurrent requests for the same agent
        agent::Entity::find_by_id(request.agent_id)
            .lock_exclusive()
            .one(&tx)
            .await
            .map_err(to_data_layer_error)?
            .ok_or(DataLayerError::RecordNotFound)?;

        if let Some(mount) = find_active_mount(&tx, &request.agent_id, &request.snapshot_id).await? {
            return Ok(CreateSnapshotMountResult::AlreadyActive(Box::new(mount)));
        }

        let active = active_mounts_of(&request.agent_id)
            .count(&tx)
            .await
            .map_err(to_data_layer_error)?;
        if active >= max_active_per_agent {
            return Ok(CreateSnapshotMountResult::AgentLimitReached);
        }

        let mount = snapshot_mount::ActiveModel::from(request)
            .insert(&tx)
            .await
            .map_err(to_data_layer_error)?;
        tx.commit().await.map_err(to_data_layer_error)?;

        Ok(CreateSnapshotMountResult::Created(mount.id))
    }

    async fn get_mount(
        &self,
        id: &SnapshotMountId,
    ) -> Result<Option<SnapshotMount>, DataLayerError> {
        snapshot_mount::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(to_data_layer_error)?
            .map(TryInto::try_into)
            .transpose()
    }

    async fn get_active_mount(
        &self,
        agent_id: &AgentId,
        snapshot_id: &SnapshotId,
    ) -> Result<Option<SnapshotMount>, DataLayerError> {
        find_active_mount(&self.db, agent_id, snapshot_id).await
    }

    async fn get_mount_list(
        &self,
        query: SnapshotMountListQuery,
    ) -> Result<GetSnapshotMountList, DataLayerError> {
        let select = snapshot_mount::Entity::find()
            .filter(snapshot_mount::Column::OrganisationId.eq(query.organisation_id))
            .apply_if(query.agent_id, |select, agent_id| {
                select.filter(snapshot_mount::Column::AgentId.eq(agent_id))
            })
            .order_by_desc(snapshot_mount::Column::CreatedDate)
            .order_by_desc(snapshot_mount::Column::Id);

        get_page(&self.db, select, &query.pagination).await
    }

    async fn get_expired_mounts(
        &self,
        now: OffsetDateTime,
    ) -> Result<Vec<SnapshotMount>, DataLayerError> {
        snapshot_mount::Entity::find()
            .filter(is_active())
            .filter(snapshot_mount::Column::ExpiresAt.is_not_null())
            .filter(snapshot_mount::Column::ExpiresAt.lte(now))
            .order_by_asc(snapshot_mount::Column::ExpiresAt)
            .all(&self.db)
            .await
            .map_err(to_data_layer_error)?
            .into_iter()
            .map(TryInto::try_into)
            .collect()
    }

    async fn update_mount(
        &self,
        id: &SnapshotMountId,
        expected_status: MountStatus,
        request: UpdateSnapshotMountRequest,
    ) -> Result<(), DataLayerError> {
        let update_model = snapshot_mount::ActiveModel {
            last_modified: Set(OffsetDateTime::now_utc()),
            status: request
                .status
                .map(|status| Set(status.into()))
                .unwrap_or_default(),
            mounted_at: request
                .mounted_at
                .map(|date| Set(Some(date)))
                .unwrap_or_default(),
            unmounted_at: request
                .unmounted_at
                .map(|date| Set(Some(date)))
                .unwrap_or_default(),
            error_message: request
                .error_message
                .map(|message| Set(Some(message)))
                .unwrap_or_default(),
            ..Default::default()
        };

        let result = snapshot_mount::Entity::update_many()
            .set(update_model)
            .filter(snapshot_mount::Column::Id.eq(id))
            .filter(
                snapshot_mount::Column::Status
                    .eq(snapshot_mount::MountStatus::from(expected_status)),
            )
            .exec(&self.db)
            .await
            .map_err(to_update_data_layer_error)?;

        if result.rows_affected == 0 {
            return Err(DataLayerError::RecordNotUpdated);
        }

        Ok(())
    }
}
