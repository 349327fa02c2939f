use shared_types::{AgentId, OrganisationId, SnapshotId, SnapshotMountId};
use time::OffsetDateTime;

use super::SnapshotMountService;
use super::dto::{
    CreateSnapshotMountRequestDTO, GetSnapshotMountListResponseDTO, MountJobDTO,
    SnapshotMountResponseDTO,
};
use super::mapper::mount_from_create_request;
use super::validator::{resolve_timeout, validate_transition};
use crate::model::snapshot_mount::{
    CreateSnapshotMountResult, MountStatus, SnapshotMount, SnapshotMountListQuery,
    UpdateSnapshotMountRequest,
};
use crate::service::common::{
    get_agent_in_organisation, load_repository_context, map_guarded_update_error,
    resolve_snapshot,
};
use crate::service::error::{BusinessLogicError, EntityNotFoundError, ServiceError};
use crate::validator::throw_if_org_not_matching_session;

impl SnapshotMountService {
    /// Requests a read-only mount of a snapshot on an agent.
    ///
    /// At most one active mount exists per agent and snapshot, a repeated
    /// request fails with [`BusinessLogicError::MountAlreadyActive`] carrying
    /// the existing mount. Both limits are checked atomically with the insert.
    #[tracing::instrument(level = "debug", skip_all, err(Debug))]
    pub async fn mount_snapshot(
        &self,
        request: CreateSnapshotMountRequestDTO,
    ) -> Result<SnapshotMountId, ServiceError> {
        throw_if_org_not_matching_session(&request.organisation_id, &*self.session_provider)?;
        let timeout_minutes = resolve_timeout(request.timeout_minutes, &self.config.mount)?;

        get_agent_in_organisation(
            &*self.agent_repository,
            &request.agent_id,
            &request.organisation_id,
        )
        .await?;

        let context = load_repository_context(
            &*self.backup_repository_repository,
            &*self.repository_key_repository,
            &*self.credential_vault,
            &request.repository_id,
            &request.organisation_id,
        )
        .await?;
        let snapshot =
            resolve_snapshot(&*self.snapshot_store, &context.params, &request.snapshot_id).await?;

        let agent_id = request.agent_id;
        let mount = mount_from_create_request(
            request,
            snapshot.id,
            timeout_minutes,
            &self.config.mount,
            OffsetDateTime::now_utc(),
        );
        let id = match self
            .snapshot_mount_repository
            .create_mount(mount, self.config.mount.max_active_per_agent)
            .await?
        {
            CreateSnapshotMountResult::Created(id) => id,
            CreateSnapshotMountResult::AlreadyActive(mount) => {
                return Err(BusinessLogicError::MountAlreadyActive { mount }.into());
            }
            CreateSnapshotMountResult::AgentLimitReached => {
                return Err(BusinessLogicError::AgentMountLimitReached(agent_id).into());
            }
        };

        tracing::info!(mount_id = %id, "Snapshot mount requested");
        Ok(id)
    }

    /// Agent picked up the mount. Returns the connection parameters to mount with.
    #[tracing::instrument(level = "debug", skip_all, err(Debug))]
    pub async fn mark_mounting(&self, id: &SnapshotMountId) -> Result<MountJobDTO, ServiceError> {
        let mut mount = self.transition(id, MountStatus::Mounting, Default::default()).await?;

        let context = load_repository_context(
            &*self.backup_repository_repository,
            &*self.repository_key_repository,
            &*self.credential_vault,
            &mount.repository_id,
            &mount.organisation_id,
        )
        .await?;
        mount.status = MountStatus::Mounting;

        Ok(MountJobDTO {
            mount: mount.into(),
            source: context.params,
        })
    }

    #[tracing::instrument(level = "debug", skip(self), err(Debug))]
    pub async fn mark_mounted(&self, id: &SnapshotMountId) -> Result<(), ServiceError> {
        self.transition(
            id,
            MountStatus::Mounted,
            UpdateSnapshotMountRequest {
                mounted_at: Some(OffsetDateTime::now_utc()),
                ..Default::default()
            },
        )
        .await?;
        Ok(())
    }

    /// Used by the expiry scheduler, [`Self::unmount_snapshot`] is the user facing variant
    #[tracing::instrument(level = "debug", skip(self), err(Debug))]
    pub async fn start_unmounting(&self, id: &SnapshotMountId) -> Result<(), ServiceError> {
        self.transition(id, MountStatus::Unmounting, Default::default())
            .await?;
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip(self), err(Debug))]
    pub async fn unmount_snapshot(
        &self,
        organisation_id: &OrganisationId,
        id: &SnapshotMountId,
    ) -> Result<(), ServiceError> {
        throw_if_org_not_matching_session(organisation_id, &*self.session_provider)?;
        self.get_mount_in_organisation(id, organisation_id).await?;

        self.start_unmounting(id).await
    }

    #[tracing::instrument(level = "debug", skip(self), err(Debug))]
    pub async fn mark_unmounted(&self, id: &SnapshotMountId) -> Result<(), ServiceError> {
        self.transition(
            id,
            MountStatus::Unmounted,
            UpdateSnapshotMountRequest {
                unmounted_at: Some(OffsetDateTime::now_utc()),
                ..Default::default()
            },
        )
        .await?;
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip(self), err(Debug))]
    pub async fn mark_error(
        &self,
        id: &SnapshotMountId,
        error_message: String,
    ) -> Result<(), ServiceError> {
        self.transition(
            id,
            MountStatus::Error,
            UpdateSnapshotMountRequest {
                error_message: Some(error_message),
                ..Default::default()
            },
        )
        .await?;
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip(self), err(Debug))]
    pub async fn get_mount(
        &self,
        organisation_id: &OrganisationId,
        id: &SnapshotMountId,
    ) -> Result<SnapshotMountResponseDTO, ServiceError> {
        throw_if_org_not_matching_session(organisation_id, &*self.session_provider)?;

        Ok(self
            .get_mount_in_organisation(id, organisation_id)
            .await?
            .into())
    }

    #[tracing::instrument(level = "debug", skip(self), err(Debug))]
    pub async fn get_active_mount(
        &self,
        organisation_id: &OrganisationId,
        agent_id: &AgentId,
        snapshot_id: &SnapshotId,
    ) -> Result<Option<SnapshotMountResponseDTO>, ServiceError> {
        throw_if_org_not_matching_session(organisation_id, &*self.session_provider)?;
        get_agent_in_organisation(&*self.agent_repository, agent_id, organisation_id).await?;

        let mount = self
            .snapshot_mount_repository
            .get_active_mount(agent_id, snapshot_id)
            .await?;

        Ok(mount.map(Into::into))
    }

    #[tracing::instrument(level = "debug", skip(self), err(Debug))]
    pub async fn list_mounts(
        &self,
        query: SnapshotMountListQuery,
    ) -> Result<GetSnapshotMountListResponseDTO, ServiceError> {
        throw_if_org_not_matching_session(&query.organisation_id, &*self.session_provider)?;

        let result = self.snapshot_mount_repository.get_mount_list(query).await?;
        Ok(result.map(Into::into))
    }

    /// Active mounts past their `expires_at`, for the expiry scheduler
    #[tracing::instrument(level = "debug", skip(self), err(Debug))]
    pub async fn list_expired_mounts(
        &self,
        now: OffsetDateTime,
    ) -> Result<Vec<SnapshotMountResponseDTO>, ServiceError> {
        let mounts = self.snapshot_mount_repository.get_expired_mounts(now).await?;
        Ok(mounts.into_iter().map(Into::into).collect())
    }

    async fn get_mount_in_organisation(
        &self,
        id: &SnapshotMountId,
        organisation_id: &OrganisationId,
    ) -> Result<SnapshotMount, ServiceError> {
        self.snapshot_mount_repository
            .get_mount(id)
            .await?
            .filter(|mount| mount.organisation_id == *organisation_id)
            .ok_or_else(|| EntityNotFoundError::SnapshotMount(*id).into())
    }

    /// Applies `next` through the transition table, returns the mount as it was loaded.
    /// The write only succeeds while the stored status is still the loaded one.
    async fn transition(
        &self,
        id: &SnapshotMountId,
        next: MountStatus,
        request: UpdateSnapshotMountRequest,
    ) -> Result<SnapshotMount, ServiceError> {
        let mount = self
            .snapshot_mount_repository
            .get_mount(id)
            .await?
            .ok_or(EntityNotFoundError::SnapshotMount(*id))?;
        validate_transition(mount.status, next)?;

        self.snapshot_mount_repository
            .update_mount(
                id,
                mount.status,
                UpdateSnapshotMountRequest {
                    status: Some(next),
                    ..request
                },
            )
            .await
            .map_err(map_guarded_update_error)?;

        tracing::debug!(mount_id = %id, from = %mount.status, to = %next, "Snapshot mount transitioned");
        Ok(mount)
    }
}
