use std::collections::HashSet;
use std::path::PathBuf;

use secrecy::ExposeSecret;
use shared_types::{OrganisationId, RestoreId};
use time::OffsetDateTime;

use super::RestoreService;
use super::dto::{
    CreateRestoreRequestDTO, GetRestoreListResponseDTO, RestoreJobDTO,
    RestorePreviewResponseDTO, RestoreResponseDTO, UpdateRestoreProgressRequestDTO,
};
use super::mapper::{
    CloudCredentials, cloud_destination, cloud_target_from_request, preview_from_plan,
    restore_from_create_request,
};
use super::path_resolver::{RestoreSelection, resolve_restore_plan, restore_steps};
use super::validator::{validate_cloud_target, validate_create_request, validate_transition};
use crate::model::restore::{
    CreateRestoreResult, Restore, RestoreFailureReason, RestoreListQuery, RestoreStatus,
    UpdateRestoreRequest,
};
use crate::provider::snapshot_store::model::{RestoreCommand, UpstreamSnapshot};
use crate::service::common::{
    RepositoryContext, get_agent_in_organisation, load_repository_context,
    map_guarded_update_error, map_store_error, resolve_snapshot, to_secret_json,
};
use crate::service::error::{BusinessLogicError, EntityNotFoundError, ServiceError};
use crate::validator::throw_if_org_not_matching_session;

const CANCELLED_MESSAGE: &str = "Cancelled";

impl RestoreService {
    /// Creates a restore job in state `PENDING`.
    ///
    /// Request shape, agent and repository tenancy and snapshot existence are
    /// checked first. The per-agent cap is enforced atomically with the insert.
    #[tracing::instrument(level = "debug", skip_all, err(Debug))]
    pub async fn create_restore(
        &self,
        request: CreateRestoreRequestDTO,
    ) -> Result<RestoreId, ServiceError> {
        let (_, snapshot) = self.resolve_request(&request).await?;
        let target_agent_id = request.target_agent_id;

        let cloud_target = match &request.cloud_target {
            Some(cloud_target) => {
                let target_type = validate_cloud_target(cloud_target)?;
                let credentials = to_secret_json(&CloudCredentials::from(cloud_target.clone()))?;
                let encrypted = self.credential_vault.encrypt(&credentials)?;
                Some(cloud_target_from_request(cloud_target, target_type, encrypted))
            }
            None => None,
        };

        let restore = restore_from_create_request(
            request,
            snapshot.id,
            cloud_target,
            OffsetDateTime::now_utc(),
        );
        let id = match self
            .restore_repository
            .create_restore(restore, self.config.restore.max_active_per_agent)
            .await?
        {
            CreateRestoreResult::Created(id) => id,
            CreateRestoreResult::AgentLimitReached => {
                return Err(BusinessLogicError::AgentRestoreLimitReached(target_agent_id).into());
            }
        };

        tracing::info!(restore_id = %id, "Restore created");
        Ok(id)
    }

    /// Dry run of [`Self::create_restore`], nothing is stored
    #[tracing::instrument(level = "debug", skip_all, err(Debug))]
    pub async fn preview_restore(
        &self,
        request: CreateRestoreRequestDTO,
    ) -> Result<RestorePreviewResponseDTO, ServiceError> {
        let (context, snapshot) = self.resolve_request(&request).await?;

        let nodes = self
            .snapshot_store
            .list_files(&context.params, &snapshot.id, None)
            .await
            .map_err(map_store_error)?;

        let is_cloud = request.cloud_target.is_some();
        let plan = resolve_restore_plan(
            nodes,
            &RestoreSelection {
                include: &request.include_paths,
                exclude: &request.exclude_paths,
                mappings: &request.path_mappings,
                target_root: request.target_path.as_deref().unwrap_or("/"),
            },
        );

        let conflicts: HashSet<String> = if is_cloud {
            HashSet::new()
        } else {
            let paths = plan.iter().map(|node| node.target_path.clone()).collect();
            self.target_inspector
                .existing_paths(&request.target_agent_id, paths)
                .await
                .into_iter()
                .collect()
        };

        Ok(preview_from_plan(plan, conflicts, is_cloud))
    }

    /// Moves a pending restore to `RUNNING` and hands out what the worker
    /// needs to execute it. Secrets are decrypted only here.
    #[tracing::instrument(level = "debug", skip_all, err(Debug))]
    pub async fn start_restore(&self, id: &RestoreId) -> Result<RestoreJobDTO, ServiceError> {
        let mut restore = self.get_restore_by_id(id).await?;
        validate_transition(restore.status, RestoreStatus::Running)?;

        let context = load_repository_context(
            &*self.backup_repository_repository,
            &*self.repository_key_repository,
            &*self.credential_vault,
            &restore.repository_id,
            &restore.organisation_id,
        )
        .await?;

        let nodes = self
            .snapshot_store
            .list_files(&context.params, &restore.snapshot_id, None)
            .await
            .map_err(map_store_error)?;
        let selection = RestoreSelection {
            include: &restore.include_paths,
            exclude: &restore.exclude_paths,
            mappings: &restore.path_mappings,
            target_root: restore.target_path.as_deref().unwrap_or("/"),
        };
        let plan = resolve_restore_plan(nodes, &selection);

        // cloud restores are staged locally before the upload
        let execution_root = match &restore.target_path {
            Some(target_path) => PathBuf::from(target_path),
            None => self.config.restore.staging_path.join(id.to_string()),
        };
        let command = RestoreCommand {
            snapshot_id: restore.snapshot_id.clone(),
            steps: restore_steps(&selection, &execution_root),
            verify: restore.verify_upload,
        };

        let cloud_destination = match &restore.cloud_target {
            Some(cloud_target) => {
                let credentials = self
                    .credential_vault
                    .decrypt(&cloud_target.encrypted_credentials)?;
                let credentials: CloudCredentials =
                    serde_json::from_str(credentials.expose_secret()).map_err(|err| {
                        ServiceError::MappingError(format!("cloud credentials: {err}"))
                    })?;
                Some(cloud_destination(
                    cloud_target,
                    credentials,
                    restore.verify_upload,
                ))
            }
            None => None,
        };

        let now = OffsetDateTime::now_utc();
        self.restore_repository
            .update_restore(
                id,
                restore.version,
                UpdateRestoreRequest {
                    status: Some(RestoreStatus::Running),
                    started_at: Some(now),
                    ..Default::default()
                },
            )
            .await
            .map_err(map_guarded_update_error)?;
        restore.version += 1;
        restore.status = RestoreStatus::Running;
        restore.started_at = Some(now);
        restore.last_modified = now;

        tracing::info!(restore_id = %id, cross_agent = restore.is_cross_agent(), "Restore started");

        Ok(RestoreJobDTO {
            restore: restore.into(),
            source: context.params,
            cloud_destination,
            command,
            plan,
        })
    }

    /// Accepted only while running. Counters never decrease, repeating the
    /// last reported values is a no-op. A report racing another write of the
    /// same restore fails with [`BusinessLogicError::ConcurrentModification`].
    #[tracing::instrument(level = "debug", skip_all, err(Debug))]
    pub async fn update_progress(
        &self,
        id: &RestoreId,
        request: UpdateRestoreProgressRequestDTO,
    ) -> Result<(), ServiceError> {
        let restore = self.get_restore_by_id(id).await?;
        if restore.status != RestoreStatus::Running {
            return Err(BusinessLogicError::RestoreNotRunning(restore.status).into());
        }

        let regression = |field| BusinessLogicError::ProgressRegression { field };
        if request.progress.files_restored < restore.progress.files_restored {
            return Err(regression("files_restored").into());
        }
        if request.progress.bytes_restored < restore.progress.bytes_restored {
            return Err(regression("bytes_restored").into());
        }

        let cloud_progress = match (request.cloud_progress, &restore.cloud_progress) {
            (Some(next), Some(current)) => {
                if next.uploaded_files < current.uploaded_files {
                    return Err(regression("uploaded_files").into());
                }
                if next.uploaded_bytes < current.uploaded_bytes {
                    return Err(regression("uploaded_bytes").into());
                }
                Some(next)
            }
            (next, None) if restore.is_cloud() => next,
            _ => None,
        };

        self.restore_repository
            .update_restore(
                id,
                restore.version,
                UpdateRestoreRequest {
                    progress: Some(request.progress),
                    cloud_progress,
                    ..Default::default()
                },
            )
            .await
            .map_err(map_guarded_update_error)?;

        Ok(())
    }

    #[tracing::instrument(level = "debug", skip_all, err(Debug))]
    pub async fn complete_restore(&self, id: &RestoreId) -> Result<(), ServiceError> {
        let restore = self.get_restore_by_id(id).await?;
        validate_transition(restore.status, RestoreStatus::Completed)?;

        self.restore_repository
            .update_restore(
                id,
                restore.version,
                UpdateRestoreRequest {
                    status: Some(RestoreStatus::Completed),
                    completed_at: Some(OffsetDateTime::now_utc()),
                    ..Default::default()
                },
            )
            .await
            .map_err(map_guarded_update_error)?;

        tracing::info!(restore_id = %id, "Restore completed");
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip(self), err(Debug))]
    pub async fn fail_restore(&self, id: &RestoreId, error_message: String) -> Result<(), ServiceError> {
        let restore = self.get_restore_by_id(id).await?;
        self.mark_failed(&restore, RestoreFailureReason::Error, error_message)
            .await
    }

    /// Cancels a pending or running restore on behalf of a user
    #[tracing::instrument(level = "debug", skip(self), err(Debug))]
    pub async fn cancel_restore(
        &self,
        organisation_id: &OrganisationId,
        id: &RestoreId,
        reason: Option<String>,
    ) -> Result<(), ServiceError> {
        throw_if_org_not_matching_session(organisation_id, &*self.session_provider)?;

        let restore = self
            .get_restore_by_id(id)
            .await
            .and_then(|restore| filter_organisation(restore, organisation_id))?;

        self.mark_failed(
            &restore,
            RestoreFailureReason::Cancelled,
            reason.unwrap_or_else(|| CANCELLED_MESSAGE.to_owned()),
        )
        .await
    }

    #[tracing::instrument(level = "debug", skip(self), err(Debug))]
    pub async fn get_restore(
        &self,
        organisation_id: &OrganisationId,
        id: &RestoreId,
    ) -> Result<RestoreResponseDTO, ServiceError> {
        throw_if_org_not_matching_session(organisation_id, &*self.session_provider)?;

        let restore = self
            .get_restore_by_id(id)
            .await
            .and_then(|restore| filter_organisation(restore, organisation_id))?;

        Ok(restore.into())
    }

    #[tracing::instrument(level = "debug", skip(self), err(Debug))]
    pub async fn list_restores(
        &self,
        query: RestoreListQuery,
    ) -> Result<GetRestoreListResponseDTO, ServiceError> {
        throw_if_org_not_matching_session(&query.organisation_id, &*self.session_provider)?;

        let result = self.restore_repository.get_restore_list(query).await?;
        Ok(result.map(Into::into))
    }

    async fn resolve_request(
        &self,
        request: &CreateRestoreRequestDTO,
    ) -> Result<(RepositoryContext, UpstreamSnapshot), ServiceError> {
        throw_if_org_not_matching_session(&request.organisation_id, &*self.session_provider)?;
        validate_create_request(request)?;

        get_agent_in_organisation(
            &*self.agent_repository,
            &request.target_agent_id,
            &request.organisation_id,
        )
        .await?;
        if let Some(source_agent_id) = &request.source_agent_id {
            get_agent_in_organisation(
                &*self.agent_repository,
                source_agent_id,
                &request.organisation_id,
            )
            .await?;
        }

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

        Ok((context, snapshot))
    }

    async fn get_restore_by_id(&self, id: &RestoreId) -> Result<Restore, ServiceError> {
        self.restore_repository
            .get_restore(id)
            .await?
            .ok_or_else(|| EntityNotFoundError::Restore(*id).into())
    }

    async fn mark_failed(
        &self,
        restore: &Restore,
        reason: RestoreFailureReason,
        error_message: String,
    ) -> Result<(), ServiceError> {
        validate_transition(restore.status, RestoreStatus::Failed)?;

        self.restore_repository
            .update_restore(
                &restore.id,
                restore.version,
                UpdateRestoreRequest {
                    status: Some(RestoreStatus::Failed),
                    failure_reason: Some(reason),
                    error_message: Some(error_message),
                    completed_at: Some(OffsetDateTime::now_utc()),
                    ..Default::default()
                },
            )
            .await
            .map_err(map_guarded_update_error)?;

        tracing::info!(restore_id = %restore.id, %reason, "Restore failed");
        Ok(())
    }
}

fn filter_organisation(
    restore: Restore,
    organisation_id: &OrganisationId,
) -> Result<Restore, ServiceError> {
    if restore.organisation_id != *organisation_id {
        return Err(EntityNotFoundError::Restore(restore.id).into());
    }
    Ok(restore)
}
