use shared_types::{OrganisationId, RepositoryId};

use super::BackupRepositoryService;
use super::dto::{
    BackupRepositoryResponseDTO, ImportedSnapshotResponseDTO, RotateConfigRequestDTO,
};
use crate::model::backup_repository::UpdateBackupRepositoryRequest;
use crate::service::common::{
    decrypt_backend, get_repository_in_organisation, validate_backend,
};
use crate::service::error::{BusinessLogicError, ServiceError};
use crate::validator::throw_if_org_not_matching_session;

impl BackupRepositoryService {
    /// Returns the repository with its public backend config
    #[tracing::instrument(level = "debug", skip(self), err(Debug))]
    pub async fn get_repository(
        &self,
        organisation_id: &OrganisationId,
        id: &RepositoryId,
    ) -> Result<BackupRepositoryResponseDTO, ServiceError> {
        throw_if_org_not_matching_session(organisation_id, &*self.session_provider)?;

        let repository =
            get_repository_in_organisation(&*self.backup_repository_repository, id, organisation_id)
                .await?;
        let backend = decrypt_backend(&*self.credential_vault, &repository)?;

        let has_escrow = self
            .repository_key_repository
            .get_key_by_repository(id)
            .await?
            .is_some_and(|key| key.escrow_enabled());

        Ok(BackupRepositoryResponseDTO::from_repository(
            repository, &backend, has_escrow,
        ))
    }

    #[tracing::instrument(level = "debug", skip(self), err(Debug))]
    pub async fn list_imported_snapshots(
        &self,
        organisation_id: &OrganisationId,
        id: &RepositoryId,
    ) -> Result<Vec<ImportedSnapshotResponseDTO>, ServiceError> {
        throw_if_org_not_matching_session(organisation_id, &*self.session_provider)?;
        get_repository_in_organisation(&*self.backup_repository_repository, id, organisation_id)
            .await?;

        let snapshots = self
            .imported_snapshot_repository
            .get_by_repository(id)
            .await?;

        Ok(snapshots.into_iter().map(Into::into).collect())
    }

    /// Replaces the connection config. The backend type is immutable.
    #[tracing::instrument(level = "debug", skip(self, request), err(Debug))]
    pub async fn rotate_config(
        &self,
        organisation_id: &OrganisationId,
        id: &RepositoryId,
        request: RotateConfigRequestDTO,
    ) -> Result<BackupRepositoryResponseDTO, ServiceError> {
        throw_if_org_not_matching_session(organisation_id, &*self.session_provider)?;

        let mut repository =
            get_repository_in_organisation(&*self.backup_repository_repository, id, organisation_id)
                .await?;

        if request.r#type != repository.backend_type.as_ref() {
            return Err(BusinessLogicError::BackendTypeChange {
                from: repository.backend_type.to_string(),
                to: request.r#type,
            }
            .into());
        }
        let backend = validate_backend(&request.r#type, request.config, &self.config)?;

        let encrypted_config = self.credential_vault.encrypt(&backend.to_secret_json()?)?;
        self.backup_repository_repository
            .update_repository(
                id,
                UpdateBackupRepositoryRequest {
                    encrypted_config: Some(encrypted_config.clone()),
                    ..Default::default()
                },
            )
            .await?;
        repository.encrypted_config = encrypted_config;

        let has_escrow = self
            .repository_key_repository
            .get_key_by_repository(id)
            .await?
            .is_some_and(|key| key.escrow_enabled());

        tracing::info!(repository_id = %id, "Repository config rotated");

        Ok(BackupRepositoryResponseDTO::from_repository(
            repository, &backend, has_escrow,
        ))
    }

    /// Removes what a failed import left behind. Completed imports are kept.
    #[tracing::instrument(level = "debug", skip(self), err(Debug))]
    pub async fn delete_incomplete_import(
        &self,
        organisation_id: &OrganisationId,
        id: &RepositoryId,
    ) -> Result<(), ServiceError> {
        throw_if_org_not_matching_session(organisation_id, &*self.session_provider)?;

        let repository =
            get_repository_in_organisation(&*self.backup_repository_repository, id, organisation_id)
                .await?;
        if repository.imported {
            return Err(BusinessLogicError::RepositoryImportAlreadyComplete(*id).into());
        }

        self.imported_snapshot_repository
            .delete_by_repository(id)
            .await?;
        self.repository_key_repository
            .delete_by_repository(id)
            .await?;
        self.backup_repository_repository
            .delete_repository(id)
            .await?;

        tracing::info!(repository_id = %id, "Incomplete import removed");
        Ok(())
    }
}
