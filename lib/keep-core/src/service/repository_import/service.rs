use secrecy::SecretString;
use time::OffsetDateTime;

use super::RepositoryImportService;
use super::dto::{
    ImportPreviewResponseDTO, ImportRepositoryRequestDTO, ImportRepositoryResponseDTO,
    RepositoryAccessRequestDTO, VerifyAccessResponseDTO,
};
use super::mapper::{
    imported_snapshot_from_upstream, preview_from_snapshots, repository_from_import,
    repository_key,
};
use super::validator::{filter_snapshots, validate_import_request};
use crate::model::backup_repository::UpdateBackupRepositoryRequest;
use crate::provider::backend::Backend;
use crate::provider::backend::model::ConnectionParams;
use crate::provider::credential_vault::error::VaultError;
use crate::provider::snapshot_store::model::UpstreamSnapshot;
use crate::service::backup_repository::dto::BackupRepositoryResponseDTO;
use crate::service::common::{get_agent_in_organisation, map_access_error, validate_backend};
use crate::service::error::{ConsistencyError, ImportStage, ServiceError};
use crate::validator::throw_if_org_not_matching_session;

const ACCESS_VERIFIED_MESSAGE: &str = "Repository access verified";

impl RepositoryImportService {
    /// Read-only authentication check against an external repository
    #[tracing::instrument(level = "debug", skip_all, err(Debug))]
    pub async fn verify_access(
        &self,
        request: RepositoryAccessRequestDTO,
    ) -> Result<VerifyAccessResponseDTO, ServiceError> {
        throw_if_org_not_matching_session(&request.organisation_id, &*self.session_provider)?;

        let (_, params) = self.connect(request.r#type.as_str(), request.config, request.password)?;
        self.authenticate(&params).await?;

        Ok(VerifyAccessResponseDTO {
            success: true,
            message: ACCESS_VERIFIED_MESSAGE.to_owned(),
        })
    }

    /// Lists upstream snapshots with aggregated statistics, nothing is stored
    #[tracing::instrument(level = "debug", skip_all, err(Debug))]
    pub async fn preview(
        &self,
        request: RepositoryAccessRequestDTO,
    ) -> Result<ImportPreviewResponseDTO, ServiceError> {
        throw_if_org_not_matching_session(&request.organisation_id, &*self.session_provider)?;

        let (_, params) = self.connect(request.r#type.as_str(), request.config, request.password)?;
        let snapshots = self.fetch_snapshots(&params).await?;

        Ok(preview_from_snapshots(snapshots))
    }

    /// Imports an external repository together with the selected snapshots.
    ///
    /// Rows are written in order repository, key, snapshots, completion
    /// flag. A failure after the repository row exists leaves the partial
    /// state in place and reports it as [`ConsistencyError::ImportIncomplete`].
    #[tracing::instrument(level = "debug", skip_all, err(Debug))]
    pub async fn import(
        &self,
        request: ImportRepositoryRequestDTO,
    ) -> Result<ImportRepositoryResponseDTO, ServiceError> {
        let organisation_id = request.access.organisation_id;
        throw_if_org_not_matching_session(&organisation_id, &*self.session_provider)?;
        validate_import_request(&request)?;

        if request.escrow_enabled && !self.credential_vault.has_escrow() {
            return Err(VaultError::EscrowNotConfigured.into());
        }

        if let Some(source_agent_id) = &request.source_agent_id {
            get_agent_in_organisation(&*self.agent_repository, source_agent_id, &organisation_id)
                .await?;
        }

        let password = request.access.password;
        let (backend, params) = self.connect(
            request.access.r#type.as_str(),
            request.access.config,
            password.clone(),
        )?;

        let snapshots = filter_snapshots(self.fetch_snapshots(&params).await?, &request.filter);

        let encrypted_config = self.credential_vault.encrypt(&backend.to_secret_json()?)?;
        let encrypted_password = self.credential_vault.encrypt(&password)?;
        let escrow_encrypted_password = match request.escrow_enabled {
            true => Some(self.credential_vault.encrypt_escrow(&password)?),
            false => None,
        };

        let now = OffsetDateTime::now_utc();
        let mut repository = repository_from_import(
            organisation_id,
            request.name,
            backend.backend_type(),
            encrypted_config,
            now,
        );
        let repository_id = self
            .backup_repository_repository
            .create_repository(repository.clone())
            .await?;

        let incomplete = |stage| {
            move |source| ConsistencyError::ImportIncomplete {
                repository_id,
                stage,
                source,
            }
        };

        self.repository_key_repository
            .create_key(repository_key(
                repository_id,
                encrypted_password,
                escrow_encrypted_password,
                now,
            ))
            .await
            .map_err(incomplete(ImportStage::RepositoryKey))?;

        let snapshots_imported = snapshots.len() as u64;
        if !snapshots.is_empty() {
            let imported = snapshots
                .into_iter()
                .map(|snapshot| {
                    imported_snapshot_from_upstream(
                        snapshot,
                        repository_id,
                        request.source_agent_id,
                        now,
                    )
                })
                .collect();

            self.imported_snapshot_repository
                .create_many(imported)
                .await
                .map_err(incomplete(ImportStage::Snapshots))?;
        }

        self.backup_repository_repository
            .update_repository(
                &repository_id,
                UpdateBackupRepositoryRequest {
                    imported: Some(true),
                    imported_snapshot_count: Some(snapshots_imported),
                    ..Default::default()
                },
            )
            .await
            .map_err(incomplete(ImportStage::Finalize))?;

        tracing::info!(%repository_id, snapshots_imported, "Repository imported");

        repository.imported = true;
        repository.imported_snapshot_count = snapshots_imported;

        Ok(ImportRepositoryResponseDTO {
            repository: BackupRepositoryResponseDTO::from_repository(
                repository,
                &backend,
                request.escrow_enabled,
            ),
            snapshots_imported,
        })
    }

    fn connect(
        &self,
        r#type: &str,
        raw_config: serde_json::Value,
        password: SecretString,
    ) -> Result<(Backend, ConnectionParams), ServiceError> {
        let backend = validate_backend(r#type, raw_config, &self.config)?;
        let params = backend.to_connection_params(password);
        Ok((backend, params))
    }

    async fn authenticate(&self, params: &ConnectionParams) -> Result<(), ServiceError> {
        self.snapshot_store
            .authenticate(params)
            .await
            .map_err(map_access_error)
    }

    async fn fetch_snapshots(
        &self,
        params: &ConnectionParams,
    ) -> Result<Vec<UpstreamSnapshot>, ServiceError> {
        self.authenticate(params).await?;

        self.snapshot_store
            .list_snapshots(params)
            .await
            .map_err(map_access_error)
    }
}
