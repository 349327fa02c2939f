//! Lookups shared by the services. Every lookup is scoped to an
//! organisation, entities of other tenants behave as absent.

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use shared_types::{AgentId, OrganisationId, RepositoryId, SnapshotId};
use zeroize::Zeroizing;

use super::error::{
    AccessError, BusinessLogicError, EntityNotFoundError, ServiceError, SnapshotStoreFailure,
    ValidationError,
};
use crate::config::core_config::CoreConfig;
use crate::config::validator::backend::validate_backend_type;
use crate::model::agent::Agent;
use crate::model::backup_repository::BackupRepository;
use crate::provider::backend::model::ConnectionParams;
use crate::provider::backend::{Backend, parse_backend, parse_typed_backend};
use crate::provider::credential_vault::CredentialVault;
use crate::provider::snapshot_store::SnapshotStore;
use crate::provider::snapshot_store::error::SnapshotStoreError;
use crate::provider::snapshot_store::model::UpstreamSnapshot;
use crate::repository::agent_repository::AgentRepository;
use crate::repository::error::DataLayerError;
use crate::repository::backup_repository_repository::BackupRepositoryRepository;
use crate::repository::repository_key_repository::RepositoryKeyRepository;

/// Backend type must be enabled in config, its config complete.
pub(crate) fn validate_backend(
    r#type: &str,
    raw_config: Value,
    config: &CoreConfig,
) -> Result<Backend, ServiceError> {
    let backend = parse_backend(r#type, raw_config)?;
    validate_backend_type(r#type, &config.backend)?;
    backend.validate()?;

    Ok(backend)
}

pub(crate) async fn get_agent_in_organisation(
    agent_repository: &dyn AgentRepository,
    agent_id: &AgentId,
    organisation_id: &OrganisationId,
) -> Result<Agent, ServiceError> {
    agent_repository
        .get_agent(agent_id)
        .await?
        .filter(|agent| agent.organisation_id == *organisation_id)
        .ok_or_else(|| EntityNotFoundError::Agent(*agent_id).into())
}

pub(crate) async fn get_repository_in_organisation(
    backup_repository_repository: &dyn BackupRepositoryRepository,
    repository_id: &RepositoryId,
    organisation_id: &OrganisationId,
) -> Result<BackupRepository, ServiceError> {
    backup_repository_repository
        .get_repository(repository_id)
        .await?
        .filter(|repository| repository.organisation_id == *organisation_id)
        .ok_or_else(|| EntityNotFoundError::Repository(*repository_id).into())
}

pub(crate) fn decrypt_backend(
    credential_vault: &dyn CredentialVault,
    repository: &BackupRepository,
) -> Result<Backend, ServiceError> {
    let config = credential_vault.decrypt(&repository.encrypted_config)?;
    let raw: serde_json::Value = serde_json::from_str(config.expose_secret())
        .map_err(|err| ServiceError::MappingError(format!("stored config: {err}")))?;

    Ok(parse_typed_backend(repository.backend_type, raw)?)
}

/// Repository with its connection parameters, secrets decrypted just in time.
pub(crate) struct RepositoryContext {
    pub repository: BackupRepository,
    pub params: ConnectionParams,
}

pub(crate) async fn load_repository_context(
    backup_repository_repository: &dyn BackupRepositoryRepository,
    repository_key_repository: &dyn RepositoryKeyRepository,
    credential_vault: &dyn CredentialVault,
    repository_id: &RepositoryId,
    organisation_id: &OrganisationId,
) -> Result<RepositoryContext, ServiceError> {
    let repository = get_repository_in_organisation(
        backup_repository_repository,
        repository_id,
        organisation_id,
    )
    .await?;

    let key = repository_key_repository
        .get_key_by_repository(repository_id)
        .await?
        .ok_or_else(|| {
            ServiceError::MappingError(format!("repository `{repository_id}` has no key"))
        })?;

    let backend = decrypt_backend(credential_vault, &repository)?;
    let password = credential_vault.decrypt(&key.encrypted_password)?;

    Ok(RepositoryContext {
        params: backend.to_connection_params(password),
        repository,
    })
}

/// Snapshot store failures with credential context are replaced by fixed
/// messages, the upstream text is only logged.
pub(crate) fn map_access_error(error: SnapshotStoreError) -> ServiceError {
    tracing::debug!("Repository access failed: {error}");

    match error {
        SnapshotStoreError::AccessDenied => AccessError::InvalidCredentials.into(),
        _ => AccessError::RepositoryUnreachable.into(),
    }
}

pub(crate) fn map_store_error(error: SnapshotStoreError) -> ServiceError {
    if let SnapshotStoreError::AccessDenied = error {
        return map_access_error(error);
    }

    tracing::debug!("Snapshot store failed: {error}");
    match error {
        SnapshotStoreError::SnapshotNotFound(_) => SnapshotStoreFailure::SnapshotNotFound,
        SnapshotStoreError::PathNotFound(_) => SnapshotStoreFailure::PathNotFound,
        SnapshotStoreError::Parse(_) => SnapshotStoreFailure::InvalidOutput,
        SnapshotStoreError::AccessDenied
        | SnapshotStoreError::CommandFailed { .. }
        | SnapshotStoreError::Io(_) => SnapshotStoreFailure::CommandFailed,
    }
    .into()
}

/// A conditional update that matched no row lost against another writer.
pub(crate) fn map_guarded_update_error(error: DataLayerError) -> ServiceError {
    match error {
        DataLayerError::RecordNotUpdated => BusinessLogicError::ConcurrentModification.into(),
        error => error.into(),
    }
}

pub(crate) async fn resolve_snapshot(
    snapshot_store: &dyn SnapshotStore,
    params: &ConnectionParams,
    snapshot_id: &SnapshotId,
) -> Result<UpstreamSnapshot, ServiceError> {
    snapshot_store
        .get_snapshot(params, snapshot_id)
        .await
        .map_err(map_store_error)?
        .ok_or_else(|| EntityNotFoundError::Snapshot(snapshot_id.clone()).into())
}

pub(crate) fn parse_snapshot_id(value: &str) -> Result<SnapshotId, ServiceError> {
    value
        .parse()
        .map_err(|_| ValidationError::InvalidSnapshotId(value.to_owned()).into())
}

/// Serializes a value holding secrets without leaving a plain copy behind.
pub(crate) fn to_secret_json<T: serde::Serialize>(value: &T) -> Result<SecretString, ServiceError> {
    let json = Zeroizing::new(
        serde_json::to_string(value).map_err(|err| ServiceError::MappingError(err.to_string()))?,
    );

    Ok(SecretString::from(json.to_string()))
}
