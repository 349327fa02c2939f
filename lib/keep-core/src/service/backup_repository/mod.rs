use std::sync::Arc;

use crate::config::core_config;
use crate::proto::session_provider::SessionProvider;
use crate::provider::credential_vault::CredentialVault;
use crate::repository::backup_repository_repository::BackupRepositoryRepository;
use crate::repository::imported_snapshot_repository::ImportedSnapshotRepository;
use crate::repository::repository_key_repository::RepositoryKeyRepository;

pub mod dto;
mod mapper;
pub mod service;

#[cfg(test)]
mod test;

#[derive(Clone)]
pub struct BackupRepositoryService {
    backup_repository_repository: Arc<dyn BackupRepositoryRepository>,
    repository_key_repository: Arc<dyn RepositoryKeyRepository>,
    imported_snapshot_repository: Arc<dyn ImportedSnapshotRepository>,
    credential_vault: Arc<dyn CredentialVault>,
    session_provider: Arc<dyn SessionProvider>,
    config: Arc<core_config::CoreConfig>,
}

impl BackupRepositoryService {
    pub(crate) fn new(
        backup_repository_repository: Arc<dyn BackupRepositoryRepository>,
        repository_key_repository: Arc<dyn RepositoryKeyRepository>,
        imported_snapshot_repository: Arc<dyn ImportedSnapshotRepository>,
        credential_vault: Arc<dyn CredentialVault>,
        session_provider: Arc<dyn SessionProvider>,
        config: Arc<core_config::CoreConfig>,
    ) -> Self {
        Self {
            backup_repository_repository,
            repository_key_repository,
            imported_snapshot_repository,
            credential_vault,
            session_provider,
            config,
        }
    }
}
