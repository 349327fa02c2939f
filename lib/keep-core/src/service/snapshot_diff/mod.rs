use std::sync::Arc;

use crate::config::core_config;
use crate::proto::session_provider::SessionProvider;
use crate::provider::credential_vault::CredentialVault;
use crate::provider::snapshot_store::SnapshotStore;
use crate::repository::backup_repository_repository::BackupRepositoryRepository;
use crate::repository::repository_key_repository::RepositoryKeyRepository;

pub mod dto;
mod mapper;
pub mod service;

#[cfg(test)]
mod test;

#[derive(Clone)]
pub struct SnapshotDiffService {
    backup_repository_repository: Arc<dyn BackupRepositoryRepository>,
    repository_key_repository: Arc<dyn RepositoryKeyRepository>,
    snapshot_store: Arc<dyn SnapshotStore>,
    credential_vault: Arc<dyn CredentialVault>,
    session_provider: Arc<dyn SessionProvider>,
    config: Arc<core_config::CoreConfig>,
}

impl SnapshotDiffService {
    pub(crate) fn new(
        backup_repository_repository: Arc<dyn BackupRepositoryRepository>,
        repository_key_repository: Arc<dyn RepositoryKeyRepository>,
        snapshot_store: Arc<dyn SnapshotStore>,
        credential_vault: Arc<dyn CredentialVault>,
        session_provider: Arc<dyn SessionProvider>,
        config: Arc<core_config::CoreConfig>,
    ) -> Self {
        Self {
            backup_repository_repository,
            repository_key_repository,
            snapshot_store,
            credential_vault,
            session_provider,
            config,
        }
    }
}
