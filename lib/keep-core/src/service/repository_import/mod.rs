use std::sync::Arc;

use crate::config::core_config;
use crate::proto::session_provider::SessionProvider;
use crate::provider::credential_vault::CredentialVault;
use crate::provider::snapshot_store::SnapshotStore;
use crate::repository::agent_repository::AgentRepository;
use crate::repository::backup_repository_repository::BackupRepositoryRepository;
use crate::repository::imported_snapshot_repository::ImportedSnapshotRepository;
use crate::repository::repository_key_repository::RepositoryKeyRepository;

pub mod dto;
mod mapper;
pub mod service;
mod validator;


#[derive(Clone)]
pub struct RepositoryImportService {
    agent_repository: Arc<dyn AgentRepository>,
    backup_repository_repository: Arc<dyn BackupRepositoryRepository>,
    repository_key_repository: Arc<dyn RepositoryKeyRepository>,
    imported_snapshot_repository: Arc<dyn ImportedSnapshotRepository>,
    snapshot_store: Arc<dyn SnapshotStore>,
    credential_vault: Arc<dyn CredentialVault>,
    session_provider: Arc<dyn SessionProvider>,
    config: Arc<core_config::CoreConfig>,
}

impl RepositoryImportService {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        agent_repository: Arc<dyn AgentRepository>,
        backup_repository_repository: Arc<dyn BackupRepositoryRepository>,
        repository_key_repository: Arc<dyn RepositoryKeyRepository>,
        imported_snapshot_repository: Arc<dyn ImportedSnapshotRepository>,
        snapshot_store: Arc<dyn SnapshotStore>,
        credential_vault: Arc<dyn CredentialVault>,
        session_provider: Arc<dyn SessionProvider>,
        config: Arc<core_config::CoreConfig>,
    ) -> Self {
        Self {
            agent_repository,
            backup_repository_repository,
            repository_key_repository,
            imported_snapshot_repository,
            snapshot_store,
            credential_vault,
            session_provider,
            config,
        }
    }
}
