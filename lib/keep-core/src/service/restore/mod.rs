use std::sync::Arc;

use crate::config::core_config;
use crate::proto::session_provider::SessionProvider;
use crate::provider::credential_vault::CredentialVault;
use crate::provider::snapshot_store::SnapshotStore;
use crate::provider::target_inspector::TargetInspector;
use crate::repository::agent_repository::AgentRepository;
use crate::repository::backup_repository_repository::BackupRepositoryRepository;
use crate::repository::repository_key_repository::RepositoryKeyRepository;
use crate::repository::restore_repository::RestoreRepository;

pub mod dto;
mod mapper;
pub(crate) mod path_resolver;
pub mod service;
mod validator;


#[derive(Clone)]
pub struct RestoreService {
    agent_repository: Arc<dyn AgentRepository>,
    backup_repository_repository: Arc<dyn BackupRepositoryRepository>,
    repository_key_repository: Arc<dyn RepositoryKeyRepository>,
    restore_repository: Arc<dyn RestoreRepository>,
    snapshot_store: Arc<dyn SnapshotStore>,
    credential_vault: Arc<dyn CredentialVault>,
    target_inspector: Arc<dyn TargetInspector>,
    session_provider: Arc<dyn SessionProvider>,
    config: Arc<core_config::CoreConfig>,
}

impl RestoreService {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        agent_repository: Arc<dyn AgentRepository>,
        backup_repository_repository: Arc<dyn BackupRepositoryRepository>,
        repository_key_repository: Arc<dyn RepositoryKeyRepository>,
        restore_repository: Arc<dyn RestoreRepository>,
        snapshot_store: Arc<dyn SnapshotStore>,
        credential_vault: Arc<dyn CredentialVault>,
        target_inspector: Arc<dyn TargetInspector>,
        session_provider: Arc<dyn SessionProvider>,
        config: Arc<core_config::CoreConfig>,
    ) -> Self {
        Self {
            agent_repository,
            backup_repository_repository,
            repository_key_repository,
            restore_repository,
            snapshot_store,
            credential_vault,
            target_inspector,
            session_provider,
            config,
        }
    }
}
