use std::sync::Arc;

use config::core_config::CoreConfig;
use proto::session_provider::SessionProvider;
use provider::credential_vault::error::VaultError;
use provider::credential_vault::{ChaChaCredentialVault, CredentialVault};
use provider::snapshot_store::SnapshotStore;
use provider::target_inspector::TargetInspector;
use repository::DataRepository;
use service::backup_repository::BackupRepositoryService;
use service::repository_import::RepositoryImportService;
use service::restore::RestoreService;
use service::snapshot_diff::SnapshotDiffService;
use service::snapshot_mount::SnapshotMountService;
use thiserror::Error;

pub mod config;
pub(crate) mod mapper;
pub mod model;
pub mod proto;
pub mod provider;
pub mod repository;
pub mod service;
pub(crate) mod validator;

#[derive(Debug, Error)]
pub enum KeepCoreBuildError {
    #[error("Credential vault: {0}")]
    Vault(#[from] VaultError),
}

#[derive(Clone)]
pub struct KeepCore {
    pub repository_import_service: RepositoryImportService,
    pub backup_repository_service: BackupRepositoryService,
    pub restore_service: RestoreService,
    pub snapshot_diff_service: SnapshotDiffService,
    pub snapshot_mount_service: SnapshotMountService,
    pub config: Arc<CoreConfig>,
}

impl KeepCore {
    /// Wires the services. The credential vault is built from `config.vault`
    /// and fails without an encryption key.
    pub fn new(
        data_provider: Arc<dyn DataRepository>,
        config: CoreConfig,
        snapshot_store: Arc<dyn SnapshotStore>,
        target_inspector: Arc<dyn TargetInspector>,
        session_provider: Arc<dyn SessionProvider>,
    ) -> Result<Self, KeepCoreBuildError> {
        let credential_vault: Arc<dyn CredentialVault> =
            Arc::new(ChaChaCredentialVault::from_config(&config.vault)?);
        let config = Arc::new(config);

        let agent_repository = data_provider.get_agent_repository();
        let backup_repository_repository = data_provider.get_backup_repository_repository();
        let repository_key_repository = data_provider.get_repository_key_repository();
        let imported_snapshot_repository = data_provider.get_imported_snapshot_repository();

        Ok(Self {
            repository_import_service: RepositoryImportService::new(
                agent_repository.clone(),
                backup_repository_repository.clone(),
                repository_key_repository.clone(),
                imported_snapshot_repository.clone(),
                snapshot_store.clone(),
                credential_vault.clone(),
                session_provider.clone(),
                config.clone(),
            ),
            backup_repository_service: BackupRepositoryService::new(
                backup_repository_repository.clone(),
                repository_key_repository.clone(),
                imported_snapshot_repository,
                credential_vault.clone(),
                session_provider.clone(),
                config.clone(),
            ),
            restore_service: RestoreService::new(
                agent_repository.clone(),
                backup_repository_repository.clone(),
                repository_key_repository.clone(),
                data_provider.get_restore_repository(),
                snapshot_store.clone(),
                credential_vault.clone(),
                target_inspector,
                session_provider.clone(),
                config.clone(),
            ),
            snapshot_diff_service: SnapshotDiffService::new(
                backup_repository_repository.clone(),
                repository_key_repository.clone(),
                snapshot_store.clone(),
                credential_vault.clone(),
                session_provider.clone(),
                config.clone(),
            ),
            snapshot_mount_service: SnapshotMountService::new(
                agent_repository,
                backup_repository_repository,
                repository_key_repository,
                data_provider.get_snapshot_mount_repository(),
                snapshot_store,
                credential_vault,
                session_provider,
                config.clone(),
            ),
            config,
        })
    }
}
