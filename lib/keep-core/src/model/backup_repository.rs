use shared_types::{OrganisationId, RepositoryId};
use time::OffsetDateTime;

use crate::config::core_config::BackendType;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BackupRepository {
    pub id: RepositoryId,
    pub organisation_id: OrganisationId,
    pub name: String,
    pub backend_type: BackendType,
    /// Vault ciphertext of the backend config JSON.
    pub encrypted_config: Vec<u8>,
    pub imported: bool,
    pub imported_snapshot_count: u64,
    pub created_date: OffsetDateTime,
    pub last_modified: OffsetDateTime,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct UpdateBackupRepositoryRequest {
    pub encrypted_config: Option<Vec<u8>>,
    pub imported: Option<bool>,
    pub imported_snapshot_count: Option<u64>,
}
