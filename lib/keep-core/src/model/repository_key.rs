use shared_types::{RepositoryId, RepositoryKeyId};
use time::OffsetDateTime;

/// Passphrase of a backup repository, encrypted by the credential vault.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RepositoryKey {
    pub id: RepositoryKeyId,
    pub repository_id: RepositoryId,
    pub encrypted_password: Vec<u8>,
    /// Copy of the passphrase under the recovery key. Present iff escrow is enabled.
    pub escrow_encrypted_password: Option<Vec<u8>>,
    pub created_date: OffsetDateTime,
    pub last_modified: OffsetDateTime,
}

impl RepositoryKey {
    pub fn escrow_enabled(&self) -> bool {
        self.escrow_encrypted_password.is_some()
    }
}
