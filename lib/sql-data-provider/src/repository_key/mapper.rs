use keep_core::model::repository_key::RepositoryKey;
use keep_core::repository::error::DataLayerError;
use sea_orm::Set;

use crate::entity::repository_key;

impl From<RepositoryKey> for repository_key::ActiveModel {
    fn from(value: RepositoryKey) -> Self {
        Self {
            id: Set(value.id),
            repository_id: Set(value.repository_id),
            encrypted_password: Set(value.encrypted_password),
            escrow_enabled: Set(value.escrow_encrypted_password.is_some()),
            escrow_encrypted_password: Set(value.escrow_encrypted_password),
            created_date: Set(value.created_date),
            last_modified: Set(value.last_modified),
        }
    }
}

impl TryFrom<repository_key::Model> for RepositoryKey {
    type Error = DataLayerError;

    fn try_from(value: repository_key::Model) -> Result<Self, Self::Error> {
        // escrow flag and escrow copy must agree
        if value.escrow_enabled != value.escrow_encrypted_password.is_some() {
            return Err(DataLayerError::MappingError);
        }

        Ok(Self {
            id: value.id,
            repository_id: value.repository_id,
            encrypted_password: value.encrypted_password,
            escrow_encrypted_password: value.escrow_encrypted_password,
            created_date: value.created_date,
            last_modified: value.last_modified,
        })
    }
}
