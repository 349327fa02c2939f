use keep_core::model::backup_repository::BackupRepository;
use keep_core::repository::error::DataLayerError;
use sea_orm::Set;

use crate::entity::backup_repository;
use crate::mapper::{counter_from_db, counter_to_db};

impl TryFrom<BackupRepository> for backup_repository::ActiveModel {
    type Error = DataLayerError;

    fn try_from(value: BackupRepository) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Set(value.id),
            organisation_id: Set(value.organisation_id),
            name: Set(value.name),
            backend_type: Set(value.backend_type.into()),
            encrypted_config: Set(value.encrypted_config),
            imported: Set(value.imported),
            imported_snapshot_count: Set(counter_to_db(value.imported_snapshot_count)?),
            created_date: Set(value.created_date),
            last_modified: Set(value.last_modified),
        })
    }
}

impl TryFrom<backup_repository::Model> for BackupRepository {
    type Error = DataLayerError;

    fn try_from(value: backup_repository::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id,
            organisation_id: value.organisation_id,
            name: value.name,
            backend_type: value.backend_type.into(),
            encrypted_config: value.encrypted_config,
            imported: value.imported,
            imported_snapshot_count: counter_from_db(value.imported_snapshot_count)?,
            created_date: value.created_date,
            last_modified: value.last_modified,
        })
    }
}
