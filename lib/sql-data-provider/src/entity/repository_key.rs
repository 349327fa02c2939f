use sea_orm::entity::prelude::*;
use shared_types::{RepositoryId, RepositoryKeyId};
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "repository_key")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: RepositoryKeyId,
    #[sea_orm(unique)]
    pub repository_id: RepositoryId,
    pub encrypted_password: Vec<u8>,
    pub escrow_enabled: bool,
    pub escrow_encrypted_password: Option<Vec<u8>>,
    pub created_date: OffsetDateTime,
    pub last_modified: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::backup_repository::Entity",
        from = "Column::RepositoryId",
        to = "super::backup_repository::Column::Id",
        on_update = "Restrict",
        on_delete = "Restrict"
    )]
    BackupRepository,
}

impl Related<super::backup_repository::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BackupRepository.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
