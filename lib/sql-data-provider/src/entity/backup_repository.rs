use one_dto_mapper::{From, Into};
use sea_orm::entity::prelude::*;
use shared_types::{OrganisationId, RepositoryId};
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "backup_repository")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: RepositoryId,
    pub organisation_id: OrganisationId,
    pub name: String,
    pub backend_type: BackendType,
    pub encrypted_config: Vec<u8>,
    pub imported: bool,
    pub imported_snapshot_count: i64,
    pub created_date: OffsetDateTime,
    pub last_modified: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::repository_key::Entity")]
    RepositoryKey,
    #[sea_orm(has_many = "super::imported_snapshot::Entity")]
    ImportedSnapshot,
    #[sea_orm(has_many = "super::restore::Entity")]
    Restore,
    #[sea_orm(has_many = "super::snapshot_mount::Entity")]
    SnapshotMount,
}

impl ActiveModelBehavior for ActiveModel {}

impl Related<super::repository_key::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RepositoryKey.def()
    }
}

impl Related<super::imported_snapshot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ImportedSnapshot.def()
    }
}

#[derive(Clone, Debug, Eq, PartialEq, EnumIter, DeriveActiveEnum, Into, From)]
#[from(keep_core::config::core_config::BackendType)]
#[into(keep_core::config::core_config::BackendType)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum BackendType {
    #[sea_orm(string_value = "LOCAL")]
    Local,
    #[sea_orm(string_value = "S3")]
    S3,
    #[sea_orm(string_value = "B2")]
    B2,
    #[sea_orm(string_value = "REST")]
    Rest,
    #[sea_orm(string_value = "SFTP")]
    Sftp,
}
