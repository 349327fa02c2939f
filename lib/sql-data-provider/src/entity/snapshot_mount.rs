use one_dto_mapper::{From, Into};
use sea_orm::entity::prelude::*;
use shared_types::{AgentId, OrganisationId, RepositoryId, SnapshotId, SnapshotMountId};
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "snapshot_mount")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: SnapshotMountId,
    pub organisation_id: OrganisationId,
    pub agent_id: AgentId,
    pub repository_id: RepositoryId,
    pub snapshot_id: SnapshotId,
    pub mount_path: String,
    pub status: MountStatus,
    pub mounted_at: Option<OffsetDateTime>,
    pub expires_at: Option<OffsetDateTime>,
    pub unmounted_at: Option<OffsetDateTime>,
    pub error_message: Option<String>,
    pub created_date: OffsetDateTime,
    pub last_modified: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::agent::Entity",
        from = "Column::AgentId",
        to = "super::agent::Column::Id",
        on_update = "Restrict",
        on_delete = "Restrict"
    )]
    Agent,
    #[sea_orm(
        belongs_to = "super::backup_repository::Entity",
        from = "Column::RepositoryId",
        to = "super::backup_repository::Column::Id",
        on_update = "Restrict",
        on_delete = "Restrict"
    )]
    BackupRepository,
}

impl Related<super::agent::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Agent.def()
    }
}

impl Related<super::backup_repository::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BackupRepository.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, Eq, PartialEq, EnumIter, DeriveActiveEnum, Into, From)]
#[from(keep_core::model::snapshot_mount::MountStatus)]
#[into(keep_core::model::snapshot_mount::MountStatus)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum MountStatus {
    #[sea_orm(string_value = "REQUESTED")]
    Requested,
    #[sea_orm(string_value = "MOUNTING")]
    Mounting,
    #[sea_orm(string_value = "MOUNTED")]
    Mounted,
    #[sea_orm(string_value = "UNMOUNTING")]
    Unmounting,
    #[sea_orm(string_value = "UNMOUNTED")]
    Unmounted,
    #[sea_orm(string_value = "ERROR")]
    Error,
}
