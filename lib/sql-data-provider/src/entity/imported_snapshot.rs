use sea_orm::entity::prelude::*;
use shared_types::{AgentId, ImportedSnapshotId, RepositoryId, SnapshotId};
use time::OffsetDateTime;

use super::common::StringList;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "imported_snapshot")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: ImportedSnapshotId,
    pub repository_id: RepositoryId,
    pub source_agent_id: Option<AgentId>,
    pub snapshot_id: SnapshotId,
    pub short_id: String,
    pub hostname: String,
    pub username: String,
    pub snapshot_time: OffsetDateTime,
    pub paths: StringList,
    pub tags: StringList,
    pub created_date: OffsetDateTime,
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
