use sea_orm::entity::prelude::*;
use shared_types::{AgentId, OrganisationId};
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "agent")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: AgentId,
    pub organisation_id: OrganisationId,
    pub name: String,
    pub hostname: String,
    pub created_date: OffsetDateTime,
    pub last_modified: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::snapshot_mount::Entity")]
    SnapshotMount,
}

impl ActiveModelBehavior for ActiveModel {}

impl Related<super::snapshot_mount::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SnapshotMount.def()
    }
}
