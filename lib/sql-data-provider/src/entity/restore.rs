use keep_core::model::restore::CloudTargetType;
use one_dto_mapper::{From, Into};
use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use shared_types::{AgentId, OrganisationId, RepositoryId, RestoreId, SnapshotId};
use time::OffsetDateTime;

use super::common::StringList;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "restore")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: RestoreId,
    pub organisation_id: OrganisationId,
    pub target_agent_id: AgentId,
    pub source_agent_id: Option<AgentId>,
    pub repository_id: RepositoryId,
    pub snapshot_id: SnapshotId,
    pub target_path: Option<String>,
    pub include_paths: StringList,
    pub exclude_paths: StringList,
    pub path_mappings: PathMappingList,
    pub status: RestoreStatus,
    pub progress: RestoreProgress,
    pub cloud_target: Option<CloudTarget>,
    /// Vault ciphertext, set iff `cloud_target` is set.
    pub cloud_credentials: Option<Vec<u8>>,
    pub cloud_progress: Option<CloudProgress>,
    pub verify_upload: bool,
    pub error_message: Option<String>,
    pub failure_reason: Option<RestoreFailureReason>,
    pub created_date: OffsetDateTime,
    pub started_at: Option<OffsetDateTime>,
    pub completed_at: Option<OffsetDateTime>,
    pub last_modified: OffsetDateTime,
    pub version: i64,
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
    #[sea_orm(
        belongs_to = "super::agent::Entity",
        from = "Column::TargetAgentId",
        to = "super::agent::Column::Id",
        on_update = "Restrict",
        on_delete = "Restrict"
    )]
    TargetAgent,
}

impl Related<super::backup_repository::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BackupRepository.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, Eq, PartialEq, EnumIter, DeriveActiveEnum, Into, From)]
#[from(keep_core::model::restore::RestoreStatus)]
#[into(keep_core::model::restore::RestoreStatus)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum RestoreStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "RUNNING")]
    Running,
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
    #[sea_orm(string_value = "FAILED")]
    Failed,
}

#[derive(Clone, Debug, Eq, PartialEq, EnumIter, DeriveActiveEnum, Into, From)]
#[from(keep_core::model::restore::RestoreFailureReason)]
#[into(keep_core::model::restore::RestoreFailureReason)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum RestoreFailureReason {
    #[sea_orm(string_value = "ERROR")]
    Error,
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
}

#[derive(
    Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult, From, Into,
)]
#[from(keep_core::model::restore::RestoreProgress)]
#[into(keep_core::model::restore::RestoreProgress)]
#[serde(rename_all = "camelCase")]
pub struct RestoreProgress {
    pub files_restored: u64,
    pub bytes_restored: u64,
    pub total_files: Option<u64>,
    pub total_bytes: Option<u64>,
    pub current_file: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, From, Into)]
#[from(keep_core::model::restore::PathMapping)]
#[into(keep_core::model::restore::PathMapping)]
#[serde(rename_all = "camelCase")]
pub struct PathMapping {
    pub source_path: String,
    pub target_path: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct PathMappingList(pub Vec<PathMapping>);

/// Non-secret part of a cloud destination.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(rename_all = "camelCase")]
pub struct CloudTarget {
    pub r#type: CloudTargetType,
    pub bucket: Option<String>,
    pub region: Option<String>,
    pub endpoint: Option<String>,
    pub prefix: Option<String>,
    pub repository_uri: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult, From, Into)]
#[from(keep_core::model::restore::CloudProgress)]
#[into(keep_core::model::restore::CloudProgress)]
#[serde(rename_all = "camelCase")]
pub struct CloudProgress {
    pub total_files: Option<u64>,
    pub total_bytes: Option<u64>,
    pub uploaded_files: u64,
    pub uploaded_bytes: u64,
    pub current_file: Option<String>,
    pub verified_checksum: Option<String>,
}
