use sea_orm_migration::prelude::*;

use crate::m20260901_000001_initial::{ImportedSnapshot, Restore, SnapshotMount};

#[derive(DeriveMigrationName)]
pub struct Migration;

const INDEX_RESTORE_TARGET_AGENT_STATUS: &str = "index-Restore-TargetAgentId-Status";
const INDEX_SNAPSHOT_MOUNT_AGENT_STATUS: &str = "index-SnapshotMount-AgentId-Status";
const INDEX_SNAPSHOT_MOUNT_STATUS_EXPIRES_AT: &str = "index-SnapshotMount-Status-ExpiresAt";
const INDEX_IMPORTED_SNAPSHOT_REPOSITORY: &str = "index-ImportedSnapshot-RepositoryId";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name(INDEX_RESTORE_TARGET_AGENT_STATUS)
                    .table(Restore::Table)
                    .col(Restore::TargetAgentId)
                    .col(Restore::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(INDEX_SNAPSHOT_MOUNT_AGENT_STATUS)
                    .table(SnapshotMount::Table)
                    .col(SnapshotMount::AgentId)
                    .col(SnapshotMount::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(INDEX_SNAPSHOT_MOUNT_STATUS_EXPIRES_AT)
                    .table(SnapshotMount::Table)
                    .col(SnapshotMount::Status)
                    .col(SnapshotMount::ExpiresAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(INDEX_IMPORTED_SNAPSHOT_REPOSITORY)
                    .table(ImportedSnapshot::Table)
                    .col(ImportedSnapshot::RepositoryId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, table) in [
            (INDEX_RESTORE_TARGET_AGENT_STATUS, Restore::Table.into_iden()),
            (INDEX_SNAPSHOT_MOUNT_AGENT_STATUS, SnapshotMount::Table.into_iden()),
            (INDEX_SNAPSHOT_MOUNT_STATUS_EXPIRES_AT, SnapshotMount::Table.into_iden()),
            (INDEX_IMPORTED_SNAPSHOT_REPOSITORY, ImportedSnapshot::Table.into_iden()),
        ] {
            manager
                .drop_index(Index::drop().name(name).table(table).to_owned())
                .await?;
        }

        Ok(())
    }
}
