use sea_orm_migration::prelude::*;

use crate::datatype::ColumnDefExt;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Agent::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Agent::Id).uuid_char().not_null().primary_key())
                    .col(ColumnDef::new(Agent::OrganisationId).uuid_char().not_null())
                    .col(ColumnDef::new(Agent::Name).string().not_null())
                    .col(ColumnDef::new(Agent::Hostname).string().not_null())
                    .col(
                        ColumnDef::new(Agent::CreatedDate)
                            .datetime_millisecond_precision(manager)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Agent::LastModified)
                            .datetime_millisecond_precision(manager)
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BackupRepository::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BackupRepository::Id)
                            .uuid_char()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(BackupRepository::OrganisationId)
                            .uuid_char()
                            .not_null(),
                    )
                    .col(ColumnDef::new(BackupRepository::Name).string().not_null())
                    .col(
                        ColumnDef::new(BackupRepository::BackendType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BackupRepository::EncryptedConfig)
                            .large_blob(manager)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BackupRepository::Imported)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(BackupRepository::ImportedSnapshotCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(BackupRepository::CreatedDate)
                            .datetime_millisecond_precision(manager)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BackupRepository::LastModified)
                            .datetime_millisecond_precision(manager)
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RepositoryKey::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RepositoryKey::Id)
                            .uuid_char()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RepositoryKey::RepositoryId)
                            .uuid_char()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(RepositoryKey::EncryptedPassword)
                            .large_blob(manager)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RepositoryKey::EscrowEnabled)
                            .boolean()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RepositoryKey::EscrowEncryptedPassword).large_blob(manager))
                    .col(
                        ColumnDef::new(RepositoryKey::CreatedDate)
                            .datetime_millisecond_precision(manager)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RepositoryKey::LastModified)
                            .datetime_millisecond_precision(manager)
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-RepositoryKey-RepositoryId")
                            .from_tbl(RepositoryKey::Table)
                            .from_col(RepositoryKey::RepositoryId)
                            .to_tbl(BackupRepository::Table)
                            .to_col(BackupRepository::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ImportedSnapshot::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ImportedSnapshot::Id)
                            .uuid_char()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ImportedSnapshot::RepositoryId)
                            .uuid_char()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ImportedSnapshot::SourceAgentId).uuid_char())
                    .col(
                        ColumnDef::new(ImportedSnapshot::SnapshotId)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ImportedSnapshot::ShortId).string().not_null())
                    .col(ColumnDef::new(ImportedSnapshot::Hostname).string().not_null())
                    .col(ColumnDef::new(ImportedSnapshot::Username).string().not_null())
                    .col(
                        ColumnDef::new(ImportedSnapshot::SnapshotTime)
                            .datetime_millisecond_precision(manager)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ImportedSnapshot::Paths).json().not_null())
                    .col(ColumnDef::new(ImportedSnapshot::Tags).json().not_null())
                    .col(
                        ColumnDef::new(ImportedSnapshot::CreatedDate)
                            .datetime_millisecond_precision(manager)
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-ImportedSnapshot-RepositoryId")
                            .from_tbl(ImportedSnapshot::Table)
                            .from_col(ImportedSnapshot::RepositoryId)
                            .to_tbl(BackupRepository::Table)
                            .to_col(BackupRepository::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-ImportedSnapshot-SourceAgentId")
                            .from_tbl(ImportedSnapshot::Table)
                            .from_col(ImportedSnapshot::SourceAgentId)
                            .to_tbl(Agent::Table)
                            .to_col(Agent::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Restore::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Restore::Id).uuid_char().not_null().primary_key())
                    .col(ColumnDef::new(Restore::OrganisationId).uuid_char().not_null())
                    .col(ColumnDef::new(Restore::TargetAgentId).uuid_char().not_null())
                    .col(ColumnDef::new(Restore::SourceAgentId).uuid_char())
                    .col(ColumnDef::new(Restore::RepositoryId).uuid_char().not_null())
                    .col(ColumnDef::new(Restore::SnapshotId).string_len(255).not_null())
                    .col(ColumnDef::new(Restore::TargetPath).text())
                    .col(ColumnDef::new(Restore::IncludePaths).json().not_null())
                    .col(ColumnDef::new(Restore::ExcludePaths).json().not_null())
                    .col(ColumnDef::new(Restore::PathMappings).json().not_null())
                    .col(ColumnDef::new(Restore::Status).string().not_null())
                    .col(ColumnDef::new(Restore::Progress).json().not_null())
                    .col(ColumnDef::new(Restore::CloudTarget).json())
                    .col(ColumnDef::new(Restore::CloudCredentials).large_blob(manager))
                    .col(ColumnDef::new(Restore::CloudProgress).json())
                    .col(
                        ColumnDef::new(Restore::VerifyUpload)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Restore::ErrorMessage).text())
                    .col(ColumnDef::new(Restore::FailureReason).string())
                    .col(
                        ColumnDef::new(Restore::CreatedDate)
                            .datetime_millisecond_precision(manager)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Restore::StartedAt).datetime_millisecond_precision(manager))
                    .col(ColumnDef::new(Restore::CompletedAt).datetime_millisecond_precision(manager))
                    .col(
                        ColumnDef::new(Restore::LastModified)
                            .datetime_millisecond_precision(manager)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Restore::Version)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-Restore-TargetAgentId")
                            .from_tbl(Restore::Table)
                            .from_col(Restore::TargetAgentId)
                            .to_tbl(Agent::Table)
                            .to_col(Agent::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-Restore-SourceAgentId")
                            .from_tbl(Restore::Table)
                            .from_col(Restore::SourceAgentId)
                            .to_tbl(Agent::Table)
                            .to_col(Agent::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-Restore-RepositoryId")
                            .from_tbl(Restore::Table)
                            .from_col(Restore::RepositoryId)
                            .to_tbl(BackupRepository::Table)
                            .to_col(BackupRepository::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SnapshotMount::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SnapshotMount::Id)
                            .uuid_char()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SnapshotMount::OrganisationId)
                            .uuid_char()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SnapshotMount::AgentId).uuid_char().not_null())
                    .col(
                        ColumnDef::new(SnapshotMount::RepositoryId)
                            .uuid_char()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SnapshotMount::SnapshotId)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(SnapshotMount::MountPath).text().not_null())
                    .col(ColumnDef::new(SnapshotMount::Status).string().not_null())
                    .col(ColumnDef::new(SnapshotMount::MountedAt).datetime_millisecond_precision(manager))
                    .col(ColumnDef::new(SnapshotMount::ExpiresAt).datetime_millisecond_precision(manager))
                    .col(
                        ColumnDef::new(SnapshotMount::UnmountedAt)
                            .datetime_millisecond_precision(manager),
                    )
                    .col(ColumnDef::new(SnapshotMount::ErrorMessage).text())
                    .col(
                        ColumnDef::new(SnapshotMount::CreatedDate)
                            .datetime_millisecond_precision(manager)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SnapshotMount::LastModified)
                            .datetime_millisecond_precision(manager)
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-SnapshotMount-AgentId")
                            .from_tbl(SnapshotMount::Table)
                            .from_col(SnapshotMount::AgentId)
                            .to_tbl(Agent::Table)
                            .to_col(Agent::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-SnapshotMount-RepositoryId")
                            .from_tbl(SnapshotMount::Table)
                            .from_col(SnapshotMount::RepositoryId)
                            .to_tbl(BackupRepository::Table)
                            .to_col(BackupRepository::Id),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            SnapshotMount::Table.into_iden(),
            Restore::Table.into_iden(),
            ImportedSnapshot::Table.into_iden(),
            RepositoryKey::Table.into_iden(),
            BackupRepository::Table.into_iden(),
            Agent::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).to_owned())
                .await?;
        }

        Ok(())
    }
}

#[derive(Iden)]
pub enum Agent {
    Table,
    Id,
    OrganisationId,
    Name,
    Hostname,
    CreatedDate,
    LastModified,
}

#[derive(Iden)]
pub enum BackupRepository {
    Table,
    Id,
    OrganisationId,
    Name,
    BackendType,
    EncryptedConfig,
    Imported,
    ImportedSnapshotCount,
    CreatedDate,
    LastModified,
}

#[derive(Iden)]
pub enum RepositoryKey {
    Table,
    Id,
    RepositoryId,
    EncryptedPassword,
    EscrowEnabled,
    EscrowEncryptedPassword,
    CreatedDate,
    LastModified,
}

#[derive(Iden)]
pub enum ImportedSnapshot {
    Table,
    Id,
    RepositoryId,
    SourceAgentId,
    SnapshotId,
    ShortId,
    Hostname,
    Username,
    SnapshotTime,
    Paths,
    Tags,
    CreatedDate,
}

#[derive(Iden)]
pub enum Restore {
    Table,
    Id,
    OrganisationId,
    TargetAgentId,
    SourceAgentId,
    RepositoryId,
    SnapshotId,
    TargetPath,
    IncludePaths,
    ExcludePaths,
    PathMappings,
    Status,
    Progress,
    CloudTarget,
    CloudCredentials,
    CloudProgress,
    VerifyUpload,
    ErrorMessage,
    FailureReason,
    CreatedDate,
    StartedAt,
    CompletedAt,
    LastModified,
    Version,
}

#[derive(Iden)]
pub enum SnapshotMount {
    Table,
    Id,
    OrganisationId,
    AgentId,
    RepositoryId,
    SnapshotId,
    MountPath,
    Status,
    MountedAt,
    ExpiresAt,
    UnmountedAt,
    ErrorMessage,
    CreatedDate,
    LastModified,
}
