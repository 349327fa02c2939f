use shared_types::{AgentId, RepositoryId, RestoreId, SnapshotId, SnapshotMountId};
use strum::{Display, EnumIter};
use thiserror::Error;

use crate::config::ConfigValidationError;
use crate::model::restore::RestoreStatus;
use crate::model::snapshot_mount::{MountStatus, SnapshotMount};
use crate::provider::backend::error::BackendError;
use crate::provider::credential_vault::error::VaultError;
use crate::repository::error::DataLayerError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Mapping error: `{0}`")]
    MappingError(String),

    #[error(transparent)]
    Config(#[from] ConfigValidationError),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    CloudTarget(#[from] CloudTargetError),
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error(transparent)]
    EntityNotFound(#[from] EntityNotFoundError),
    #[error(transparent)]
    BusinessLogic(#[from] BusinessLogicError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Consistency(#[from] ConsistencyError),
    #[error("Vault error: `{0}`")]
    Vault(#[from] VaultError),
    #[error(transparent)]
    SnapshotStore(#[from] SnapshotStoreFailure),
    #[error(transparent)]
    Repository(#[from] DataLayerError),
}

#[derive(Debug, Error)]
pub enum CloudTargetError {
    #[error("Unknown cloud target type `{0}`")]
    UnknownType(String),
    #[error("Missing field `{field}` for cloud target `{target_type}`")]
    MissingField {
        target_type: String,
        field: &'static str,
    },
    #[error("Field `{field}` of cloud target must not embed credentials")]
    CredentialsInUrl { field: &'static str },
}

/// Fixed messages, upstream output never reaches callers.
#[derive(Debug, Error)]
pub enum AccessError {
    #[error("Invalid repository credentials")]
    InvalidCredentials,
    #[error("Repository unreachable")]
    RepositoryUnreachable,
}

/// Snapshot store failures outside authentication. Fixed messages, the
/// upstream output is only logged.
#[derive(Debug, Error)]
pub enum SnapshotStoreFailure {
    #[error("Snapshot not found in repository")]
    SnapshotNotFound,
    #[error("Path not found in snapshot")]
    PathNotFound,
    #[error("Snapshot store command failed")]
    CommandFailed,
    #[error("Unexpected snapshot store output")]
    InvalidOutput,
}

#[derive(Debug, Error)]
pub enum EntityNotFoundError {
    #[error("Repository `{0}` not found")]
    Repository(RepositoryId),
    #[error("Agent `{0}` not found")]
    Agent(AgentId),
    #[error("Snapshot `{0}` not found")]
    Snapshot(SnapshotId),
    #[error("Path `{path}` not found in snapshots")]
    SnapshotPath { path: String },
    #[error("Restore `{0}` not found")]
    Restore(RestoreId),
    #[error("Snapshot mount `{0}` not found")]
    SnapshotMount(SnapshotMountId),
}

#[derive(Debug, Error)]
pub enum BusinessLogicError {
    #[error("Snapshot already mounted on agent: `{}`", mount.id)]
    MountAlreadyActive { mount: Box<SnapshotMount> },
    #[error("Agent `{0}` reached the limit of active restores")]
    AgentRestoreLimitReached(AgentId),
    #[error("Agent `{0}` reached the limit of active mounts")]
    AgentMountLimitReached(AgentId),
    #[error("Source agent must differ from target agent")]
    SourceAgentSameAsTarget,
    #[error("Invalid restore transition from {from} to {to}")]
    InvalidRestoreTransition { from: RestoreStatus, to: RestoreStatus },
    #[error("Invalid mount transition from {from} to {to}")]
    InvalidMountTransition { from: MountStatus, to: MountStatus },
    #[error("Restore is not running, current state: {0}")]
    RestoreNotRunning(RestoreStatus),
    #[error("Progress of `{field}` must not decrease")]
    ProgressRegression { field: &'static str },
    #[error("Repository `{0}` import already completed")]
    RepositoryImportAlreadyComplete(RepositoryId),
    #[error("Backend type cannot change from {from} to {to}")]
    BackendTypeChange { from: String, to: String },
    #[error("Record was modified concurrently, reload and retry")]
    ConcurrentModification,
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Organisation does not match session")]
    Forbidden,
    #[error("`{field}` must be an absolute path: `{path}`")]
    PathNotAbsolute { field: &'static str, path: String },
    #[error("Target path required for local restores")]
    MissingTargetPath,
    #[error("Target path not allowed for cloud restores")]
    TargetPathNotAllowedForCloud,
    #[error("Name must not be blank")]
    BlankName,
    #[error("Invalid snapshot id `{0}`")]
    InvalidSnapshotId(String),
    #[error("Mount timeout must be positive")]
    InvalidMountTimeout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ImportStage {
    RepositoryKey,
    Snapshots,
    Finalize,
}

/// Partially persisted import, clean up via `delete_incomplete_import`.
#[derive(Debug, Error)]
pub enum ConsistencyError {
    #[error("Import of repository `{repository_id}` incomplete at stage {stage}: {source}")]
    ImportIncomplete {
        repository_id: RepositoryId,
        stage: ImportStage,
        source: DataLayerError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Access,
    NotFound,
    Conflict,
    Consistency,
    Encryption,
    Validation,
    Forbidden,
    Internal,
}

#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum ErrorCode {
    BR_0000,
    BR_0001,
    BR_0002,
    BR_0003,
    BR_0004,
    BR_0005,
    BR_0006,
    BR_0007,
    BR_0008,
    BR_0009,
    BR_0010,
    BR_0011,
    BR_0012,
    BR_0013,
    BR_0014,
    BR_0015,
    BR_0016,
    BR_0017,
    BR_0018,
    BR_0019,
    BR_0020,
    BR_0021,
    BR_0022,
    BR_0023,
    BR_0024,
    BR_0025,
    BR_0026,
    BR_0027,
    BR_0028,
    BR_0029,
    BR_0030,
    BR_0031,
    BR_0032,
    BR_0033,
    BR_0034,
    BR_0035,
    BR_0036,
    BR_0037,
    BR_0038,
    BR_0039,
    BR_0040,
    BR_0041,
    BR_0042,
    BR_0043,
}

impl ErrorCode {
    pub const fn msg(&self) -> &'static str {
        match self {
            ErrorCode::BR_0000 => "Unmapped error code",
            ErrorCode::BR_0001 => "Repository not found",
            ErrorCode::BR_0002 => "Agent not found",
            ErrorCode::BR_0003 => "Snapshot not found",
            ErrorCode::BR_0004 => "Path not found in snapshot",
            ErrorCode::BR_0005 => "Restore not found",
            ErrorCode::BR_0006 => "Snapshot mount not found",
            ErrorCode::BR_0007 => "Missing config entry",
            ErrorCode::BR_0008 => "Config entry disabled",
            ErrorCode::BR_0009 => "Invalid backend field",
            ErrorCode::BR_0010 => "Unknown backend type",
            ErrorCode::BR_0011 => "Invalid backend config",
            ErrorCode::BR_0012 => "Missing backend field",
            ErrorCode::BR_0013 => "Unknown cloud target type",
            ErrorCode::BR_0014 => "Missing cloud target field",
            ErrorCode::BR_0015 => "Invalid repository credentials",
            ErrorCode::BR_0016 => "Repository unreachable",
            ErrorCode::BR_0017 => "Snapshot already mounted",
            ErrorCode::BR_0018 => "Active restore limit reached",
            ErrorCode::BR_0019 => "Active mount limit reached",
            ErrorCode::BR_0020 => "Source agent same as target",
            ErrorCode::BR_0021 => "Invalid restore state transition",
            ErrorCode::BR_0022 => "Invalid mount state transition",
            ErrorCode::BR_0023 => "Restore not running",
            ErrorCode::BR_0024 => "Progress regression",
            ErrorCode::BR_0025 => "Repository import already complete",
            ErrorCode::BR_0026 => "Backend type change",
            ErrorCode::BR_0027 => "Forbidden",
            ErrorCode::BR_0028 => "Path not absolute",
            ErrorCode::BR_0029 => "Missing target path",
            ErrorCode::BR_0030 => "Target path not allowed",
            ErrorCode::BR_0031 => "Blank name",
            ErrorCode::BR_0032 => "Invalid snapshot id",
            ErrorCode::BR_0033 => "Invalid mount timeout",
            ErrorCode::BR_0034 => "Import incomplete",
            ErrorCode::BR_0035 => "Encryption error",
            ErrorCode::BR_0036 => "Escrow key not configured",
            ErrorCode::BR_0037 => "Snapshot store error",
            ErrorCode::BR_0038 => "Database error",
            ErrorCode::BR_0039 => "Concurrent modification",
            ErrorCode::BR_0040 => "Credentials embedded in URL",
            ErrorCode::BR_0041 => "Snapshot not found in store",
            ErrorCode::BR_0042 => "Path not found in store",
            ErrorCode::BR_0043 => "Unexpected snapshot store output",
        }
    }
}

impl ServiceError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            ServiceError::Config(error) => match error {
                ConfigValidationError::EntryNotFound(_) => ErrorCode::BR_0007,
                ConfigValidationError::EntryDisabled(_) => ErrorCode::BR_0008,
            },
            ServiceError::Backend(error) => match error {
                BackendError::UnknownType(_) => ErrorCode::BR_0010,
                BackendError::InvalidField { .. } => ErrorCode::BR_0009,
                BackendError::InvalidConfig { .. } => ErrorCode::BR_0011,
                BackendError::MissingField { .. } => ErrorCode::BR_0012,
                BackendError::CredentialsInUrl { .. } => ErrorCode::BR_0040,
            },
            ServiceError::CloudTarget(error) => error.error_code(),
            ServiceError::Access(error) => error.error_code(),
            ServiceError::EntityNotFound(error) => error.error_code(),
            ServiceError::BusinessLogic(error) => error.error_code(),
            ServiceError::Validation(error) => error.error_code(),
            ServiceError::Consistency(_) => ErrorCode::BR_0034,
            ServiceError::Vault(VaultError::EscrowNotConfigured) => ErrorCode::BR_0036,
            ServiceError::Vault(_) => ErrorCode::BR_0035,
            ServiceError::SnapshotStore(error) => error.error_code(),
            ServiceError::Repository(error) => error.error_code(),
            ServiceError::MappingError(_) => ErrorCode::BR_0000,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Config(_) | ServiceError::Backend(_) | ServiceError::CloudTarget(_) => {
                ErrorKind::Config
            }
            ServiceError::Vault(VaultError::EscrowNotConfigured | VaultError::MissingKey) => {
                ErrorKind::Config
            }
            ServiceError::Vault(_) => ErrorKind::Encryption,
            ServiceError::Access(_) => ErrorKind::Access,
            ServiceError::EntityNotFound(_) => ErrorKind::NotFound,
            ServiceError::BusinessLogic(
                BusinessLogicError::MountAlreadyActive { .. }
                | BusinessLogicError::ConcurrentModification,
            ) => ErrorKind::Conflict,
            ServiceError::BusinessLogic(_) => ErrorKind::Validation,
            ServiceError::Validation(ValidationError::Forbidden) => ErrorKind::Forbidden,
            ServiceError::Validation(_) => ErrorKind::Validation,
            ServiceError::Consistency(_) => ErrorKind::Consistency,
            ServiceError::SnapshotStore(
                SnapshotStoreFailure::SnapshotNotFound | SnapshotStoreFailure::PathNotFound,
            ) => ErrorKind::NotFound,
            ServiceError::SnapshotStore(_)
            | ServiceError::Repository(_)
            | ServiceError::MappingError(_) => ErrorKind::Internal,
        }
    }
}

impl CloudTargetError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            CloudTargetError::UnknownType(_) => ErrorCode::BR_0013,
            CloudTargetError::MissingField { .. } => ErrorCode::BR_0014,
            CloudTargetError::CredentialsInUrl { .. } => ErrorCode::BR_0040,
        }
    }
}

impl AccessError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            AccessError::InvalidCredentials => ErrorCode::BR_0015,
            AccessError::RepositoryUnreachable => ErrorCode::BR_0016,
        }
    }
}

impl SnapshotStoreFailure {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            SnapshotStoreFailure::SnapshotNotFound => ErrorCode::BR_0041,
            SnapshotStoreFailure::PathNotFound => ErrorCode::BR_0042,
            SnapshotStoreFailure::CommandFailed => ErrorCode::BR_0037,
            SnapshotStoreFailure::InvalidOutput => ErrorCode::BR_0043,
        }
    }
}

impl EntityNotFoundError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            EntityNotFoundError::Repository(_) => ErrorCode::BR_0001,
            EntityNotFoundError::Agent(_) => ErrorCode::BR_0002,
            EntityNotFoundError::Snapshot(_) => ErrorCode::BR_0003,
            EntityNotFoundError::SnapshotPath { .. } => ErrorCode::BR_0004,
            EntityNotFoundError::Restore(_) => ErrorCode::BR_0005,
            EntityNotFoundError::SnapshotMount(_) => ErrorCode::BR_0006,
        }
    }
}

impl BusinessLogicError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            BusinessLogicError::MountAlreadyActive { .. } => ErrorCode::BR_0017,
            BusinessLogicError::AgentRestoreLimitReached(_) => ErrorCode::BR_0018,
            BusinessLogicError::AgentMountLimitReached(_) => ErrorCode::BR_0019,
            BusinessLogicError::SourceAgentSameAsTarget => ErrorCode::BR_0020,
            BusinessLogicError::InvalidRestoreTransition { .. } => ErrorCode::BR_0021,
            BusinessLogicError::InvalidMountTransition { .. } => ErrorCode::BR_0022,
            BusinessLogicError::RestoreNotRunning(_) => ErrorCode::BR_0023,
            BusinessLogicError::ProgressRegression { .. } => ErrorCode::BR_0024,
            BusinessLogicError::RepositoryImportAlreadyComplete(_) => ErrorCode::BR_0025,
            BusinessLogicError::BackendTypeChange { .. } => ErrorCode::BR_0026,
            BusinessLogicError::ConcurrentModification => ErrorCode::BR_0039,
        }
    }
}

impl ValidationError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            ValidationError::Forbidden => ErrorCode::BR_0027,
            ValidationError::PathNotAbsolute { .. } => ErrorCode::BR_0028,
            ValidationError::MissingTargetPath => ErrorCode::BR_0029,
            ValidationError::TargetPathNotAllowedForCloud => ErrorCode::BR_0030,
            ValidationError::BlankName => ErrorCode::BR_0031,
            ValidationError::InvalidSnapshotId(_) => ErrorCode::BR_0032,
            ValidationError::InvalidMountTimeout => ErrorCode::BR_0033,
        }
    }
}
