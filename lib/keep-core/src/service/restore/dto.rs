use std::collections::BTreeMap;
use std::fmt;

use secrecy::SecretString;
use shared_types::{AgentId, OrganisationId, RepositoryId, RestoreId, SnapshotId};
use time::OffsetDateTime;

use crate::model::common::GetListResponse;
use crate::model::restore::{
    CloudProgress, CloudTargetType, PathMapping, RestoreFailureReason, RestoreProgress,
    RestoreStatus,
};
use crate::provider::backend::model::ConnectionParams;
use crate::provider::snapshot_store::model::{NodeType, RestoreCommand};

/// Cloud destination as submitted. Secret fields are write-only.
#[derive(Clone, Debug, Default)]
pub struct CloudTargetRequestDTO {
    pub r#type: String,
    pub bucket: Option<String>,
    pub region: Option<String>,
    pub endpoint: Option<String>,
    pub prefix: Option<String>,
    pub repository_uri: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<SecretString>,
    pub account_id: Option<String>,
    pub application_key: Option<SecretString>,
    pub password: Option<SecretString>,
}

/// Local restores set `target_path`, cloud restores set `cloud_target`.
#[derive(Clone, Debug)]
pub struct CreateRestoreRequestDTO {
    pub organisation_id: OrganisationId,
    pub target_agent_id: AgentId,
    pub source_agent_id: Option<AgentId>,
    pub repository_id: RepositoryId,
    pub snapshot_id: SnapshotId,
    pub target_path: Option<String>,
    pub include_paths: Vec<String>,
    pub exclude_paths: Vec<String>,
    pub path_mappings: Vec<PathMapping>,
    pub cloud_target: Option<CloudTargetRequestDTO>,
    pub verify_upload: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CloudTargetResponseDTO {
    pub r#type: CloudTargetType,
    pub bucket: Option<String>,
    pub region: Option<String>,
    pub endpoint: Option<String>,
    pub prefix: Option<String>,
    pub repository_uri: Option<String>,
    pub has_credentials: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RestoreResponseDTO {
    pub id: RestoreId,
    pub organisation_id: OrganisationId,
    pub target_agent_id: AgentId,
    pub source_agent_id: Option<AgentId>,
    pub is_cross_agent: bool,
    pub repository_id: RepositoryId,
    pub snapshot_id: SnapshotId,
    pub target_path: Option<String>,
    pub include_paths: Vec<String>,
    pub exclude_paths: Vec<String>,
    pub path_mappings: Vec<PathMapping>,
    pub status: RestoreStatus,
    pub progress: RestoreProgress,
    pub cloud_target: Option<CloudTargetResponseDTO>,
    pub cloud_progress: Option<CloudProgress>,
    pub verify_upload: bool,
    pub error_message: Option<String>,
    pub failure_reason: Option<RestoreFailureReason>,
    pub created_date: OffsetDateTime,
    pub started_at: Option<OffsetDateTime>,
    pub completed_at: Option<OffsetDateTime>,
    pub last_modified: OffsetDateTime,
}

pub type GetRestoreListResponseDTO = GetListResponse<RestoreResponseDTO>;

#[derive(Clone, Debug, Default)]
pub struct UpdateRestoreProgressRequestDTO {
    pub progress: RestoreProgress,
    pub cloud_progress: Option<CloudProgress>,
}

/// Snapshot entry selected for restore and the place it lands on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannedNodeDTO {
    pub source_path: String,
    pub target_path: String,
    pub node_type: NodeType,
    pub size: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RestorePreviewFileDTO {
    pub source_path: String,
    pub target_path: String,
    pub node_type: NodeType,
    pub size: u64,
    pub conflict: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RestorePreviewResponseDTO {
    pub total_files: u64,
    pub total_dirs: u64,
    pub total_size: u64,
    pub conflict_count: u64,
    pub files: Vec<RestorePreviewFileDTO>,
    pub disk_space_needed: u64,
}

/// Upload destination of a cloud restore with decrypted credentials.
#[derive(Clone)]
pub struct CloudDestinationDTO {
    pub r#type: CloudTargetType,
    /// Location in snapshot store notation, e.g. `s3:host/bucket`.
    pub location: String,
    pub password: Option<SecretString>,
    pub env: BTreeMap<String, SecretString>,
    pub verify_upload: bool,
}

impl fmt::Debug for CloudDestinationDTO {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudDestinationDTO")
            .field("type", &self.r#type)
            .field("location", &self.location)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("env", &self.env.keys().collect::<Vec<_>>())
            .field("verify_upload", &self.verify_upload)
            .finish()
    }
}

/// Everything a worker needs to execute a started restore.
#[derive(Clone, Debug)]
pub struct RestoreJobDTO {
    pub restore: RestoreResponseDTO,
    pub source: ConnectionParams,
    pub cloud_destination: Option<CloudDestinationDTO>,
    pub command: RestoreCommand,
    pub plan: Vec<PlannedNodeDTO>,
}
