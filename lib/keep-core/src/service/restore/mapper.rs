use std::collections::HashSet;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use shared_types::{RestoreId, SnapshotId};
use time::OffsetDateTime;

use super::dto::{
    CloudDestinationDTO, CloudTargetRequestDTO, CloudTargetResponseDTO,
    CreateRestoreRequestDTO, PlannedNodeDTO, RestorePreviewFileDTO, RestorePreviewResponseDTO,
    RestoreResponseDTO,
};
use crate::model::restore::{
    CloudTarget, CloudTargetType, Restore, RestoreProgress, RestoreStatus,
};
use crate::provider::backend::model::{B2Backend, S3Backend};
use crate::provider::backend::Backend;
use crate::mapper::empty_secret;

/// Encrypted as a whole into [`CloudTarget::encrypted_credentials`].
#[skip_serializing_none]
#[derive(Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CloudCredentials {
    pub access_key_id: Option<String>,
    #[serde(default, with = "crate::mapper::opt_secret_string")]
    pub secret_access_key: Option<SecretString>,
    pub account_id: Option<String>,
    #[serde(default, with = "crate::mapper::opt_secret_string")]
    pub application_key: Option<SecretString>,
    #[serde(default, with = "crate::mapper::opt_secret_string")]
    pub password: Option<SecretString>,
}

impl From<CloudTargetRequestDTO> for CloudCredentials {
    fn from(value: CloudTargetRequestDTO) -> Self {
        Self {
            access_key_id: value.access_key_id,
            secret_access_key: value.secret_access_key,
            account_id: value.account_id,
            application_key: value.application_key,
            password: value.password,
        }
    }
}

pub(super) fn cloud_target_from_request(
    request: &CloudTargetRequestDTO,
    r#type: CloudTargetType,
    encrypted_credentials: Vec<u8>,
) -> CloudTarget {
    CloudTarget {
        r#type,
        bucket: request.bucket.clone(),
        region: request.region.clone(),
        endpoint: request.endpoint.clone(),
        prefix: request.prefix.clone(),
        repository_uri: request.repository_uri.clone(),
        encrypted_credentials,
    }
}

pub(super) fn restore_from_create_request(
    request: CreateRestoreRequestDTO,
    snapshot_id: SnapshotId,
    cloud_target: Option<CloudTarget>,
    now: OffsetDateTime,
) -> Restore {
    Restore {
        id: RestoreId::new_v4(),
        organisation_id: request.organisation_id,
        target_agent_id: request.target_agent_id,
        source_agent_id: request.source_agent_id,
        repository_id: request.repository_id,
        snapshot_id,
        target_path: request.target_path,
        include_paths: request.include_paths,
        exclude_paths: request.exclude_paths,
        path_mappings: request.path_mappings,
        status: RestoreStatus::Pending,
        progress: RestoreProgress::default(),
        cloud_progress: cloud_target.as_ref().map(|_| Default::default()),
        cloud_target,
        verify_upload: request.verify_upload,
        error_message: None,
        failure_reason: None,
        created_date: now,
        started_at: None,
        completed_at: None,
        last_modified: now,
        version: 0,
    }
}

impl From<CloudTarget> for CloudTargetResponseDTO {
    fn from(value: CloudTarget) -> Self {
        Self {
            r#type: value.r#type,
            bucket: value.bucket,
            region: value.region,
            endpoint: value.endpoint,
            prefix: value.prefix,
            repository_uri: value.repository_uri,
            has_credentials: !value.encrypted_credentials.is_empty(),
        }
    }
}

impl From<Restore> for RestoreResponseDTO {
    fn from(value: Restore) -> Self {
        Self {
            is_cross_agent: value.is_cross_agent(),
            id: value.id,
            organisation_id: value.organisation_id,
            target_agent_id: value.target_agent_id,
            source_agent_id: value.source_agent_id,
            repository_id: value.repository_id,
            snapshot_id: value.snapshot_id,
            target_path: value.target_path,
            include_paths: value.include_paths,
            exclude_paths: value.exclude_paths,
            path_mappings: value.path_mappings,
            status: value.status,
            progress: value.progress,
            cloud_target: value.cloud_target.map(Into::into),
            cloud_progress: value.cloud_progress,
            verify_upload: value.verify_upload,
            error_message: value.error_message,
            failure_reason: value.failure_reason,
            created_date: value.created_date,
            started_at: value.started_at,
            completed_at: value.completed_at,
            last_modified: value.last_modified,
        }
    }
}

/// Object storage destinations reuse the backend location format.
pub(super) fn cloud_destination(
    cloud_target: &CloudTarget,
    credentials: CloudCredentials,
    verify_upload: bool,
) -> CloudDestinationDTO {
    let (location, password, env) = match cloud_target.r#type {
        CloudTargetType::S3 => {
            let params = Backend::S3(S3Backend {
                bucket: cloud_target.bucket.clone().unwrap_or_default(),
                access_key_id: credentials.access_key_id.unwrap_or_default(),
                secret_access_key: credentials.secret_access_key.unwrap_or_else(empty_secret),
                region: cloud_target.region.clone(),
                endpoint: cloud_target.endpoint.clone(),
                prefix: cloud_target.prefix.clone(),
            })
            .to_connection_params(empty_secret());
            (params.repository, None, params.env)
        }
        CloudTargetType::B2 => {
            let params = Backend::B2(B2Backend {
                bucket: cloud_target.bucket.clone().unwrap_or_default(),
                account_id: credentials.account_id.unwrap_or_default(),
                application_key: credentials.application_key.unwrap_or_else(empty_secret),
                prefix: cloud_target.prefix.clone(),
            })
            .to_connection_params(empty_secret());
            (params.repository, None, params.env)
        }
        CloudTargetType::ResticRepo => (
            cloud_target.repository_uri.clone().unwrap_or_default(),
            credentials.password,
            Default::default(),
        ),
    };

    CloudDestinationDTO {
        r#type: cloud_target.r#type,
        location,
        password,
        env,
        verify_upload,
    }
}

pub(super) fn preview_from_plan(
    plan: Vec<PlannedNodeDTO>,
    conflicts: HashSet<String>,
    is_cloud: bool,
) -> RestorePreviewResponseDTO {
    let mut preview = RestorePreviewResponseDTO {
        total_files: 0,
        total_dirs: 0,
        total_size: 0,
        conflict_count: 0,
        files: Vec::with_capacity(plan.len()),
        disk_space_needed: 0,
    };

    for node in plan {
        if node.node_type.is_dir() {
            preview.total_dirs += 1;
        } else {
            preview.total_files += 1;
            preview.total_size += node.size;
        }

        let conflict = conflicts.contains(&node.target_path);
        if conflict {
            preview.conflict_count += 1;
        }

        preview.files.push(RestorePreviewFileDTO {
            source_path: node.source_path,
            target_path: node.target_path,
            node_type: node.node_type,
            size: node.size,
            conflict,
        });
    }

    if !is_cloud {
        preview.disk_space_needed = preview.total_size;
    }

    preview
}
