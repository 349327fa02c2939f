use keep_core::model::restore::{CloudTarget, Restore};
use keep_core::repository::error::DataLayerError;
use one_dto_mapper::convert_inner;
use sea_orm::Set;

use crate::entity::restore;
use crate::mapper::{counter_from_db, counter_to_db};

impl TryFrom<Restore> for restore::ActiveModel {
    type Error = DataLayerError;

    fn try_from(value: Restore) -> Result<Self, Self::Error> {
        let (cloud_target, cloud_credentials) = match value.cloud_target {
            Some(target) => (
                Some(restore::CloudTarget {
                    r#type: target.r#type,
                    bucket: target.bucket,
                    region: target.region,
                    endpoint: target.endpoint,
                    prefix: target.prefix,
                    repository_uri: target.repository_uri,
                }),
                Some(target.encrypted_credentials),
            ),
            None => (None, None),
        };

        Ok(Self {
            id: Set(value.id),
            organisation_id: Set(value.organisation_id),
            target_agent_id: Set(value.target_agent_id),
            source_agent_id: Set(value.source_agent_id),
            repository_id: Set(value.repository_id),
            snapshot_id: Set(value.snapshot_id),
            target_path: Set(value.target_path),
            include_paths: Set(value.include_paths.into()),
            exclude_paths: Set(value.exclude_paths.into()),
            path_mappings: Set(restore::PathMappingList(convert_inner(value.path_mappings))),
            status: Set(value.status.into()),
            progress: Set(value.progress.into()),
            cloud_target: Set(cloud_target),
            cloud_credentials: Set(cloud_credentials),
            cloud_progress: Set(convert_inner(value.cloud_progress)),
            verify_upload: Set(value.verify_upload),
            error_message: Set(value.error_message),
            failure_reason: Set(convert_inner(value.failure_reason)),
            created_date: Set(value.created_date),
            started_at: Set(value.started_at),
            completed_at: Set(value.completed_at),
            last_modified: Set(value.last_modified),
            version: Set(counter_to_db(value.version)?),
        })
    }
}

impl TryFrom<restore::Model> for Restore {
    type Error = DataLayerError;

    fn try_from(value: restore::Model) -> Result<Self, Self::Error> {
        let cloud_target = match (value.cloud_target, value.cloud_credentials) {
            (Some(target), Some(encrypted_credentials)) => Some(CloudTarget {
                r#type: target.r#type,
                bucket: target.bucket,
                region: target.region,
                endpoint: target.endpoint,
                prefix: target.prefix,
                repository_uri: target.repository_uri,
                encrypted_credentials,
            }),
            (None, None) => None,
            _ => return Err(DataLayerError::MappingError),
        };

        Ok(Self {
            id: value.id,
            organisation_id: value.organisation_id,
            target_agent_id: value.target_agent_id,
            source_agent_id: value.source_agent_id,
            repository_id: value.repository_id,
            snapshot_id: value.snapshot_id,
            target_path: value.target_path,
            include_paths: value.include_paths.into(),
            exclude_paths: value.exclude_paths.into(),
            path_mappings: convert_inner(value.path_mappings.0),
            status: value.status.into(),
            progress: value.progress.into(),
            cloud_target,
            cloud_progress: convert_inner(value.cloud_progress),
            verify_upload: value.verify_upload,
            error_message: value.error_message,
            failure_reason: convert_inner(value.failure_reason),
            created_date: value.created_date,
            started_at: value.started_at,
            completed_at: value.completed_at,
            last_modified: value.last_modified,
            version: counter_from_db(value.version)?,
        })
    }
}
