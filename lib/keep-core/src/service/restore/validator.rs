use std::borrow::Cow;
use std::str::FromStr;

use secrecy::{ExposeSecret, SecretString};

use super::dto::{CloudTargetRequestDTO, CreateRestoreRequestDTO};
use crate::model::restore::{CloudTargetType, RestoreStatus};
use crate::provider::backend::model::redact_userinfo;
use crate::service::error::{
    BusinessLogicError, CloudTargetError, ServiceError, ValidationError,
};

fn validate_absolute(field: &'static str, path: &str) -> Result<(), ValidationError> {
    if !path.starts_with('/') {
        return Err(ValidationError::PathNotAbsolute {
            field,
            path: path.to_owned(),
        });
    }
    Ok(())
}

/// Request shape checks, run before any lookup or write.
pub(super) fn validate_create_request(
    request: &CreateRestoreRequestDTO,
) -> Result<(), ServiceError> {
    if request.source_agent_id == Some(request.target_agent_id) {
        return Err(BusinessLogicError::SourceAgentSameAsTarget.into());
    }

    match (&request.cloud_target, &request.target_path) {
        (Some(_), Some(_)) => return Err(ValidationError::TargetPathNotAllowedForCloud.into()),
        (Some(cloud_target), None) => {
            validate_cloud_target(cloud_target)?;
        }
        (None, Some(target_path)) => validate_absolute("target_path", target_path)?,
        (None, None) => return Err(ValidationError::MissingTargetPath.into()),
    }

    for path in &request.include_paths {
        validate_absolute("include_paths", path)?;
    }
    for path in &request.exclude_paths {
        validate_absolute("exclude_paths", path)?;
    }
    for mapping in &request.path_mappings {
        validate_absolute("path_mappings.source_path", &mapping.source_path)?;
        validate_absolute("path_mappings.target_path", &mapping.target_path)?;
    }

    Ok(())
}

fn filled(value: &Option<String>) -> bool {
    value.as_ref().is_some_and(|value| !value.trim().is_empty())
}

fn filled_secret(value: &Option<SecretString>) -> bool {
    value
        .as_ref()
        .is_some_and(|value| !value.expose_secret().trim().is_empty())
}

pub(super) fn validate_cloud_target(
    cloud_target: &CloudTargetRequestDTO,
) -> Result<CloudTargetType, CloudTargetError> {
    let target_type = CloudTargetType::from_str(&cloud_target.r#type)
        .map_err(|_| CloudTargetError::UnknownType(cloud_target.r#type.to_owned()))?;

    let require = |field: &'static str, present: bool| match present {
        true => Ok(()),
        false => Err(CloudTargetError::MissingField {
            target_type: target_type.to_string(),
            field,
        }),
    };

    match target_type {
        CloudTargetType::S3 => {
            require("bucket", filled(&cloud_target.bucket))?;
            require("access_key_id", filled(&cloud_target.access_key_id))?;
            require(
                "secret_access_key",
                filled_secret(&cloud_target.secret_access_key),
            )?;
        }
        CloudTargetType::B2 => {
            require("bucket", filled(&cloud_target.bucket))?;
            require("account_id", filled(&cloud_target.account_id))?;
            require(
                "application_key",
                filled_secret(&cloud_target.application_key),
            )?;
        }
        CloudTargetType::ResticRepo => {
            require("repository_uri", filled(&cloud_target.repository_uri))?;
            require("password", filled_secret(&cloud_target.password))?;
        }
    }

    for (field, value) in [
        ("endpoint", &cloud_target.endpoint),
        ("repository_uri", &cloud_target.repository_uri),
    ] {
        let embeds_password = value
            .as_deref()
            .is_some_and(|value| matches!(redact_userinfo(value), Cow::Owned(_)));
        if embeds_password {
            return Err(CloudTargetError::CredentialsInUrl { field });
        }
    }

    Ok(target_type)
}

pub(super) fn validate_transition(
    current: RestoreStatus,
    next: RestoreStatus,
) -> Result<(), BusinessLogicError> {
    if !current.can_transition_to(next) {
        return Err(BusinessLogicError::InvalidRestoreTransition {
            from: current,
            to: next,
        });
    }
    Ok(())
}
