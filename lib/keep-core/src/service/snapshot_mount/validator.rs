use crate::config::core_config::MountConfig;
use crate::model::snapshot_mount::MountStatus;
use crate::service::error::{BusinessLogicError, ValidationError};

pub(super) fn resolve_timeout(
    requested: Option<u32>,
    config: &MountConfig,
) -> Result<u32, ValidationError> {
    match requested {
        Some(0) => Err(ValidationError::InvalidMountTimeout),
        requested => Ok(requested
            .unwrap_or(config.default_timeout_minutes)
            .min(config.max_timeout_minutes)),
    }
}

pub(super) fn validate_transition(
    current: MountStatus,
    next: MountStatus,
) -> Result<(), BusinessLogicError> {
    if !current.can_transition_to(next) {
        return Err(BusinessLogicError::InvalidMountTransition {
            from: current,
            to: next,
        });
    }
    Ok(())
}
