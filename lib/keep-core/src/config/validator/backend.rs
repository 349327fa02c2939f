use crate::config::ConfigValidationError;
use crate::config::core_config::{BackendConfig, BackendType};

/// Resolves a requested backend key into its configured type, rejecting
/// unknown and disabled entries.
pub(crate) fn validate_backend_type(
    value: &str,
    config: &BackendConfig,
) -> Result<BackendType, ConfigValidationError> {
    let fields = config.get_if_enabled(value)?;
    Ok(*fields.r#type())
}
