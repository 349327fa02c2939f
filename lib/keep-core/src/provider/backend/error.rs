use thiserror::Error;

use crate::config::core_config::BackendType;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Unknown backend type `{0}`")]
    UnknownType(String),

    #[error("Invalid {backend} backend config: {reason}")]
    InvalidConfig {
        backend: BackendType,
        reason: String,
    },

    #[error("Missing required field `{field}` for {backend} backend")]
    MissingField {
        backend: BackendType,
        field: &'static str,
    },

    #[error("Invalid field `{field}` for {backend} backend: {reason}")]
    InvalidField {
        backend: BackendType,
        field: &'static str,
        reason: String,
    },

    #[error("Field `{field}` of {backend} backend must not embed credentials")]
    CredentialsInUrl {
        backend: BackendType,
        field: &'static str,
    },
}
