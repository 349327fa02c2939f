//! Typed connection configuration of backup repositories.

use std::str::FromStr;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::config::core_config::BackendType;

pub mod error;
pub mod model;

#[cfg(test)]
mod test;

use error::BackendError;
use model::{B2Backend, ConnectionParams, LocalBackend, RestBackend, S3Backend, SftpBackend};

const DEFAULT_S3_ENDPOINT: &str = "s3.amazonaws.com";

#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum Backend {
    Local(LocalBackend),
    S3(S3Backend),
    B2(B2Backend),
    Rest(RestBackend),
    Sftp(SftpBackend),
}

/// Deserializes `raw_config` into the shape of the given backend type.
/// Unknown fields are rejected.
pub fn parse_backend(r#type: &str, raw_config: Value) -> Result<Backend, BackendError> {
    let backend_type = BackendType::from_str(r#type)
        .map_err(|_| BackendError::UnknownType(r#type.to_owned()))?;

    parse_typed_backend(backend_type, raw_config)
}

pub fn parse_typed_backend(
    backend_type: BackendType,
    raw_config: Value,
) -> Result<Backend, BackendError> {
    Ok(match backend_type {
        BackendType::Local => Backend::Local(from_config(backend_type, raw_config)?),
        BackendType::S3 => Backend::S3(from_config(backend_type, raw_config)?),
        BackendType::B2 => Backend::B2(from_config(backend_type, raw_config)?),
        BackendType::Rest => Backend::Rest(from_config(backend_type, raw_config)?),
        BackendType::Sftp => Backend::Sftp(from_config(backend_type, raw_config)?),
    })
}

/// The serde message may quote the offending value, so only the field name
/// is reported.
fn from_config<T: DeserializeOwned>(
    backend: BackendType,
    raw_config: Value,
) -> Result<T, BackendError> {
    serde_json::from_value(raw_config.clone()).map_err(|err| BackendError::InvalidConfig {
        backend,
        reason: config_error_reason::<T>(&err, &raw_config),
    })
}

fn config_error_reason<T: DeserializeOwned>(err: &serde_json::Error, raw_config: &Value) -> String {
    let message = err.to_string();
    for kind in ["unknown field", "missing field", "duplicate field"] {
        let name = message
            .strip_prefix(kind)
            .and_then(|rest| rest.trim_start().strip_prefix('`'))
            .and_then(|rest| rest.split('`').next());
        if let Some(name) = name {
            return format!("{kind} `{name}`");
        }
    }

    let Some(fields) = raw_config.as_object() else {
        return "config must be an object".to_owned();
    };

    // every field is optional on its own, so the one failing alone is the culprit
    fields
        .iter()
        .find(|(name, value)| {
            let single = serde_json::Map::from_iter([((*name).clone(), (*value).clone())]);
            serde_json::from_value::<T>(Value::Object(single)).is_err()
        })
        .map(|(name, _)| format!("invalid value of field `{name}`"))
        .unwrap_or_else(|| "invalid config".to_owned())
}

fn require(
    backend: BackendType,
    field: &'static str,
    value: &str,
) -> Result<(), BackendError> {
    if value.trim().is_empty() {
        return Err(BackendError::MissingField { backend, field });
    }
    Ok(())
}

/// Credentials belong in their own fields, a URL carries none.
fn require_url(backend: BackendType, field: &'static str, value: &str) -> Result<(), BackendError> {
    let url = Url::parse(value).map_err(|err| BackendError::InvalidField {
        backend,
        field,
        reason: err.to_string(),
    })?;
    if !url.username().is_empty() || url.password().is_some() {
        return Err(BackendError::CredentialsInUrl { backend, field });
    }
    Ok(())
}

impl Backend {
    pub fn backend_type(&self) -> BackendType {
        match self {
            Self::Local(_) => BackendType::Local,
            Self::S3(_) => BackendType::S3,
            Self::B2(_) => BackendType::B2,
            Self::Rest(_) => BackendType::Rest,
            Self::Sftp(_) => BackendType::Sftp,
        }
    }

    /// Checks required fields in declaration order, reporting the first one missing.
    pub fn validate(&self) -> Result<(), BackendError> {
        let backend = self.backend_type();

        match self {
            Self::Local(config) => require(backend, "path", &config.path),
            Self::S3(config) => {
                require(backend, "bucket", &config.bucket)?;
                require(backend, "accessKeyId", &config.access_key_id)?;
                require(
                    backend,
                    "secretAccessKey",
                    config.secret_access_key.expose_secret(),
                )?;
                if let Some(endpoint) = &config.endpoint {
                    require_url(backend, "endpoint", endpoint)?;
                }
                Ok(())
            }
            Self::B2(config) => {
                require(backend, "bucket", &config.bucket)?;
                require(backend, "accountId", &config.account_id)?;
                require(
                    backend,
                    "applicationKey",
                    config.application_key.expose_secret(),
                )
            }
            Self::Rest(config) => {
                require(backend, "url", &config.url)?;
                require_url(backend, "url", &config.url)
            }
            Self::Sftp(config) => {
                require(backend, "host", &config.host)?;
                require(backend, "user", &config.user)?;
                require(backend, "path", &config.path)?;
                if config.port == Some(0) {
                    return Err(BackendError::InvalidField {
                        backend,
                        field: "port",
                        reason: "port must be greater than zero".to_owned(),
                    });
                }
                Ok(())
            }
        }
    }

    /// Builds the snapshot store connection. Secrets only travel through
    /// [`SecretString`] values and never appear in `Debug` output.
    pub fn to_connection_params(&self, password: SecretString) -> ConnectionParams {
        match self {
            Self::Local(config) => ConnectionParams::new(&config.path, password),
            Self::S3(config) => {
                let endpoint = config
                    .endpoint
                    .as_deref()
                    .map(|endpoint| endpoint.trim_end_matches('/'))
                    .unwrap_or(DEFAULT_S3_ENDPOINT);
                let repository = join_location(
                    format!("s3:{endpoint}/{}", config.bucket),
                    config.prefix.as_deref(),
                    '/',
                );

                let params = ConnectionParams::new(repository, password)
                    .with_env("AWS_ACCESS_KEY_ID", &config.access_key_id)
                    .with_secret_env("AWS_SECRET_ACCESS_KEY", &config.secret_access_key);

                match &config.region {
                    Some(region) => params.with_env("AWS_DEFAULT_REGION", region),
                    None => params,
                }
            }
            Self::B2(config) => {
                let repository = format!(
                    "b2:{}:{}",
                    config.bucket,
                    config.prefix.as_deref().unwrap_or_default()
                );

                ConnectionParams::new(repository, password)
                    .with_env("B2_ACCOUNT_ID", &config.account_id)
                    .with_secret_env("B2_ACCOUNT_KEY", &config.application_key)
            }
            Self::Rest(config) => {
                let mut params = ConnectionParams::new(format!("rest:{}", config.url), password);
                if let Some(username) = &config.username {
                    params = params.with_env("RESTIC_REST_USERNAME", username);
                }
                if let Some(rest_password) = &config.password {
                    params = params.with_secret_env("RESTIC_REST_PASSWORD", rest_password);
                }
                params
            }
            Self::Sftp(config) => {
                let repository = match config.port {
                    Some(port) => format!(
                        "sftp://{}@{}:{port}/{}",
                        config.user,
                        config.host,
                        config.path.trim_start_matches('/')
                    ),
                    None => format!("sftp:{}@{}:{}", config.user, config.host, config.path),
                };
                ConnectionParams::new(repository, password)
            }
        }
    }

    /// Config with every secret field removed, safe to return to callers.
    pub fn public_config(&self) -> Value {
        let mut value = serde_json::to_value(self).unwrap_or_default();

        if let Some(map) = value.as_object_mut() {
            for field in ["secretAccessKey", "applicationKey", "password"] {
                map.remove(field);
            }
        }

        value
    }

    /// Full config including secrets, the plaintext the vault encrypts.
    pub(crate) fn to_secret_json(&self) -> Result<SecretString, BackendError> {
        serde_json::to_string(self)
            .map(SecretString::from)
            .map_err(|_| BackendError::InvalidConfig {
                backend: self.backend_type(),
                reason: "config could not be serialized".to_owned(),
            })
    }
}

fn join_location(base: String, prefix: Option<&str>, separator: char) -> String {
    match prefix.map(|prefix| prefix.trim_matches(separator)) {
        Some(prefix) if !prefix.is_empty() => format!("{base}{separator}{prefix}"),
        _ => base,
    }
}
