use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use figment::Figment;
#[cfg(feature = "config_env")]
use figment::providers::Env;
#[cfg(feature = "config_json")]
use figment::providers::Json;
#[cfg(feature = "config_yaml")]
use figment::providers::Yaml;
use figment::providers::{Data, Format};
use secrecy::SecretString;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use strum::{AsRefStr, Display, EnumString};

use super::{ConfigParsingError, ConfigValidationError};

type Dict<K, V> = BTreeMap<K, V>;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoCustomConfig;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppCustomConfigSerdeDTO<Custom> {
    #[serde(default)]
    pub(super) app: Custom,
}

#[derive(Debug, Default, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig<Custom> {
    pub core: CoreConfig,
    #[serde(default)]
    pub app: Custom,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoreConfig {
    pub(crate) backend: BackendConfig,
    #[serde(default)]
    pub(crate) restore: RestoreConfig,
    #[serde(default)]
    pub(crate) mount: MountConfig,
    #[serde(default)]
    pub(crate) diff: DiffConfig,
    #[serde(default)]
    pub snapshot_store: SnapshotStoreConfig,
    #[serde(default, skip_serializing)]
    pub vault: VaultConfig,
}

pub enum InputFormat {
    #[cfg(feature = "config_yaml")]
    Yaml(Data<Yaml>),
    #[cfg(feature = "config_json")]
    Json(Data<Json>),
}

impl InputFormat {
    #[cfg(feature = "config_yaml")]
    pub fn yaml_file(p: impl AsRef<Path>) -> InputFormat {
        InputFormat::Yaml(Yaml::file(p))
    }

    #[cfg(feature = "config_yaml")]
    pub fn yaml_str(s: impl AsRef<str>) -> InputFormat {
        InputFormat::Yaml(Yaml::string(s.as_ref()))
    }

    #[cfg(feature = "config_json")]
    pub fn json_file(p: impl AsRef<Path>) -> InputFormat {
        InputFormat::Json(Json::file(p))
    }

    #[cfg(feature = "config_json")]
    pub fn json_str(s: impl AsRef<str>) -> InputFormat {
        InputFormat::Json(Json::string(s.as_ref()))
    }
}

impl<Custom> AppConfig<Custom>
where
    Custom: Serialize + DeserializeOwned + Default,
{
    pub fn from_files(files: &[impl AsRef<Path>]) -> Result<Self, ConfigParsingError> {
        let mut inputs: Vec<InputFormat> = Vec::with_capacity(files.len());

        for path in files {
            #[cfg(feature = "config_yaml")]
            if path
                .as_ref()
                .extension()
                .is_some_and(|ext| ext == "yml" || ext == "yaml")
            {
                inputs.push(InputFormat::Yaml(Yaml::file(path)));
                continue;
            }

            #[cfg(feature = "config_json")]
            if path.as_ref().extension() == Some("json".as_ref()) {
                inputs.push(InputFormat::Json(Json::file(path)));
                continue;
            }

            return Err(ConfigParsingError::GeneralParsingError(format!(
                "Unsupported file or missing file extension: {:?}",
                path.as_ref().to_str()
            )));
        }

        AppConfig::parse(inputs)
    }

    #[cfg(feature = "config_yaml")]
    pub fn from_yaml(
        configs: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Result<Self, ConfigParsingError> {
        let inputs = configs
            .into_iter()
            .map(|s| Yaml::string(s.as_ref()))
            .map(InputFormat::Yaml);

        AppConfig::parse(inputs)
    }

    pub fn parse(
        inputs: impl IntoIterator<Item = InputFormat>,
    ) -> Result<Self, ConfigParsingError> {
        let mut figment = Figment::new();

        for data in inputs {
            figment = match data {
                #[cfg(feature = "config_yaml")]
                InputFormat::Yaml(content) => figment.merge(content),
                #[cfg(feature = "config_json")]
                InputFormat::Json(content) => figment.merge(content),
            };
        }

        #[cfg(feature = "config_env")]
        {
            figment = figment.merge(Env::prefixed("KEEP_").split("__").lowercase(false));
        }

        let core = figment
            .extract::<CoreConfig>()
            .map_err(|e| ConfigParsingError::GeneralParsingError(e.to_string()))?;
        let custom = figment
            .extract::<AppCustomConfigSerdeDTO<Custom>>()
            .map_err(|e| ConfigParsingError::GeneralParsingError(e.to_string()))?;
        Ok(Self {
            core,
            app: custom.app,
        })
    }
}

pub type BackendConfig = ConfigBlock<BackendType>;

#[derive(
    Debug,
    Copy,
    Clone,
    Display,
    EnumString,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
)]
pub enum BackendType {
    #[serde(rename = "LOCAL")]
    #[strum(serialize = "LOCAL")]
    Local,
    #[serde(rename = "S3")]
    #[strum(serialize = "S3")]
    S3,
    #[serde(rename = "B2")]
    #[strum(serialize = "B2")]
    B2,
    #[serde(rename = "REST")]
    #[strum(serialize = "REST")]
    Rest,
    #[serde(rename = "SFTP")]
    #[strum(serialize = "SFTP")]
    Sftp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RestoreConfig {
    pub max_active_per_agent: u64,
    /// Agent-side directory cloud restores are staged in before upload.
    pub staging_path: PathBuf,
}

impl Default for RestoreConfig {
    fn default() -> Self {
        Self {
            max_active_per_agent: 4,
            staging_path: PathBuf::from("/var/tmp/keep/restore"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MountConfig {
    pub max_active_per_agent: u64,
    pub base_path: PathBuf,
    pub default_timeout_minutes: u32,
    pub max_timeout_minutes: u32,
}

impl Default for MountConfig {
    fn default() -> Self {
        Self {
            max_active_per_agent: 2,
            base_path: PathBuf::from("/var/tmp/keep/mounts"),
            default_timeout_minutes: 60,
            max_timeout_minutes: 24 * 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiffConfig {
    pub max_text_file_size: u64,
    pub context_lines: usize,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            max_text_file_size: 1024 * 1024,
            context_lines: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SnapshotStoreConfig {
    pub binary: PathBuf,
    pub cache_dir: Option<PathBuf>,
}

impl Default for SnapshotStoreConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("restic"),
            cache_dir: None,
        }
    }
}

/// Hex encoded 32 byte keys protecting stored credentials.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultConfig {
    pub encryption_key: Option<SecretString>,
    pub escrow_key: Option<SecretString>,
}

/// Keyed entries of one config section, each naming its type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigBlock<T>(Dict<String, Fields<T>>);

impl<T> ConfigBlock<T> {
    pub fn get_fields(&self, key: &str) -> Result<&Fields<T>, ConfigValidationError> {
        self.0
            .get(key)
            .ok_or_else(|| ConfigValidationError::EntryNotFound(key.to_owned()))
    }

    pub fn get_if_enabled(&self, key: &str) -> Result<&Fields<T>, ConfigValidationError> {
        let fields = self.get_fields(key)?;

        if !fields.enabled() {
            return Err(ConfigValidationError::EntryDisabled(key.to_owned()));
        }

        Ok(fields)
    }
}

impl<T> Default for ConfigBlock<T> {
    fn default() -> Self {
        Self(Dict::default())
    }
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Fields<T> {
    pub r#type: T,
    pub display: String,
    pub order: Option<u64>,
    pub enabled: Option<bool>,
}

impl<T> Fields<T> {
    pub fn r#type(&self) -> &T {
        &self.r#type
    }

    pub fn enabled(&self) -> bool {
        self.enabled != Some(false)
    }
}
