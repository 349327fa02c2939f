use thiserror::Error;

pub mod core_config;
pub mod validator;

#[cfg(test)]
mod test;

#[derive(Debug, Error)]
pub enum ConfigParsingError {
    #[error("Config parsing error: `{0}`")]
    GeneralParsingError(String),
}

#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("Config entry not found: `{0}`")]
    EntryNotFound(String),
    #[error("Config entry disabled: `{0}`")]
    EntryDisabled(String),
}
