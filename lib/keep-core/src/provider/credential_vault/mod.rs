//! Process-held symmetric keys protecting repository secrets at rest.

use keep_crypto::KEY_LENGTH;
use keep_crypto::encryption::{decrypt_string, encrypt_string};
use secrecy::{ExposeSecret, SecretSlice, SecretString};
use zeroize::Zeroizing;

use crate::config::core_config::VaultConfig;

pub mod error;


use error::VaultError;

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait CredentialVault: Send + Sync {
    fn encrypt(&self, plaintext: &SecretString) -> Result<Vec<u8>, VaultError>;

    fn decrypt(&self, ciphertext: &[u8]) -> Result<SecretString, VaultError>;

    /// Encrypts under the recovery key, fails when none is configured.
    fn encrypt_escrow(&self, plaintext: &SecretString) -> Result<Vec<u8>, VaultError>;

    fn has_escrow(&self) -> bool;
}

pub struct ChaChaCredentialVault {
    key: SecretSlice<u8>,
    escrow_key: Option<SecretSlice<u8>>,
}

impl ChaChaCredentialVault {
    pub fn new(key: SecretSlice<u8>, escrow_key: Option<SecretSlice<u8>>) -> Self {
        Self { key, escrow_key }
    }

    pub fn from_config(config: &VaultConfig) -> Result<Self, VaultError> {
        let key = config
            .encryption_key
            .as_ref()
            .ok_or(VaultError::MissingKey)?;

        let escrow_key = config
            .escrow_key
            .as_ref()
            .map(|key| decode_key("escrowKey", key))
            .transpose()?;

        Ok(Self::new(decode_key("encryptionKey", key)?, escrow_key))
    }
}

fn decode_key(name: &'static str, key: &SecretString) -> Result<SecretSlice<u8>, VaultError> {
    let bytes = Zeroizing::new(
        hex::decode(key.expose_secret()).map_err(|err| VaultError::InvalidKey {
            name,
            reason: err.to_string(),
        })?,
    );

    if bytes.len() != KEY_LENGTH {
        return Err(VaultError::InvalidKey {
            name,
            reason: format!("expected {KEY_LENGTH} bytes, got {}", bytes.len()),
        });
    }

    Ok(SecretSlice::from(bytes.to_vec()))
}

impl CredentialVault for ChaChaCredentialVault {
    fn encrypt(&self, plaintext: &SecretString) -> Result<Vec<u8>, VaultError> {
        Ok(encrypt_string(plaintext, &self.key)?)
    }

    fn decrypt(&self, ciphertext: &[u8]) -> Result<SecretString, VaultError> {
        Ok(decrypt_string(ciphertext, &self.key)?)
    }

    fn encrypt_escrow(&self, plaintext: &SecretString) -> Result<Vec<u8>, VaultError> {
        let escrow_key = self
            .escrow_key
            .as_ref()
            .ok_or(VaultError::EscrowNotConfigured)?;

        Ok(encrypt_string(plaintext, escrow_key)?)
    }

    fn has_escrow(&self) -> bool {
        self.escrow_key.is_some()
    }
}
