use keep_crypto::EncryptionError;
use thiserror::Error;

/// Vault failures never carry key material or plaintext.
#[derive(Debug, Error)]
pub enum VaultError {
    #[error("Vault encryption key not configured")]
    MissingKey,
    #[error("Invalid vault key `{name}`: {reason}")]
    InvalidKey { name: &'static str, reason: String },
    #[error("Escrow requested but no recovery key configured")]
    EscrowNotConfigured,
    #[error("Encryption error: {0}")]
    Encryption(#[from] EncryptionError),
}
