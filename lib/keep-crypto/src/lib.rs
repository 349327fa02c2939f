//! Symmetric authenticated encryption helpers used to protect repository
//! credentials at rest.

pub mod encryption;
pub mod hasher;
pub mod utilities;

pub use encryption::{EncryptionError, KEY_LENGTH, MAX_PLAINTEXT_LENGTH};
