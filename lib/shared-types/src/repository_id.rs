use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::macros::impls_for_uuid_newtype;

/// Backup repository (configured, credentialed destination).
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct RepositoryId(Uuid);

impls_for_uuid_newtype!(RepositoryId);

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct RepositoryKeyId(Uuid);

impls_for_uuid_newtype!(RepositoryKeyId);

#[cfg(feature = "sea-orm")]
use crate::macros::impls_for_seaorm_newtype;

#[cfg(feature = "sea-orm")]
impls_for_seaorm_newtype!(RepositoryId);

#[cfg(feature = "sea-orm")]
impls_for_seaorm_newtype!(RepositoryKeyId);
