use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::macros::impl_display;

/// Identifier of a snapshot inside the external snapshot store.
///
/// Opaque to the core, the store decides whether abbreviated forms resolve.
#[derive(Debug, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
#[repr(transparent)]
pub struct SnapshotId(String);

pub const SNAPSHOT_ID_MAX_LENGTH: usize = 255;

#[derive(Debug, thiserror::Error)]
pub enum SnapshotIdError {
    #[error("snapshot id must not be blank")]
    Blank,
    #[error("snapshot id must be at most {SNAPSHOT_ID_MAX_LENGTH} bytes, got {0}")]
    TooLong(usize),
}

impl SnapshotId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for SnapshotId {
    type Err = SnapshotIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(SnapshotIdError::Blank);
        }

        if s.len() > SNAPSHOT_ID_MAX_LENGTH {
            return Err(SnapshotIdError::TooLong(s.len()));
        }

        Ok(Self(s.to_owned()))
    }
}

impl TryFrom<String> for SnapshotId {
    type Error = SnapshotIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SnapshotId> for String {
    fn from(value: SnapshotId) -> Self {
        value.0
    }
}

impl_display!(SnapshotId);

#[cfg(feature = "sea-orm")]
use crate::macros::impls_for_seaorm_newtype;

#[cfg(feature = "sea-orm")]
impls_for_seaorm_newtype!(SnapshotId);
