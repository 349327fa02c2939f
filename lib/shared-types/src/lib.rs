mod agent_id;
mod imported_snapshot_id;
pub(crate) mod macros;
mod organisation_id;
mod repository_id;
mod restore_id;
mod snapshot_id;
mod snapshot_mount_id;

pub use agent_id::AgentId;
pub use imported_snapshot_id::ImportedSnapshotId;
pub use organisation_id::OrganisationId;
pub use repository_id::{RepositoryId, RepositoryKeyId};
pub use restore_id::RestoreId;
pub use snapshot_id::{SNAPSHOT_ID_MAX_LENGTH, SnapshotId, SnapshotIdError};
pub use snapshot_mount_id::SnapshotMountId;
