use shared_types::{OrganisationId, RepositoryId, SnapshotId};
use strum::Display;
use time::OffsetDateTime;

use crate::provider::snapshot_store::model::NodeType;

#[derive(Clone, Debug)]
pub struct CompareSnapshotsRequestDTO {
    pub organisation_id: OrganisationId,
    pub repository_id: RepositoryId,
    pub snapshot_id_1: SnapshotId,
    pub snapshot_id_2: SnapshotId,
}

#[derive(Clone, Debug)]
pub struct FileDiffRequestDTO {
    pub organisation_id: OrganisationId,
    pub repository_id: RepositoryId,
    pub snapshot_id_1: SnapshotId,
    pub snapshot_id_2: SnapshotId,
    /// Absolute path inside both snapshots.
    pub path: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeType {
    Added,
    Removed,
    Modified,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SnapshotChangeDTO {
    pub path: String,
    pub change_type: ChangeType,
    pub node_type: NodeType,
    pub is_dir: bool,
    pub size_before: Option<u64>,
    pub size_after: Option<u64>,
    pub mtime_before: Option<OffsetDateTime>,
    pub mtime_after: Option<OffsetDateTime>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DiffStatsDTO {
    pub files_added: u64,
    pub files_removed: u64,
    pub files_modified: u64,
    pub dirs_added: u64,
    pub dirs_removed: u64,
    pub total_size_added: u64,
    pub total_size_removed: u64,
}

#[derive(Clone, Debug)]
pub struct CompareSnapshotsResponseDTO {
    pub snapshot_id_1: SnapshotId,
    pub snapshot_id_2: SnapshotId,
    pub stats: DiffStatsDTO,
    /// Sorted by path.
    pub changes: Vec<SnapshotChangeDTO>,
}

#[derive(Clone, Debug)]
pub struct FileDiffResponseDTO {
    pub path: String,
    /// `None` when both versions are identical.
    pub change_type: Option<ChangeType>,
    pub content: FileDiffContentDTO,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FileDiffContentDTO {
    Text {
        unified_diff: String,
        old_content: Option<String>,
        new_content: Option<String>,
    },
    Binary {
        old_size: Option<u64>,
        new_size: Option<u64>,
        /// `None` for a side larger than the text size limit, it is not read.
        old_sha256: Option<String>,
        new_sha256: Option<String>,
    },
}
