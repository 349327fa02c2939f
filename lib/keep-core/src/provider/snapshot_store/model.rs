use std::path::PathBuf;

use shared_types::SnapshotId;
use time::OffsetDateTime;

/// Snapshot as listed by the snapshot store.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UpstreamSnapshot {
    pub id: SnapshotId,
    pub short_id: String,
    pub time: OffsetDateTime,
    pub hostname: String,
    pub username: String,
    pub paths: Vec<String>,
    pub tags: Vec<String>,
    pub summary: Option<SnapshotSummary>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SnapshotSummary {
    pub total_files: u64,
    pub total_bytes: u64,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NodeType {
    File,
    Dir,
    Symlink,
    Other,
}

impl NodeType {
    pub fn is_dir(&self) -> bool {
        matches!(self, NodeType::Dir)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FileNode {
    /// Absolute path inside the snapshot.
    pub path: String,
    pub name: String,
    pub node_type: NodeType,
    pub size: u64,
    pub mtime: Option<OffsetDateTime>,
    pub content_hash: Option<String>,
}

/// Same path in two snapshots, at least one side is present.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NodeChange {
    pub path: String,
    pub before: Option<FileNode>,
    pub after: Option<FileNode>,
}

impl NodeChange {
    pub fn node_type(&self) -> NodeType {
        self.after
            .as_ref()
            .or(self.before.as_ref())
            .map(|node| node.node_type)
            .unwrap_or(NodeType::Other)
    }
}

/// One restore invocation per step, executed in order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RestoreCommand {
    pub snapshot_id: SnapshotId,
    pub steps: Vec<RestoreStep>,
    pub verify: bool,
}

/// Restores the contents of `source_root` into `target`.
///
/// `include`/`exclude` are relative to `source_root`, an empty `include`
/// selects the whole subtree.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RestoreStep {
    /// Absolute snapshot path, `/` for the whole snapshot.
    pub source_root: String,
    pub target: PathBuf,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}
