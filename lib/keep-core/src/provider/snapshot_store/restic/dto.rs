use serde::Deserialize;
use shared_types::SnapshotId;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::provider::snapshot_store::error::SnapshotStoreError;
use crate::provider::snapshot_store::model::{
    FileNode, NodeType, SnapshotSummary, UpstreamSnapshot,
};

const SHORT_ID_LENGTH: usize = 8;

#[derive(Debug, Deserialize)]
pub(super) struct SnapshotDTO {
    pub id: String,
    pub short_id: Option<String>,
    pub time: String,
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub paths: Vec<String>,
    pub tags: Option<Vec<String>>,
    pub summary: Option<SnapshotSummaryDTO>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SnapshotSummaryDTO {
    #[serde(default)]
    pub total_files_processed: u64,
    #[serde(default)]
    pub total_bytes_processed: u64,
}

/// One line of `restic ls --json`. Older releases tag lines with
/// `struct_type`, newer ones with `message_type`.
#[derive(Debug, Deserialize)]
pub(super) struct LsLineDTO {
    pub struct_type: Option<String>,
    pub message_type: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(default, rename = "type")]
    pub node_type: String,
    pub size: Option<u64>,
    pub mtime: Option<String>,
}

impl LsLineDTO {
    pub fn is_node(&self) -> bool {
        self.message_type.as_deref().or(self.struct_type.as_deref()) == Some("node")
    }
}

fn parse_time(value: &str) -> Result<OffsetDateTime, SnapshotStoreError> {
    OffsetDateTime::parse(value, &Rfc3339)
        .map_err(|err| SnapshotStoreError::Parse(format!("invalid time `{value}`: {err}")))
}

impl TryFrom<SnapshotDTO> for UpstreamSnapshot {
    type Error = SnapshotStoreError;

    fn try_from(value: SnapshotDTO) -> Result<Self, Self::Error> {
        let id: SnapshotId = value
            .id
            .parse()
            .map_err(|err| SnapshotStoreError::Parse(format!("invalid snapshot id: {err}")))?;

        Ok(Self {
            short_id: value
                .short_id
                .unwrap_or_else(|| value.id.chars().take(SHORT_ID_LENGTH).collect()),
            id,
            time: parse_time(&value.time)?,
            hostname: value.hostname,
            username: value.username,
            paths: value.paths,
            tags: value.tags.unwrap_or_default(),
            summary: value.summary.map(|summary| SnapshotSummary {
                total_files: summary.total_files_processed,
                total_bytes: summary.total_bytes_processed,
            }),
        })
    }
}

impl TryFrom<LsLineDTO> for FileNode {
    type Error = SnapshotStoreError;

    fn try_from(value: LsLineDTO) -> Result<Self, Self::Error> {
        let node_type = match value.node_type.as_str() {
            "file" => NodeType::File,
            "dir" => NodeType::Dir,
            "symlink" => NodeType::Symlink,
            _ => NodeType::Other,
        };

        Ok(Self {
            path: value.path,
            name: value.name,
            node_type,
            size: if node_type.is_dir() {
                0
            } else {
                value.size.unwrap_or_default()
            },
            mtime: value.mtime.as_deref().map(parse_time).transpose()?,
            content_hash: None,
        })
    }
}
