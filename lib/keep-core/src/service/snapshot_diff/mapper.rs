use keep_crypto::hasher::sha256_hex;
use similar::TextDiff;

use super::dto::{ChangeType, DiffStatsDTO, FileDiffContentDTO, SnapshotChangeDTO};
use crate::provider::snapshot_store::model::{FileNode, NodeChange, NodeType};

/// Only this much of the content is scanned for NUL bytes.
const BINARY_SNIFF_LEN: usize = 8 * 1024;

fn change(
    path: String,
    change_type: ChangeType,
    before: Option<&FileNode>,
    after: Option<&FileNode>,
) -> SnapshotChangeDTO {
    let node_type = after
        .or(before)
        .map(|node| node.node_type)
        .unwrap_or(NodeType::Other);

    SnapshotChangeDTO {
        path,
        change_type,
        node_type,
        is_dir: node_type.is_dir(),
        size_before: before.map(|node| node.size),
        size_after: after.map(|node| node.size),
        mtime_before: before.and_then(|node| node.mtime),
        mtime_after: after.and_then(|node| node.mtime),
    }
}

fn file_modified(before: &FileNode, after: &FileNode) -> bool {
    if before.size != after.size {
        return true;
    }

    match (&before.content_hash, &after.content_hash) {
        (Some(before), Some(after)) => before != after,
        _ => before.mtime != after.mtime,
    }
}

/// Directories are never reported as modified. A node that switched between
/// directory and file shows up as removed and added.
pub(super) fn classify_change(node_change: NodeChange) -> Vec<SnapshotChangeDTO> {
    let NodeChange {
        path,
        before,
        after,
    } = node_change;

    match (before.as_ref(), after.as_ref()) {
        (None, None) => vec![],
        (None, Some(after)) => vec![change(path, ChangeType::Added, None, Some(after))],
        (Some(before), None) => vec![change(path, ChangeType::Removed, Some(before), None)],
        (Some(before), Some(after)) => {
            match (before.node_type.is_dir(), after.node_type.is_dir()) {
                (true, true) => vec![],
                (false, false) if file_modified(before, after) => vec![change(
                    path,
                    ChangeType::Modified,
                    Some(before),
                    Some(after),
                )],
                (false, false) => vec![],
                _ => vec![
                    change(path.clone(), ChangeType::Removed, Some(before), None),
                    change(path, ChangeType::Added, None, Some(after)),
                ],
            }
        }
    }
}

pub(super) fn diff_stats(changes: &[SnapshotChangeDTO]) -> DiffStatsDTO {
    changes
        .iter()
        .fold(DiffStatsDTO::default(), |mut stats, change| {
            let before = change.size_before.unwrap_or_default();
            let after = change.size_after.unwrap_or_default();

            match (change.change_type, change.is_dir) {
                (ChangeType::Added, true) => stats.dirs_added += 1,
                (ChangeType::Removed, true) => stats.dirs_removed += 1,
                (ChangeType::Added, false) => {
                    stats.files_added += 1;
                    stats.total_size_added += after;
                }
                (ChangeType::Removed, false) => {
                    stats.files_removed += 1;
                    stats.total_size_removed += before;
                }
                (ChangeType::Modified, _) => {
                    stats.files_modified += 1;
                    if after > before {
                        stats.total_size_added += after - before;
                    } else {
                        stats.total_size_removed += before - after;
                    }
                }
            }

            stats
        })
}

/// One side of a single file diff. Content stays unread above the text size limit.
pub(super) struct FileVersion {
    pub node: FileNode,
    pub content: Option<Vec<u8>>,
}

pub(super) fn is_binary(version: &FileVersion, max_text_size: u64) -> bool {
    let Some(content) = version.content.as_deref() else {
        return true;
    };

    content.len() as u64 > max_text_size
        || content.iter().take(BINARY_SNIFF_LEN).any(|byte| *byte == 0)
        || std::str::from_utf8(content).is_err()
}

pub(super) fn file_change_type(
    old: Option<&FileVersion>,
    new: Option<&FileVersion>,
) -> Option<ChangeType> {
    match (old, new) {
        (None, Some(_)) => Some(ChangeType::Added),
        (Some(_), None) => Some(ChangeType::Removed),
        (Some(old), Some(new)) => {
            let modified = match (&old.content, &new.content) {
                (Some(old_content), Some(new_content)) => old_content != new_content,
                _ => file_modified(&old.node, &new.node),
            };
            modified.then_some(ChangeType::Modified)
        }
        (None, None) => None,
    }
}

pub(super) fn binary_diff(old: Option<&FileVersion>, new: Option<&FileVersion>) -> FileDiffContentDTO {
    let sha256 = |version: &FileVersion| version.content.as_deref().map(sha256_hex);

    FileDiffContentDTO::Binary {
        old_size: old.map(|version| version.node.size),
        new_size: new.map(|version| version.node.size),
        old_sha256: old.and_then(sha256),
        new_sha256: new.and_then(sha256),
    }
}

/// Both sides must already be known as text.
pub(super) fn text_diff(
    path: &str,
    old: Option<&str>,
    new: Option<&str>,
    context_lines: usize,
) -> FileDiffContentDTO {
    let unified_diff = TextDiff::from_lines(old.unwrap_or_default(), new.unwrap_or_default())
        .unified_diff()
        .context_radius(context_lines)
        .header(&format!("a{path}"), &format!("b{path}"))
        .to_string();

    FileDiffContentDTO::Text {
        unified_diff,
        old_content: old.map(ToOwned::to_owned),
        new_content: new.map(ToOwned::to_owned),
    }
}
