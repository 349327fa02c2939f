//! Maps snapshot entries onto their restore destination. Shared by preview
//! and job start so both report the same plan, and turned into the restore
//! steps that put every planned entry at its planned target.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::dto::PlannedNodeDTO;
use crate::model::restore::PathMapping;
use crate::provider::snapshot_store::model::{FileNode, RestoreStep};
use crate::provider::snapshot_store::path_has_prefix;

pub(crate) struct RestoreSelection<'a> {
    pub include: &'a [String],
    pub exclude: &'a [String],
    pub mappings: &'a [PathMapping],
    /// Destination root, `/` for cloud restores.
    pub target_root: &'a str,
}

impl RestoreSelection<'_> {
    fn is_selected(&self, path: &str) -> bool {
        let included = self.include.is_empty()
            || self
                .include
                .iter()
                .any(|include| path_has_prefix(path, include));

        // exclude wins over include
        included
            && !self
                .exclude
                .iter()
                .any(|exclude| path_has_prefix(path, exclude))
    }

    fn target_path(&self, path: &str) -> String {
        let mapped = self
            .mappings
            .iter()
            .filter(|mapping| path_has_prefix(path, &mapping.source_path))
            .max_by_key(|mapping| mapping.source_path.trim_end_matches('/').len())
            .map(|mapping| {
                let rest = &path[mapping.source_path.trim_end_matches('/').len()..];
                format!("{}{rest}", mapping.target_path.trim_end_matches('/'))
            })
            .unwrap_or_else(|| path.to_owned());

        join_root(self.target_root, &mapped)
    }

    fn step(
        &self,
        source_root: &str,
        target: &str,
        roots: &BTreeMap<String, &str>,
        execution_root: &Path,
    ) -> Option<RestoreStep> {
        if self
            .exclude
            .iter()
            .any(|exclude| path_has_prefix(source_root, exclude))
        {
            return None;
        }

        let include = if self.include.is_empty()
            || self
                .include
                .iter()
                .any(|include| path_has_prefix(source_root, include))
        {
            vec![]
        } else {
            let include: Vec<_> = self
                .include
                .iter()
                .filter_map(|include| rebase(include, source_root))
                .collect();
            if include.is_empty() {
                return None;
            }
            include
        };

        // nested roots are restored by their own step
        let exclude = self
            .exclude
            .iter()
            .chain(roots.keys().filter(|root| root.as_str() != source_root))
            .filter_map(|path| rebase(path, source_root))
            .collect();

        Some(RestoreStep {
            source_root: source_root.to_owned(),
            target: execution_path(execution_root, target),
            include,
            exclude,
        })
    }
}

fn normalize(path: &str) -> String {
    match path.trim_end_matches('/') {
        "" => "/".to_owned(),
        path => path.to_owned(),
    }
}

/// `path` relative to `root`, `/` when both point to the same entry.
fn rebase(path: &str, root: &str) -> Option<String> {
    if !path_has_prefix(path, root) {
        return None;
    }

    let path = path.trim_end_matches('/');
    let rest = &path[root.trim_end_matches('/').len()..];
    Some(normalize(rest))
}

fn execution_path(execution_root: &Path, target: &str) -> PathBuf {
    match target.trim_matches('/') {
        "" => execution_root.to_path_buf(),
        target => execution_root.join(target),
    }
}

fn join_root(root: &str, path: &str) -> String {
    let root = root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    match (root.is_empty(), path.is_empty()) {
        (true, _) => format!("/{path}"),
        (false, true) => root.to_owned(),
        (false, false) => format!("{root}/{path}"),
    }
}

pub(crate) fn resolve_restore_plan(
    nodes: Vec<FileNode>,
    selection: &RestoreSelection,
) -> Vec<PlannedNodeDTO> {
    nodes
        .into_iter()
        .filter(|node| selection.is_selected(&node.path))
        .map(|node| PlannedNodeDTO {
            target_path: selection.target_path(&node.path),
            source_path: node.path,
            node_type: node.node_type,
            size: node.size,
        })
        .collect()
}

/// Restore steps that place every entry of [`resolve_restore_plan`] below
/// `execution_root` instead of `target_root`.
///
/// The snapshot root and each mapping source get one step. A step excludes
/// the mapping sources nested below it, so every entry is written once.
pub(crate) fn restore_steps(
    selection: &RestoreSelection,
    execution_root: &Path,
) -> Vec<RestoreStep> {
    // equal sources resolve to the last mapping, like `target_path`
    let mut roots: BTreeMap<String, &str> = BTreeMap::from([("/".to_owned(), "/")]);
    for mapping in selection.mappings {
        roots.insert(
            normalize(&mapping.source_path),
            mapping.target_path.as_str(),
        );
    }

    roots
        .iter()
        .filter_map(|(source_root, target)| {
            selection.step(source_root, target, &roots, execution_root)
        })
        .collect()
}
