//! Capability over an external content-addressed snapshot store.

use std::path::Path;

use shared_types::SnapshotId;

use crate::provider::backend::model::ConnectionParams;

pub mod error;
pub mod model;
pub mod restic;

use error::SnapshotStoreError;
use model::{FileNode, NodeChange, RestoreCommand, UpstreamSnapshot};

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait::async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Read-only access check, fails with [`SnapshotStoreError::AccessDenied`] on a wrong password.
    async fn authenticate(&self, params: &ConnectionParams) -> Result<(), SnapshotStoreError>;

    async fn list_snapshots(
        &self,
        params: &ConnectionParams,
    ) -> Result<Vec<UpstreamSnapshot>, SnapshotStoreError>;

    /// Accepts full and abbreviated ids.
    async fn get_snapshot(
        &self,
        params: &ConnectionParams,
        snapshot_id: &SnapshotId,
    ) -> Result<Option<UpstreamSnapshot>, SnapshotStoreError>;

    async fn list_files(
        &self,
        params: &ConnectionParams,
        snapshot_id: &SnapshotId,
        path_prefix: Option<String>,
    ) -> Result<Vec<FileNode>, SnapshotStoreError>;

    /// Every path whose node differs between the snapshots.
    async fn diff(
        &self,
        params: &ConnectionParams,
        from: &SnapshotId,
        to: &SnapshotId,
    ) -> Result<Vec<NodeChange>, SnapshotStoreError>;

    async fn read_file(
        &self,
        params: &ConnectionParams,
        snapshot_id: &SnapshotId,
        path: &str,
    ) -> Result<Vec<u8>, SnapshotStoreError>;

    async fn restore(
        &self,
        params: &ConnectionParams,
        command: RestoreCommand,
    ) -> Result<(), SnapshotStoreError>;

    async fn mount(
        &self,
        params: &ConnectionParams,
        snapshot_id: &SnapshotId,
        mount_path: &Path,
    ) -> Result<(), SnapshotStoreError>;

    async fn unmount(&self, mount_path: &Path) -> Result<(), SnapshotStoreError>;
}

/// Component-aware prefix check, `/home/a` contains `/home/a/b` but not `/home/ab`.
pub(crate) fn path_has_prefix(path: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        return true;
    }

    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}
