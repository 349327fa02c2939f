use shared_types::{OrganisationId, RepositoryId, SnapshotId};

use super::SnapshotDiffService;
use super::dto::{
    CompareSnapshotsRequestDTO, CompareSnapshotsResponseDTO, FileDiffRequestDTO,
    FileDiffResponseDTO,
};
use super::mapper::{
    FileVersion, binary_diff, classify_change, diff_stats, file_change_type, is_binary, text_diff,
};
use crate::provider::backend::model::ConnectionParams;
use crate::provider::snapshot_store::error::SnapshotStoreError;
use crate::service::common::{
    RepositoryContext, load_repository_context, map_store_error, resolve_snapshot,
};
use crate::service::error::{EntityNotFoundError, ServiceError, ValidationError};
use crate::validator::throw_if_org_not_matching_session;

impl SnapshotDiffService {
    /// Lists every path that differs between two snapshots of a repository
    #[tracing::instrument(level = "debug", skip_all, err(Debug))]
    pub async fn compare(
        &self,
        request: CompareSnapshotsRequestDTO,
    ) -> Result<CompareSnapshotsResponseDTO, ServiceError> {
        let (context, snapshot_id_1, snapshot_id_2) = self
            .resolve_pair(
                &request.organisation_id,
                &request.repository_id,
                &request.snapshot_id_1,
                &request.snapshot_id_2,
            )
            .await?;

        let node_changes = self
            .snapshot_store
            .diff(&context.params, &snapshot_id_1, &snapshot_id_2)
            .await
            .map_err(map_store_error)?;

        let mut changes: Vec<_> = node_changes
            .into_iter()
            .flat_map(classify_change)
            .collect();
        changes.sort_by(|a, b| a.path.cmp(&b.path));

        let stats = diff_stats(&changes);
        tracing::debug!(
            changes = changes.len(),
            "Compared snapshots {snapshot_id_1} and {snapshot_id_2}"
        );

        Ok(CompareSnapshotsResponseDTO {
            snapshot_id_1,
            snapshot_id_2,
            stats,
            changes,
        })
    }

    /// Content diff of a single path, absent on one side counts as added or removed.
    #[tracing::instrument(level = "debug", skip_all, fields(path = %request.path), err(Debug))]
    pub async fn diff_file(
        &self,
        request: FileDiffRequestDTO,
    ) -> Result<FileDiffResponseDTO, ServiceError> {
        if !request.path.starts_with('/') {
            return Err(ValidationError::PathNotAbsolute {
                field: "path",
                path: request.path,
            }
            .into());
        }

        let (context, snapshot_id_1, snapshot_id_2) = self
            .resolve_pair(
                &request.organisation_id,
                &request.repository_id,
                &request.snapshot_id_1,
                &request.snapshot_id_2,
            )
            .await?;

        let max_text_size = self.config.diff.max_text_file_size;
        let (old, new) = futures::try_join!(
            self.load_version(&context.params, &snapshot_id_1, &request.path, max_text_size),
            self.load_version(&context.params, &snapshot_id_2, &request.path, max_text_size),
        )?;

        if old.is_none() && new.is_none() {
            return Err(EntityNotFoundError::SnapshotPath { path: request.path }.into());
        }

        let old = old.as_ref();
        let new = new.as_ref();
        let binary = [old, new]
            .into_iter()
            .flatten()
            .any(|version| is_binary(version, max_text_size));

        let content = if binary {
            binary_diff(old, new)
        } else {
            // utf-8 already checked by is_binary
            let as_text = |version: &FileVersion| {
                version
                    .content
                    .as_deref()
                    .map(|content| String::from_utf8_lossy(content).into_owned())
            };
            text_diff(
                &request.path,
                old.and_then(as_text).as_deref(),
                new.and_then(as_text).as_deref(),
                self.config.diff.context_lines,
            )
        };

        Ok(FileDiffResponseDTO {
            change_type: file_change_type(old, new),
            path: request.path,
            content,
        })
    }

    async fn resolve_pair(
        &self,
        organisation_id: &OrganisationId,
        repository_id: &RepositoryId,
        snapshot_id_1: &SnapshotId,
        snapshot_id_2: &SnapshotId,
    ) -> Result<(RepositoryContext, SnapshotId, SnapshotId), ServiceError> {
        throw_if_org_not_matching_session(organisation_id, &*self.session_provider)?;

        let context = load_repository_context(
            &*self.backup_repository_repository,
            &*self.repository_key_repository,
            &*self.credential_vault,
            repository_id,
            organisation_id,
        )
        .await?;

        let (snapshot_1, snapshot_2) = futures::try_join!(
            resolve_snapshot(&*self.snapshot_store, &context.params, snapshot_id_1),
            resolve_snapshot(&*self.snapshot_store, &context.params, snapshot_id_2),
        )?;

        Ok((context, snapshot_1.id, snapshot_2.id))
    }

    /// Node metadata comes from the listing so that oversized content is never dumped.
    async fn load_version(
        &self,
        params: &ConnectionParams,
        snapshot_id: &SnapshotId,
        path: &str,
        max_text_size: u64,
    ) -> Result<Option<FileVersion>, ServiceError> {
        let node = self
            .snapshot_store
            .list_files(params, snapshot_id, Some(path.to_owned()))
            .await
            .map_err(map_store_error)?
            .into_iter()
            .find(|node| node.path == path && !node.node_type.is_dir());

        let Some(node) = node else {
            return Ok(None);
        };

        if node.size > max_text_size {
            tracing::debug!(size = node.size, "Skipping content read of {path} in {snapshot_id}");
            return Ok(Some(FileVersion {
                node,
                content: None,
            }));
        }

        match self.snapshot_store.read_file(params, snapshot_id, path).await {
            Ok(content) => Ok(Some(FileVersion {
                node,
                content: Some(content),
            })),
            Err(SnapshotStoreError::PathNotFound(_)) => Ok(None),
            Err(error) => Err(map_store_error(error)),
        }
    }
}
