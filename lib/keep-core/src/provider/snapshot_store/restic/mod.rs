//! [`SnapshotStore`] driving the `restic` command line client.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use secrecy::ExposeSecret;
use shared_types::SnapshotId;
use tokio::process::Command;

use super::error::SnapshotStoreError;
use super::model::{FileNode, NodeChange, RestoreCommand, RestoreStep, UpstreamSnapshot};
use super::{SnapshotStore, path_has_prefix};
use crate::config::core_config::SnapshotStoreConfig;
use crate::provider::backend::model::{ConnectionParams, redact_userinfo};

mod dto;

#[cfg(test)]
mod test;

use dto::{LsLineDTO, SnapshotDTO};

const EXIT_CODE_WRONG_PASSWORD: i32 = 12;
const UNMOUNT_BINARY: &str = "fusermount";

pub struct ResticSnapshotStore {
    binary: PathBuf,
    cache_dir: Option<PathBuf>,
}

impl ResticSnapshotStore {
    pub fn new(config: &SnapshotStoreConfig) -> Self {
        Self {
            binary: config.binary.clone(),
            cache_dir: config.cache_dir.clone(),
        }
    }

    fn global_args(&self) -> Vec<OsString> {
        match &self.cache_dir {
            Some(cache_dir) => vec!["--cache-dir".into(), cache_dir.into()],
            None => vec!["--no-cache".into()],
        }
    }

    fn command(&self, params: &ConnectionParams, args: Vec<OsString>) -> Command {
        let mut command = Command::new(&self.binary);
        command
            .args(self.global_args())
            .args(args)
            .env_remove("RESTIC_PASSWORD_FILE")
            .env_remove("RESTIC_PASSWORD_COMMAND")
            .env("RESTIC_REPOSITORY", &params.repository)
            .env("RESTIC_PASSWORD", params.password.expose_secret())
            .envs(
                params
                    .env
                    .iter()
                    .map(|(name, value)| (name, value.expose_secret())),
            )
            .stdin(Stdio::null())
            .kill_on_drop(true);
        command
    }

    async fn run(
        &self,
        params: &ConnectionParams,
        args: Vec<OsString>,
    ) -> Result<Vec<u8>, SnapshotStoreError> {
        let subcommand = args
            .first()
            .map(|arg| arg.to_string_lossy().into_owned())
            .unwrap_or_default();
        tracing::debug!(
            %subcommand,
            repository = %redact_userinfo(&params.repository),
            "Running restic"
        );

        let output = self.command(params, args).output().await?;
        if output.status.success() {
            return Ok(output.stdout);
        }

        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        tracing::debug!(%subcommand, code = ?output.status.code(), %stderr, "restic failed");
        Err(map_failure(output.status.code(), stderr))
    }

    async fn list_nodes(
        &self,
        params: &ConnectionParams,
        snapshot_id: &SnapshotId,
    ) -> Result<Vec<FileNode>, SnapshotStoreError> {
        let output = self
            .run(params, vec!["ls".into(), "--json".into(), snapshot_id.as_str().into()])
            .await?;

        parse_ls(&output)
    }
}

pub(super) fn map_failure(code: Option<i32>, stderr: String) -> SnapshotStoreError {
    let lowercase = stderr.to_lowercase();

    if code == Some(EXIT_CODE_WRONG_PASSWORD)
        || lowercase.contains("wrong password")
        || lowercase.contains("access denied")
    {
        return SnapshotStoreError::AccessDenied;
    }

    if lowercase.contains("no matching id found") || lowercase.contains("no snapshot found") {
        return SnapshotStoreError::SnapshotNotFound(stderr.trim().to_owned());
    }

    if lowercase.contains("not found in snapshot") || lowercase.contains("no such file") {
        return SnapshotStoreError::PathNotFound(stderr.trim().to_owned());
    }

    SnapshotStoreError::CommandFailed { code, stderr }
}

pub(super) fn parse_snapshots(output: &[u8]) -> Result<Vec<UpstreamSnapshot>, SnapshotStoreError> {
    let snapshots: Vec<SnapshotDTO> = serde_json::from_slice(output)
        .map_err(|err| SnapshotStoreError::Parse(err.to_string()))?;

    snapshots.into_iter().map(TryInto::try_into).collect()
}

pub(super) fn parse_ls(output: &[u8]) -> Result<Vec<FileNode>, SnapshotStoreError> {
    output
        .split(|byte| *byte == b'\n')
        .filter(|line| !line.iter().all(u8::is_ascii_whitespace))
        .map(|line| {
            serde_json::from_slice::<LsLineDTO>(line)
                .map_err(|err| SnapshotStoreError::Parse(err.to_string()))
        })
        .filter(|line| line.as_ref().map_or(true, LsLineDTO::is_node))
        .map(|line| line.and_then(FileNode::try_from))
        .collect()
}

/// Pairs two listings by path, keeping only paths whose node differs.
pub(super) fn join_listings(before: Vec<FileNode>, after: Vec<FileNode>) -> Vec<NodeChange> {
    let mut paired: BTreeMap<String, (Option<FileNode>, Option<FileNode>)> = BTreeMap::new();

    for node in before {
        let path = node.path.clone();
        paired.entry(path).or_default().0 = Some(node);
    }
    for node in after {
        let path = node.path.clone();
        paired.entry(path).or_default().1 = Some(node);
    }

    paired
        .into_iter()
        .filter(|(_, (before, after))| before != after)
        .map(|(path, (before, after))| NodeChange {
            path,
            before,
            after,
        })
        .collect()
}

pub(super) fn restore_args(
    snapshot_id: &SnapshotId,
    step: &RestoreStep,
    verify: bool,
) -> Vec<OsString> {
    let snapshot: OsString = match step.source_root.as_str() {
        "/" => snapshot_id.as_str().into(),
        source_root => format!("{snapshot_id}:{source_root}").into(),
    };

    let mut args: Vec<OsString> = vec![
        "restore".into(),
        snapshot,
        "--target".into(),
        step.target.as_os_str().to_owned(),
    ];

    for include in &step.include {
        args.extend(["--include".into(), include.into()]);
    }
    for exclude in &step.exclude {
        args.extend(["--exclude".into(), exclude.into()]);
    }
    if verify {
        args.push("--verify".into());
    }

    args
}

#[async_trait::async_trait]
impl SnapshotStore for ResticSnapshotStore {
    async fn authenticate(&self, params: &ConnectionParams) -> Result<(), SnapshotStoreError> {
        self.run(params, vec!["cat".into(), "config".into()])
            .await
            .map(|_| ())
    }

    async fn list_snapshots(
        &self,
        params: &ConnectionParams,
    ) -> Result<Vec<UpstreamSnapshot>, SnapshotStoreError> {
        let output = self
            .run(params, vec!["snapshots".into(), "--json".into()])
            .await?;

        parse_snapshots(&output)
    }

    async fn get_snapshot(
        &self,
        params: &ConnectionParams,
        snapshot_id: &SnapshotId,
    ) -> Result<Option<UpstreamSnapshot>, SnapshotStoreError> {
        let output = match self
            .run(
                params,
                vec![
                    "snapshots".into(),
                    "--json".into(),
                    snapshot_id.as_str().into(),
                ],
            )
            .await
        {
            Ok(output) => output,
            Err(SnapshotStoreError::SnapshotNotFound(_)) => return Ok(None),
            Err(err) => return Err(err),
        };

        Ok(parse_snapshots(&output)?
            .into_iter()
            .find(|snapshot| snapshot.id.as_str().starts_with(snapshot_id.as_str())))
    }

    async fn list_files(
        &self,
        params: &ConnectionParams,
        snapshot_id: &SnapshotId,
        path_prefix: Option<String>,
    ) -> Result<Vec<FileNode>, SnapshotStoreError> {
        let nodes = self.list_nodes(params, snapshot_id).await?;

        Ok(match path_prefix {
            Some(prefix) => nodes
                .into_iter()
                .filter(|node| path_has_prefix(&node.path, &prefix))
                .collect(),
            None => nodes,
        })
    }

    async fn diff(
        &self,
        params: &ConnectionParams,
        from: &SnapshotId,
        to: &SnapshotId,
    ) -> Result<Vec<NodeChange>, SnapshotStoreError> {
        let (before, after) = futures::try_join!(
            self.list_nodes(params, from),
            self.list_nodes(params, to)
        )?;

        Ok(join_listings(before, after))
    }

    async fn read_file(
        &self,
        params: &ConnectionParams,
        snapshot_id: &SnapshotId,
        path: &str,
    ) -> Result<Vec<u8>, SnapshotStoreError> {
        self.run(
            params,
            vec!["dump".into(), snapshot_id.as_str().into(), path.into()],
        )
        .await
    }

    async fn restore(
        &self,
        params: &ConnectionParams,
        command: RestoreCommand,
    ) -> Result<(), SnapshotStoreError> {
        for step in &command.steps {
            self.run(params, restore_args(&command.snapshot_id, step, command.verify))
                .await?;
        }
        Ok(())
    }

    /// Starts a FUSE mount in the background. The snapshot is reachable
    /// under `<mount_path>/ids/<short id>` once the mount is up.
    async fn mount(
        &self,
        params: &ConnectionParams,
        snapshot_id: &SnapshotId,
        mount_path: &Path,
    ) -> Result<(), SnapshotStoreError> {
        tokio::fs::create_dir_all(mount_path).await?;

        tracing::debug!(snapshot_id = %snapshot_id, path = %mount_path.display(), "Mounting snapshot");

        let mut command = self.command(params, vec!["mount".into(), mount_path.into()]);
        command
            .kill_on_drop(false)
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        // the child keeps serving the mount until it is unmounted
        command.spawn()?;
        Ok(())
    }

    async fn unmount(&self, mount_path: &Path) -> Result<(), SnapshotStoreError> {
        let output = Command::new(UNMOUNT_BINARY)
            .arg("-u")
            .arg(mount_path)
            .stdin(Stdio::null())
            .output()
            .await?;

        if !output.status.success() {
            return Err(SnapshotStoreError::CommandFailed {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(())
    }
}
