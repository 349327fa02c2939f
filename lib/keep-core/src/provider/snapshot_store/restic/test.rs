use std::path::PathBuf;

use indoc::indoc;
use rstest::rstest;
use shared_types::SnapshotId;
use time::macros::datetime;

use super::*;
use crate::provider::snapshot_store::model::NodeType;

const SNAPSHOT_ID: &str = "4b1a2f8d6e3c5a7b9d0e1f2a3b4c5d6e7f8091a2b3c4d5e6f708192a3b4c5d6e";

fn snapshot_id() -> SnapshotId {
    SNAPSHOT_ID.parse().unwrap()
}

fn node(path: &str, node_type: NodeType, size: u64) -> FileNode {
    FileNode {
        path: path.to_owned(),
        name: path.rsplit('/').next().unwrap().to_owned(),
        node_type,
        size,
        mtime: None,
        content_hash: None,
    }
}

#[test]
fn test_parse_snapshots() {
    let output = format!(
        r#"[
            {{
                "time": "2024-03-01T10:15:30.123456789+01:00",
                "tree": "b8a0e3c1",
                "paths": ["/home/alice"],
                "hostname": "host-a",
                "username": "alice",
                "tags": null,
                "id": "{SNAPSHOT_ID}",
                "short_id": "4b1a2f8d",
                "summary": {{ "total_files_processed": 120, "total_bytes_processed": 4096 }}
            }},
            {{
                "time": "2024-03-02T00:00:00Z",
                "paths": ["/etc"],
                "hostname": "host-b",
                "tags": ["daily"],
                "id": "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef"
            }}
        ]"#
    );

    let snapshots = parse_snapshots(output.as_bytes()).unwrap();

    assert_eq!(snapshots.len(), 2);
    assert_eq!(snapshots[0].id, snapshot_id());
    assert_eq!(snapshots[0].short_id, "4b1a2f8d");
    assert_eq!(
        snapshots[0].time,
        datetime!(2024-03-01 10:15:30.123456789 +01:00)
    );
    assert!(snapshots[0].tags.is_empty());
    assert_eq!(snapshots[0].summary.as_ref().unwrap().total_files, 120);

    assert_eq!(snapshots[1].short_id, "01234567");
    assert_eq!(snapshots[1].username, "");
    assert_eq!(snapshots[1].tags, vec!["daily".to_owned()]);
    assert!(snapshots[1].summary.is_none());
}

#[test]
fn test_parse_snapshots_invalid_output() {
    assert!(matches!(
        parse_snapshots(b"Fatal: unable to open config file"),
        Err(SnapshotStoreError::Parse(_))
    ));
    assert!(matches!(
        parse_snapshots(br#"[{"id": "not-hex", "time": "2024-03-02T00:00:00Z"}]"#),
        Err(SnapshotStoreError::Parse(_))
    ));
}

#[test]
fn test_parse_ls_skips_snapshot_line() {
    let output = indoc! {r#"
        {"time":"2024-03-01T10:15:30Z","paths":["/home"],"hostname":"host-a","id":"4b1a2f8d","struct_type":"snapshot"}
        {"name":"home","type":"dir","path":"/home","mtime":"2024-03-01T10:00:00Z","struct_type":"node"}
        {"name":"notes.txt","type":"file","path":"/home/notes.txt","size":42,"mtime":"2024-03-01T09:00:00Z","message_type":"node"}
        {"name":"link","type":"symlink","path":"/home/link","message_type":"node"}

    "#};

    let nodes = parse_ls(output.as_bytes()).unwrap();

    assert_eq!(nodes.len(), 3);
    assert_eq!(nodes[0].node_type, NodeType::Dir);
    assert_eq!(nodes[0].size, 0);
    assert_eq!(nodes[1].path, "/home/notes.txt");
    assert_eq!(nodes[1].size, 42);
    assert_eq!(nodes[1].mtime, Some(datetime!(2024-03-01 09:00:00 UTC)));
    assert_eq!(nodes[2].node_type, NodeType::Symlink);
    assert!(nodes[2].mtime.is_none());
}

#[test]
fn test_join_listings_keeps_only_differences() {
    let before = vec![
        node("/a", NodeType::Dir, 0),
        node("/a/same.txt", NodeType::File, 10),
        node("/a/changed.txt", NodeType::File, 10),
        node("/a/removed.txt", NodeType::File, 5),
    ];
    let after = vec![
        node("/a", NodeType::Dir, 0),
        node("/a/same.txt", NodeType::File, 10),
        node("/a/changed.txt", NodeType::File, 12),
        node("/a/added", NodeType::Dir, 0),
    ];

    let changes = join_listings(before, after);

    let paths: Vec<_> = changes.iter().map(|change| change.path.as_str()).collect();
    assert_eq!(paths, ["/a/added", "/a/changed.txt", "/a/removed.txt"]);

    assert!(changes[0].before.is_none());
    assert_eq!(changes[0].node_type(), NodeType::Dir);
    assert_eq!(changes[1].before.as_ref().unwrap().size, 10);
    assert_eq!(changes[1].after.as_ref().unwrap().size, 12);
    assert!(changes[2].after.is_none());
}

#[test]
fn test_restore_args() {
    let step = RestoreStep {
        source_root: "/".to_owned(),
        target: PathBuf::from("/restore"),
        include: vec!["/home/alice".to_owned()],
        exclude: vec!["/home/alice/.cache".to_owned(), "/home/alice/tmp".to_owned()],
    };

    let args = restore_args(&snapshot_id(), &step, true);

    let args: Vec<_> = args.iter().map(|arg| arg.to_str().unwrap()).collect();
    assert_eq!(
        args,
        [
            "restore",
            SNAPSHOT_ID,
            "--target",
            "/restore",
            "--include",
            "/home/alice",
            "--exclude",
            "/home/alice/.cache",
            "--exclude",
            "/home/alice/tmp",
            "--verify",
        ]
    );
}

#[test]
fn test_restore_args_for_subtree() {
    let step = RestoreStep {
        source_root: "/home/alice".to_owned(),
        target: PathBuf::from("/restore/srv"),
        include: vec![],
        exclude: vec!["/docs".to_owned()],
    };

    let args = restore_args(&snapshot_id(), &step, false);

    let args: Vec<_> = args.iter().map(|arg| arg.to_str().unwrap()).collect();
    let snapshot = format!("{SNAPSHOT_ID}:/home/alice");
    assert_eq!(
        args,
        [
            "restore",
            snapshot.as_str(),
            "--target",
            "/restore/srv",
            "--exclude",
            "/docs",
        ]
    );
}

#[rstest]
#[case(Some(12), "Fatal: wrong password or no key found", "access")]
#[case(Some(1), "Fatal: wrong password or no key found", "access")]
#[case(Some(1), "Fatal: unable to open config file: Stat: Access Denied.", "access")]
#[case(Some(1), "Fatal: no matching ID found for prefix \"deadbeef\"", "snapshot")]
#[case(Some(1), "path \"/etc/none\" not found in snapshot", "path")]
#[case(Some(10), "Fatal: repository does not exist", "command")]
#[case(None, "", "command")]
fn test_map_failure(#[case] code: Option<i32>, #[case] stderr: &str, #[case] expected: &str) {
    let error = map_failure(code, stderr.to_owned());

    let kind = match error {
        SnapshotStoreError::AccessDenied => "access",
        SnapshotStoreError::SnapshotNotFound(_) => "snapshot",
        SnapshotStoreError::PathNotFound(_) => "path",
        SnapshotStoreError::CommandFailed { .. } => "command",
        other => panic!("unexpected error: {other:?}"),
    };
    assert_eq!(kind, expected);
}

#[test]
fn test_command_passes_credentials_through_env() {
    let store = ResticSnapshotStore::new(&SnapshotStoreConfig::default());
    let params = ConnectionParams::new(
        "s3:s3.amazonaws.com/backups",
        secrecy::SecretString::from("repository-password".to_owned()),
    )
    .with_env("AWS_ACCESS_KEY_ID", "AKIAEXAMPLE");

    let command = store.command(&params, vec!["cat".into(), "config".into()]);
    let command = command.as_std();

    let args: Vec<_> = command.get_args().map(|arg| arg.to_str().unwrap()).collect();
    assert_eq!(args, ["--no-cache", "cat", "config"]);
    assert!(!args.iter().any(|arg| arg.contains("repository-password")));

    let env: Vec<_> = command
        .get_envs()
        .filter_map(|(name, value)| Some((name.to_str()?, value?.to_str()?)))
        .collect();
    assert!(env.contains(&("RESTIC_PASSWORD", "repository-password")));
    assert!(env.contains(&("RESTIC_REPOSITORY", "s3:s3.amazonaws.com/backups")));
    assert!(env.contains(&("AWS_ACCESS_KEY_ID", "AKIAEXAMPLE")));
}

/// Writes a shell script standing in for the restic binary.
#[cfg(unix)]
fn fake_restic(dir: &tempfile::TempDir, body: &str) -> ResticSnapshotStore {
    use std::os::unix::fs::PermissionsExt;

    let binary = dir.path().join("restic");
    std::fs::write(&binary, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&binary, std::fs::Permissions::from_mode(0o755)).unwrap();

    ResticSnapshotStore::new(&SnapshotStoreConfig {
        binary,
        cache_dir: None,
    })
}

#[cfg(unix)]
#[tokio::test]
async fn test_authenticate_maps_wrong_password_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let store = fake_restic(
        &dir,
        indoc! {r#"
            if [ "$RESTIC_PASSWORD" = "correct horse" ]; then
                echo '{"version":2}'
                exit 0
            fi
            echo "Fatal: wrong password or no key found" >&2
            exit 12
        "#},
    );
    let params = |password: &str| {
        ConnectionParams::new(
            "/srv/backup",
            secrecy::SecretString::from(password.to_owned()),
        )
    };

    store.authenticate(&params("correct horse")).await.unwrap();
    assert!(matches!(
        store.authenticate(&params("correct hors")).await,
        Err(SnapshotStoreError::AccessDenied)
    ));
}

#[cfg(unix)]
#[tokio::test]
async fn test_get_snapshot_resolves_short_id() {
    let dir = tempfile::tempdir().unwrap();
    let store = fake_restic(
        &dir,
        &format!(
            r#"echo '[{{"time":"2024-03-02T00:00:00Z","paths":["/etc"],"hostname":"host-b","id":"{SNAPSHOT_ID}","short_id":"4b1a2f8d"}}]'"#
        ),
    );
    let params = ConnectionParams::new("/srv/backup", secrecy::SecretString::from("pw".to_owned()));

    let short: SnapshotId = "4b1a2f8d".parse().unwrap();
    let snapshot = store.get_snapshot(&params, &short).await.unwrap().unwrap();

    assert_eq!(snapshot.id, snapshot_id());
    assert_eq!(snapshot.hostname, "host-b");
}
