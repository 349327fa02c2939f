pub mod agent;
pub mod backup_repository;
pub mod common;
pub mod imported_snapshot;
pub mod list_query;
pub mod repository_key;
pub mod restore;
pub mod snapshot_mount;
