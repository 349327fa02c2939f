pub mod backup_repository;
pub(crate) mod common;
pub mod error;
pub mod repository_import;
pub mod restore;
pub mod snapshot_diff;
pub mod snapshot_mount;

#[cfg(test)]
pub(crate) mod test_utilities;
