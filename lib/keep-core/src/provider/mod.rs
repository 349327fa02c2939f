pub mod backend;
pub mod credential_vault;
pub mod snapshot_store;
pub mod target_inspector;
