use shared_types::{AgentId, ImportedSnapshotId, RepositoryId, SnapshotId};
use time::OffsetDateTime;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ImportedSnapshot {
    pub id: ImportedSnapshotId,
    pub repository_id: RepositoryId,
    pub source_agent_id: Option<AgentId>,
    pub snapshot_id: SnapshotId,
    pub short_id: String,
    pub hostname: String,
    pub username: String,
    pub snapshot_time: OffsetDateTime,
    pub paths: Vec<String>,
    pub tags: Vec<String>,
    pub created_date: OffsetDateTime,
}
