use shared_types::{AgentId, OrganisationId};
use time::OffsetDateTime;

/// Backup agent installed on a protected machine. Owned by the agent
/// subsystem, only looked up here.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Agent {
    pub id: AgentId,
    pub organisation_id: OrganisationId,
    pub name: String,
    pub hostname: String,
    pub created_date: OffsetDateTime,
    pub last_modified: OffsetDateTime,
}
