use keep_core::model::agent::Agent;

use crate::entity::agent;

impl From<agent::Model> for Agent {
    fn from(value: agent::Model) -> Self {
        Self {
            id: value.id,
            organisation_id: value.organisation_id,
            name: value.name,
            hostname: value.hostname,
            created_date: value.created_date,
            last_modified: value.last_modified,
        }
    }
}
