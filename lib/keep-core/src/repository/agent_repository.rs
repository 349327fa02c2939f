use shared_types::AgentId;

use super::error::DataLayerError;
use crate::model::agent::Agent;

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait::async_trait]
pub trait AgentRepository: Send + Sync {
    async fn get_agent(&self, id: &AgentId) -> Result<Option<Agent>, DataLayerError>;
}
