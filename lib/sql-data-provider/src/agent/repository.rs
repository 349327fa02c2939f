use autometrics::autometrics;
use keep_core::model::agent::Agent;
use keep_core::repository::agent_repository::AgentRepository;
use keep_core::repository::error::DataLayerError;
use sea_orm::EntityTrait;
use shared_types::AgentId;

use super::AgentProvider;
use crate::entity::agent;
use crate::mapper::to_data_layer_error;

#[autometrics]
#[async_trait::async_trait]
impl AgentRepository for AgentProvider {
    async fn get_agent(&self, id: &AgentId) -> Result<Option<Agent>, DataLayerError> {
        let agent = agent::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(to_data_layer_error)?;

        Ok(agent.map(Into::into))
    }
}
