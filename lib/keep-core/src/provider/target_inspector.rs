use shared_types::AgentId;

/// Answers which of the given paths already exist on an agent.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait::async_trait]
pub trait TargetInspector: Send + Sync {
    async fn existing_paths(&self, agent_id: &AgentId, paths: Vec<String>) -> Vec<String>;
}

/// Used when no agent channel is wired in, reports no conflicts.
pub struct NoTargetInspector;

#[async_trait::async_trait]
impl TargetInspector for NoTargetInspector {
    async fn existing_paths(&self, _agent_id: &AgentId, _paths: Vec<String>) -> Vec<String> {
        vec![]
    }
}
