use crate::node::NodeError;
use crate::types::NodeId;
use thiserror::Error;

/// Errors returned by orchestrator operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrchestrationError {
    #[error("Node {node_id} not registered.")]
    UnknownNode { node_id: NodeId },

    #[error("Team {team_name} not found.")]
    UnknownTeam { team_name: String },

    #[error(transparent)]
    Node(#[from] NodeError),
}

/// Result type alias for orchestration operations
pub type OrchestrationResult<T> = Result<T, OrchestrationError>;
