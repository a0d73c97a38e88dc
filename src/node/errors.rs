use crate::state_machine::StateMachineError;
use crate::types::NodeId;
use thiserror::Error;

/// Error types for node construction, assignment and processing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NodeError {
    #[error("Priority must be greater than or equal to 1 (got {priority})")]
    InvalidPriority { priority: i64 },

    #[error("Task '{task}' is not supported by node {node_id}")]
    UnsupportedTask { node_id: NodeId, task: String },

    #[error("Work function failed for task '{task}': {message}")]
    WorkFailure { task: String, message: String },

    #[error(transparent)]
    StateMachine(#[from] StateMachineError),
}

impl NodeError {
    /// True when the node simply is not ready to process yet
    pub fn is_not_ready(&self) -> bool {
        matches!(
            self,
            Self::StateMachine(StateMachineError::InvalidState { .. })
        )
    }
}

/// Result type alias for node operations
pub type NodeResult<T> = Result<T, NodeError>;

/// Priority invariant shared by construction and `set_priority`
pub fn validate_priority(priority: i64) -> NodeResult<i64> {
    if priority >= 1 {
        Ok(priority)
    } else {
        Err(NodeError::InvalidPriority { priority })
    }
}
