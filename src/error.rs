//! Crate-wide error aggregate.

use crate::config::ConfigurationError;
use crate::node::NodeError;
use crate::orchestration::OrchestrationError;
use crate::state_machine::StateMachineError;
use thiserror::Error;

/// Any error the crate can return
#[derive(Debug, Error)]
pub enum AgentNetError {
    #[error("State machine error: {0}")]
    StateMachine(#[from] StateMachineError),

    #[error("Node error: {0}")]
    Node(#[from] NodeError),

    #[error("Orchestration error: {0}")]
    Orchestration(#[from] OrchestrationError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
}

pub type Result<T> = std::result::Result<T, AgentNetError>;
