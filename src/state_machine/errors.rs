use super::states::NodeState;
use thiserror::Error;

/// Error types for state machine operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateMachineError {
    #[error("Invalid state transition from {from:?} to {to:?}")]
    InvalidTransition { from: Option<String>, to: String },

    #[error("Cannot process task in state '{state}'")]
    InvalidState { state: String },

    #[error("Guard condition failed: {reason}")]
    GuardFailed { reason: String },
}

/// Result type alias for state machine operations
pub type StateMachineResult<T> = Result<T, StateMachineError>;

/// Helper function to create transition errors
pub fn invalid_transition(from: Option<NodeState>, to: impl Into<String>) -> StateMachineError {
    StateMachineError::InvalidTransition {
        from: from.map(|state| state.to_string()),
        to: to.into(),
    }
}

/// Helper function to create processing-gate errors
pub fn invalid_state(state: impl Into<String>) -> StateMachineError {
    StateMachineError::InvalidState {
        state: state.into(),
    }
}
