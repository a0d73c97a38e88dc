use super::{
    errors::{invalid_state, invalid_transition, StateMachineResult},
    states::NodeState,
};
use crate::events::{EventKind, EventSink, LogEvent};
use crate::types::NodeId;
use std::sync::Arc;

/// Facts about the owning node that drive state derivation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeFacts {
    pub has_unresolved_dependencies: bool,
    pub has_task: bool,
}

/// Per-node lifecycle state machine
///
/// The machine owns only its current state. Everything it decides on is handed in
/// by the owning node as [`NodeFacts`]; `node_id` is a non-owning handle used to
/// attribute log records.
pub struct StateMachine {
    node_id: NodeId,
    subject: String,
    current: Option<NodeState>,
    sink: Arc<dyn EventSink>,
}

impl StateMachine {
    /// Create an uninitialized state machine for the given node
    pub fn new(node_id: NodeId, subject: impl Into<String>, sink: Arc<dyn EventSink>) -> Self {
        Self {
            node_id,
            subject: subject.into(),
            current: None,
            sink,
        }
    }

    /// Current state, `None` until the first evaluation or transition
    pub fn current_state(&self) -> Option<NodeState> {
        self.current
    }

    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    /// Rename the subject attached to log records
    pub fn set_subject(&mut self, subject: impl Into<String>) {
        self.subject = subject.into();
    }

    /// The state the facts call for
    pub fn derive_state(facts: NodeFacts) -> NodeState {
        if facts.has_unresolved_dependencies {
            NodeState::Waiting
        } else if facts.has_task {
            NodeState::Processing
        } else {
            NodeState::Ready
        }
    }

    /// Checked transition
    ///
    /// Re-entering the current state is a no-op that leaves a single "ignored"
    /// note. From the uninitialized state any state may be entered.
    pub fn transition_to(&mut self, target: NodeState, reason: &str) -> StateMachineResult<NodeState> {
        if self.current == Some(target) {
            self.note(format!(
                "State transition to '{target}' ignored: already in this state."
            ));
            return Ok(target);
        }

        if let Some(current) = self.current {
            if !current.can_transition_to(target) {
                return Err(invalid_transition(Some(current), target.to_string()));
            }
        }

        self.commit(target, reason);
        Ok(target)
    }

    /// Checked transition addressed by state name
    pub fn transition_to_named(&mut self, name: &str, reason: &str) -> StateMachineResult<NodeState> {
        let target = name
            .parse::<NodeState>()
            .map_err(|_| invalid_transition(self.current, name))?;
        self.transition_to(target, reason)
    }

    /// Administrative override that skips the legality check
    ///
    /// Reserved for forced recovery (work failures) and tests. Prefer
    /// [`StateMachine::transition_to`] everywhere else.
    pub fn force_state(&mut self, target: NodeState, reason: &str) {
        if self.current == Some(target) {
            return;
        }
        self.commit(target, &format!("forced: {reason}"));
    }

    /// Re-derive the state from the node's facts
    ///
    /// Error and Inactive are left untouched; they are exited through
    /// [`StateMachine::resolve_error`] and explicit transitions respectively.
    pub fn evaluate(&mut self, facts: NodeFacts) -> StateMachineResult<NodeState> {
        if let Some(current) = self.current {
            if current.is_sticky() {
                self.note(format!("Evaluation deferred: '{current}' requires an explicit exit."));
                return Ok(current);
            }
        }

        let target = Self::derive_state(facts);
        if self.current == Some(target) {
            return Ok(target);
        }

        let reason = match target {
            NodeState::Waiting => "Unresolved dependencies.",
            NodeState::Processing => "Task assigned and all dependencies resolved.",
            _ => "No task assigned, and all dependencies resolved.",
        };
        self.transition_to(target, reason)
    }

    /// Gate for task processing
    pub fn validate_processing(&self) -> StateMachineResult<NodeState> {
        match self.current {
            Some(state) if state.can_process_task() => Ok(state),
            Some(state) => Err(invalid_state(state.to_string())),
            None => Err(invalid_state("uninitialized")),
        }
    }

    /// Leave the Error state for whatever the facts call for
    ///
    /// Returns `false` without side effects (beyond a note) when not in Error.
    pub fn resolve_error(&mut self, facts: NodeFacts) -> StateMachineResult<bool> {
        if self.current != Some(NodeState::Error) {
            self.note("No error state to resolve.".to_string());
            return Ok(false);
        }

        // Error -> Processing is not a legal edge, so a lingering task waits in Ready.
        let target = match Self::derive_state(facts) {
            NodeState::Processing => NodeState::Ready,
            other => other,
        };
        self.transition_to(target, "Error resolved.")?;
        Ok(true)
    }

    fn commit(&mut self, target: NodeState, reason: &str) {
        let from = self.current.replace(target);
        self.sink.log_transition(
            &self.subject,
            Some(self.node_id.as_str()),
            from,
            target,
            reason,
        );
    }

    fn note(&self, message: String) {
        self.sink.log_event(LogEvent::new(
            EventKind::Debug,
            self.subject.as_str(),
            Some(self.node_id.as_str()),
            message,
        ));
    }
}

impl std::fmt::Debug for StateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateMachine")
            .field("node_id", &self.node_id)
            .field("current", &self.current)
            .finish()
    }
}
