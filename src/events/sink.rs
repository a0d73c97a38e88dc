//! # Event Sink
//!
//! Injected logging capability shared by nodes, state machines, the registry and
//! orchestrators. Delivery is best effort: nothing in the core depends on an event
//! reaching its destination.

use crate::logging;
use crate::state_machine::NodeState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a structured log event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Task,
    Node,
    Debug,
    Error,
    StateTransition,
    Registry,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Task => write!(f, "task"),
            Self::Node => write!(f, "node"),
            Self::Debug => write!(f, "debug"),
            Self::Error => write!(f, "error"),
            Self::StateTransition => write!(f, "state_transition"),
            Self::Registry => write!(f, "registry"),
        }
    }
}

/// Structured log event handed to an [`EventSink`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEvent {
    pub kind: EventKind,
    pub subject: String,
    pub id: Option<String>,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl LogEvent {
    pub fn new(
        kind: EventKind,
        subject: impl Into<String>,
        id: Option<&str>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            subject: subject.into(),
            id: id.map(str::to_string),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Logging capability injected into core components
pub trait EventSink: Send + Sync {
    /// Record a structured event
    fn log_event(&self, event: LogEvent);

    /// Record an error event
    fn log_error(&self, subject: &str, id: Option<&str>, message: &str) {
        self.log_event(LogEvent::new(EventKind::Error, subject, id, message));
    }

    /// Record a committed state transition
    fn log_transition(
        &self,
        subject: &str,
        id: Option<&str>,
        from: Option<NodeState>,
        to: NodeState,
        reason: &str,
    ) {
        let from = from.map_or_else(|| "none".to_string(), |state| state.to_string());
        self.log_event(LogEvent::new(
            EventKind::StateTransition,
            subject,
            id,
            format!("{from} -> {to}: {reason}"),
        ));
    }
}

/// Sink that forwards every event to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn log_event(&self, event: LogEvent) {
        let id = event.id.as_deref();
        match event.kind {
            EventKind::Task => {
                logging::log_task_operation(&event.subject, id, None, "info", Some(&event.message))
            }
            EventKind::Node => logging::log_node_operation(
                "node_event",
                id,
                Some(&event.subject),
                "info",
                Some(&event.message),
            ),
            EventKind::Debug => tracing::debug!(
                subject = %event.subject,
                id = id,
                timestamp = %event.timestamp.to_rfc3339(),
                "{}",
                event.message
            ),
            EventKind::Error => {
                logging::log_error(&event.subject, "node_event", &event.message, id)
            }
            EventKind::StateTransition => tracing::info!(
                subject = %event.subject,
                id = id,
                transition = %event.message,
                timestamp = %event.timestamp.to_rfc3339(),
                "STATE_TRANSITION"
            ),
            EventKind::Registry => logging::log_registry_operation(
                &event.subject,
                id,
                None,
                "info",
                Some(&event.message),
            ),
        }
    }

    fn log_transition(
        &self,
        _subject: &str,
        id: Option<&str>,
        from: Option<NodeState>,
        to: NodeState,
        reason: &str,
    ) {
        let from = from.map(|state| state.to_string());
        logging::log_state_transition(id, from.as_deref(), &to.to_string(), reason);
    }
}
