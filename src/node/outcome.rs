use crate::types::NodeId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result record produced by `Node::process_task`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TaskOutcome {
    /// The work function ran and returned output
    Success {
        node_id: NodeId,
        task: String,
        output: String,
        timestamp: DateTime<Utc>,
    },
    /// The node could not run yet
    Waiting {
        reason: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        unresolved_dependencies: Vec<NodeId>,
    },
    /// Processing failed; the failure has been absorbed
    Error { message: String },
}

impl TaskOutcome {
    /// Status label matching the serialized `status` tag
    pub fn status(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::Waiting { .. } => "waiting",
            Self::Error { .. } => "error",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Task carried by a success record
    pub fn task(&self) -> Option<&str> {
        match self {
            Self::Success { task, .. } => Some(task),
            _ => None,
        }
    }
}
