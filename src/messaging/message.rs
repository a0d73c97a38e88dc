//! # Node Message Contracts
//!
//! Plain data records describing task, status and dependency exchanges between
//! nodes and orchestrators. No transport is implemented; the shapes can be adopted
//! as-is by one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Envelope shared by every message type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeMessage {
    pub message_id: Uuid,
    pub sender: String,
    pub recipient: String,
    pub timestamp: DateTime<Utc>,
    pub payload: MessagePayload,
}

/// Message bodies, tagged by `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessagePayload {
    /// Assign a task to a node
    Task {
        task_id: String,
        description: String,
        priority: i64,
        deadline: Option<DateTime<Utc>>,
        #[serde(default)]
        dependencies: Vec<String>,
    },
    /// Report progress or status
    StatusUpdate {
        task_id: Option<String>,
        status: String,
        progress: Option<f64>,
        issues: Option<String>,
    },
    /// Ask for data needed to resolve a dependency
    DependencyRequest {
        task_id: String,
        required_data: Value,
    },
    /// Provide data in answer to a dependency request
    DependencyResponse {
        task_id: String,
        provided_data: Value,
    },
}

impl MessagePayload {
    /// Get a string representation of the message type for logging
    pub fn message_type(&self) -> &'static str {
        match self {
            Self::Task { .. } => "task",
            Self::StatusUpdate { .. } => "status_update",
            Self::DependencyRequest { .. } => "dependency_request",
            Self::DependencyResponse { .. } => "dependency_response",
        }
    }
}

impl NodeMessage {
    /// Create a message with a fresh id and the current timestamp
    pub fn new(sender: impl Into<String>, recipient: impl Into<String>, payload: MessagePayload) -> Self {
        Self {
            message_id: Uuid::new_v4(),
            sender: sender.into(),
            recipient: recipient.into(),
            timestamp: Utc::now(),
            payload,
        }
    }

    /// Create a task assignment message
    pub fn task(
        sender: impl Into<String>,
        recipient: impl Into<String>,
        task_id: impl Into<String>,
        description: impl Into<String>,
        priority: i64,
    ) -> Self {
        Self::new(
            sender,
            recipient,
            MessagePayload::Task {
                task_id: task_id.into(),
                description: description.into(),
                priority,
                deadline: None,
                dependencies: Vec::new(),
            },
        )
    }

    /// Create a dependency response carrying arbitrary data
    pub fn dependency_response(
        sender: impl Into<String>,
        recipient: impl Into<String>,
        task_id: impl Into<String>,
        provided_data: Value,
    ) -> Self {
        Self::new(
            sender,
            recipient,
            MessagePayload::DependencyResponse {
                task_id: task_id.into(),
                provided_data,
            },
        )
    }

    pub fn message_type(&self) -> &'static str {
        self.payload.message_type()
    }
}
