#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # AgentNet Core
//!
//! Dependency-gated state machine and task-dispatch core for a network of
//! autonomous agent nodes.
//!
//! ## Overview
//!
//! Nodes acquire tasks, wait on zero or more sibling nodes, and run a task only
//! once every dependency has settled. Orchestrators assign tasks, sweep nodes for
//! responses and, at the global level, fan goals out to team orchestrators.
//!
//! ## Module Organization
//!
//! - [`state_machine`] - Node lifecycle states and the transition graph
//! - [`node`] - Nodes, dependency resolution and the pluggable work function
//! - [`registry`] - Shared node directory used for dependency lookups
//! - [`orchestration`] - Team and global orchestrators
//! - [`messaging`] - Message data contracts
//! - [`events`] - Event sinks (structured tracing, broadcast channel)
//! - [`config`] - Layered configuration
//! - [`logging`] - Structured logging setup and helpers
//! - [`error`] - Crate-wide error aggregate
//!
//! ## Quick Start
//!
//! ```rust
//! use agentnet_core::{Node, NodeRegistry, NodeState, Orchestrator};
//! use std::sync::Arc;
//!
//! # fn main() -> agentnet_core::Result<()> {
//! let registry = Arc::new(NodeRegistry::default());
//! let orchestrator = Orchestrator::new("demo").with_registry(&registry);
//!
//! let schema = Node::builder("SchemaNode")
//!     .id("schema")
//!     .registry(&registry)
//!     .build()?;
//! let api = Node::builder("ApiNode")
//!     .id("api")
//!     .supported_tasks(["build endpoints"])
//!     .dependencies(["schema"])
//!     .registry(&registry)
//!     .build()?;
//! orchestrator.register_node(schema);
//! orchestrator.register_node(api.clone());
//!
//! orchestrator.assign_task("api", "build endpoints")?;
//! let responses = orchestrator.collect_responses();
//! assert!(responses.get("api").unwrap().is_success());
//! assert_eq!(api.current_state(), Some(NodeState::Ready));
//! # Ok(())
//! # }
//! ```

pub mod activity;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod logging;
pub mod messaging;
pub mod node;
pub mod orchestration;
pub mod registry;
pub mod state_machine;
pub mod types;

pub use activity::{ActivityLog, ActivityRecord};
pub use config::{ConfigurationError, NetworkConfig};
pub use error::{AgentNetError, Result};
pub use events::{EventKind, EventPublisher, EventSink, LogEvent, TracingSink};
pub use messaging::{MessagePayload, NodeMessage};
pub use node::{Node, NodeBuilder, NodeDetails, NodeError, TaskOutcome, TaskPrompt, TaskWorker};
pub use orchestration::{GlobalOrchestrator, OrchestrationError, Orchestrator};
pub use registry::NodeRegistry;
pub use state_machine::{NodeState, StateMachine, StateMachineError};
pub use types::NodeId;
