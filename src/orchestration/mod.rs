//! # Orchestration
//!
//! Drives many nodes through the assign / process / collect cycle.
//!
//! ## Core Components
//!
//! - **Orchestrator**: owns a roster of nodes, assigns tasks and sweeps them for
//!   responses. Built with a team name it also acts as a team (local) orchestrator
//!   that dispatches tasks by capability and reports progress.
//! - **GlobalOrchestrator**: decomposes a high-level goal through a
//!   [`GoalPlanner`] and fans the sub-goals out to team orchestrators; mediates
//!   data exchange between teams.
//!
//! Orchestrators never abort a sweep: per-node failures are recorded as response
//! records and the sweep continues.

pub mod errors;
pub mod global;
pub mod orchestrator;
pub mod planner;
pub mod types;

pub use errors::{OrchestrationError, OrchestrationResult};
pub use global::GlobalOrchestrator;
pub use orchestrator::Orchestrator;
pub use planner::{BroadcastPlanner, GoalPlanner, StaticPlanner, SubGoal};
pub use types::{
    CollectedResponses, FailedAssignment, GoalReport, NodeResponse, TeamAssignment, TeamProgress,
};
