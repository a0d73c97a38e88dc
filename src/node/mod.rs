//! # Node
//!
//! The unit of work. A node carries identity, a capability set, an ordered
//! dependency list and its own [`StateMachine`]. It can only observe other nodes
//! through the shared [`NodeRegistry`].
//!
//! ## Concurrency
//!
//! All mutable fields, the state machine included, sit behind one per-node mutex.
//! The lock is never held while siblings are inspected or while the work function
//! runs, so mutually dependent nodes cannot deadlock. Event sinks are called with
//! the lock held and must not call back into the node.

pub mod builder;
pub mod dependencies;
pub mod errors;
pub mod outcome;
pub mod worker;

pub use builder::NodeBuilder;
pub use dependencies::{DependencyScan, Resolution};
pub use errors::{NodeError, NodeResult};
pub use outcome::TaskOutcome;
pub use worker::{EchoWorker, TaskPrompt, TaskWorker};

use crate::activity::{ActivityLog, ActivityRecord};
use crate::constants::status;
use crate::events::{EventKind, EventSink, LogEvent};
use crate::messaging::{MessagePayload, NodeMessage};
use crate::registry::NodeRegistry;
use crate::state_machine::{NodeFacts, NodeState, StateMachine, StateMachineError};
use crate::types::NodeId;
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, Weak};

/// An autonomous, dependency-gated unit of work
pub struct Node {
    id: NodeId,
    inner: Mutex<NodeInner>,
    registry: RwLock<Weak<NodeRegistry>>,
    worker: Arc<dyn TaskWorker>,
    sink: Arc<dyn EventSink>,
}

struct NodeInner {
    name: String,
    description: String,
    purpose: String,
    identity_template: String,
    priority: i64,
    status: String,
    task: Option<String>,
    supported_tasks: BTreeSet<String>,
    dependencies: Vec<NodeId>,
    activity_log: ActivityLog,
    last_error: Option<String>,
    state_machine: StateMachine,
}

impl NodeInner {
    fn facts(&self, has_unresolved_dependencies: bool) -> NodeFacts {
        NodeFacts {
            has_unresolved_dependencies,
            has_task: self.task.is_some(),
        }
    }

    fn project_status(&self) -> &'static str {
        match (self.state_machine.current_state(), self.task.is_some()) {
            (None, _) => status::UNINITIALIZED,
            (Some(NodeState::Waiting), _) => status::WAITING,
            (Some(NodeState::Ready), false) => status::IDLE,
            (Some(NodeState::Ready), true) => status::READY,
            (Some(NodeState::Processing), _) => status::PROCESSING,
            (Some(NodeState::Error), _) => status::ERROR,
            (Some(NodeState::Inactive), _) => status::INACTIVE,
        }
    }
}

/// Serializable snapshot of a node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeDetails {
    pub node_id: NodeId,
    pub name: String,
    pub description: String,
    pub purpose: String,
    pub priority: i64,
    pub status: String,
    pub state: Option<NodeState>,
    pub task: Option<String>,
    pub supported_tasks: Vec<String>,
    pub dependencies: Vec<NodeId>,
    pub last_error: Option<String>,
}

impl Node {
    /// Start building a node
    pub fn builder(name: impl Into<String>) -> NodeBuilder {
        NodeBuilder::new(name)
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn name(&self) -> String {
        self.inner.lock().name.clone()
    }

    pub fn description(&self) -> String {
        self.inner.lock().description.clone()
    }

    pub fn purpose(&self) -> String {
        self.inner.lock().purpose.clone()
    }

    pub fn identity_template(&self) -> String {
        self.inner.lock().identity_template.clone()
    }

    pub fn priority(&self) -> i64 {
        self.inner.lock().priority
    }

    /// Human-readable projection of the current state
    pub fn status(&self) -> String {
        self.inner.lock().status.clone()
    }

    pub fn task(&self) -> Option<String> {
        self.inner.lock().task.clone()
    }

    pub fn supported_tasks(&self) -> Vec<String> {
        self.inner.lock().supported_tasks.iter().cloned().collect()
    }

    pub fn dependencies(&self) -> Vec<NodeId> {
        self.inner.lock().dependencies.clone()
    }

    /// Copy of the activity log
    pub fn activity_log(&self) -> Vec<ActivityRecord> {
        self.inner.lock().activity_log.entries().to_vec()
    }

    pub fn activity_count(&self) -> usize {
        self.inner.lock().activity_log.len()
    }

    pub fn current_state(&self) -> Option<NodeState> {
        self.inner.lock().state_machine.current_state()
    }

    pub fn is_in_state(&self, state: NodeState) -> bool {
        self.current_state() == Some(state)
    }

    pub fn last_error(&self) -> Option<String> {
        self.inner.lock().last_error.clone()
    }

    /// The registry this node resolves dependencies through, if still alive
    pub fn registry(&self) -> Option<Arc<NodeRegistry>> {
        self.registry.read().upgrade()
    }

    /// Resolve dependencies through `registry` from now on
    ///
    /// Rebinding away from a different live registry is logged.
    pub fn attach_registry(&self, registry: &Arc<NodeRegistry>) {
        let previous = {
            let mut slot = self.registry.write();
            std::mem::replace(&mut *slot, Arc::downgrade(registry))
        };

        let inner = self.inner.lock();
        match previous.upgrade() {
            Some(previous) if Arc::ptr_eq(&previous, registry) => {}
            Some(_) => self.emit(
                &inner,
                EventKind::Node,
                "Rebound to a different registry".to_string(),
            ),
            None => self.emit(&inner, EventKind::Node, "Attached to registry".to_string()),
        }
    }

    pub fn set_name(&self, name: impl Into<String>) {
        let mut inner = self.inner.lock();
        inner.name = name.into();
        let subject = inner.name.clone();
        inner.state_machine.set_subject(subject);
    }

    pub fn set_description(&self, description: impl Into<String>) {
        self.inner.lock().description = description.into();
    }

    pub fn set_purpose(&self, purpose: impl Into<String>) {
        self.inner.lock().purpose = purpose.into();
    }

    pub fn set_identity_template(&self, template: impl Into<String>) {
        self.inner.lock().identity_template = template.into();
    }

    /// Change the priority; values below 1 are rejected and the old value kept
    pub fn set_priority(&self, priority: i64) -> NodeResult<()> {
        let mut inner = self.inner.lock();
        match errors::validate_priority(priority) {
            Ok(priority) => {
                inner.priority = priority;
                self.emit(&inner, EventKind::Node, format!("Priority set to {priority}"));
                Ok(())
            }
            Err(err) => {
                self.sink
                    .log_error(&inner.name, Some(self.id.as_str()), &err.to_string());
                Err(err)
            }
        }
    }

    pub fn is_task_supported(&self, task: &str) -> bool {
        self.inner.lock().supported_tasks.contains(task)
    }

    /// Idle sentinel status and Ready state: what dependents wait for
    pub fn is_idle(&self) -> bool {
        let inner = self.inner.lock();
        inner.status == status::IDLE
            && inner.state_machine.current_state() == Some(NodeState::Ready)
    }

    /// Assign a supported task and re-evaluate
    pub fn assign_task(&self, task: impl Into<String>) -> NodeResult<NodeState> {
        let task = task.into();
        {
            let mut inner = self.inner.lock();
            if !inner.supported_tasks.contains(&task) {
                let err = NodeError::UnsupportedTask {
                    node_id: self.id.clone(),
                    task,
                };
                self.sink
                    .log_error(&inner.name, Some(self.id.as_str()), &err.to_string());
                return Err(err);
            }

            let message = match inner.task.replace(task.clone()) {
                Some(previous) => format!("Task '{task}' assigned, replacing '{previous}'"),
                None => format!("Task '{task}' assigned"),
            };
            self.emit(&inner, EventKind::Task, message);
            self.refresh_status(&mut inner);
        }
        self.evaluate()
    }

    /// Re-derive the state from the dependency list and the task field
    pub fn evaluate(&self) -> NodeResult<NodeState> {
        let scan = self.scan_dependencies();
        let mut inner = self.inner.lock();
        self.log_missing(&inner, &scan.missing);

        let facts = inner.facts(!scan.is_resolved());
        let state = inner.state_machine.evaluate(facts)?;
        self.refresh_status(&mut inner);
        Ok(state)
    }

    /// True iff every dependency resolves
    ///
    /// Dependencies absent from the registry trigger recovery: the condition is
    /// logged and the node moves to Waiting until a later evaluation.
    pub fn check_dependencies(&self) -> bool {
        let scan = self.scan_dependencies();
        if !scan.missing.is_empty() {
            self.recover_missing(&scan.missing);
        }
        scan.is_resolved()
    }

    /// Dependencies that do not currently resolve, in list order
    pub fn unresolved_dependencies(&self) -> Vec<NodeId> {
        self.scan_dependencies().unresolved
    }

    /// Acknowledge a dependency as satisfied: remove it and re-evaluate
    pub fn resolve_dependency(&self, dependency: &str) -> NodeResult<NodeState> {
        {
            let mut inner = self.inner.lock();
            let before = inner.dependencies.len();
            inner.dependencies.retain(|id| id.as_str() != dependency);
            let message = if inner.dependencies.len() < before {
                format!("Dependency {dependency} resolved")
            } else {
                format!("Dependency {dependency} not in dependency list")
            };
            self.emit(&inner, EventKind::Node, message);
        }
        self.evaluate()
    }

    /// Append a dependency (ignored if already present) and re-evaluate
    pub fn add_dependency(&self, dependency: impl Into<NodeId>) -> NodeResult<NodeState> {
        let dependency = dependency.into();
        {
            let mut inner = self.inner.lock();
            if !inner.dependencies.contains(&dependency) {
                self.emit(&inner, EventKind::Node, format!("Dependency {dependency} added"));
                inner.dependencies.push(dependency);
            }
        }
        self.evaluate()
    }

    /// Checked state transition
    ///
    /// Entering Processing additionally requires an assigned task.
    pub fn transition_to(&self, target: NodeState, reason: &str) -> NodeResult<NodeState> {
        let mut inner = self.inner.lock();
        if target == NodeState::Processing && inner.task.is_none() {
            return Err(StateMachineError::GuardFailed {
                reason: format!("node {} has no task to process", self.id),
            }
            .into());
        }
        let state = inner.state_machine.transition_to(target, reason)?;
        self.refresh_status(&mut inner);
        Ok(state)
    }

    /// Checked state transition addressed by state name
    pub fn transition_to_named(&self, name: &str, reason: &str) -> NodeResult<NodeState> {
        match name.parse::<NodeState>() {
            Ok(target) => self.transition_to(target, reason),
            Err(_) => {
                let mut inner = self.inner.lock();
                let state = inner.state_machine.transition_to_named(name, reason)?;
                self.refresh_status(&mut inner);
                Ok(state)
            }
        }
    }

    /// Administrative override that skips the transition table
    ///
    /// Intended for forced recovery and tests; it can break the invariants that
    /// checked transitions maintain.
    pub fn force_state(&self, target: NodeState, reason: &str) {
        let mut inner = self.inner.lock();
        inner.state_machine.force_state(target, reason);
        self.refresh_status(&mut inner);
    }

    /// Fail with `InvalidState` unless the node may process a task
    pub fn validate_processing(&self) -> NodeResult<NodeState> {
        Ok(self.inner.lock().state_machine.validate_processing()?)
    }

    /// Clear a failed task and leave the Error state
    ///
    /// Returns `false` when the node was not in Error.
    pub fn resolve_error(&self) -> NodeResult<bool> {
        let scan = self.scan_dependencies();
        let mut inner = self.inner.lock();
        if inner.state_machine.current_state() == Some(NodeState::Error) {
            self.clear_error(&mut inner);
        }

        let facts = inner.facts(!scan.is_resolved());
        let resolved = inner.state_machine.resolve_error(facts)?;
        self.refresh_status(&mut inner);
        Ok(resolved)
    }

    /// Administrative pause into Inactive
    pub fn pause(&self, reason: &str) -> NodeResult<NodeState> {
        self.transition_to(NodeState::Inactive, reason)
    }

    /// Leave Inactive and re-evaluate; no-op in any other state
    pub fn resume(&self, reason: &str) -> NodeResult<NodeState> {
        {
            let mut inner = self.inner.lock();
            match inner.state_machine.current_state() {
                Some(NodeState::Inactive) => {
                    inner.state_machine.transition_to(NodeState::Waiting, reason)?;
                    self.refresh_status(&mut inner);
                }
                Some(state) => return Ok(state),
                None => {}
            }
        }
        self.evaluate()
    }

    /// Re-project the status string from the current state and task
    pub fn update_status(&self) -> String {
        let mut inner = self.inner.lock();
        self.refresh_status(&mut inner);
        inner.status.clone()
    }

    /// Run the assigned task through the work function
    ///
    /// The state is refreshed from current facts before the processing gate is
    /// checked. Work-function errors never escape: they become an
    /// [`TaskOutcome::Error`] record and the node is forced into Error.
    pub fn process_task(&self) -> NodeResult<TaskOutcome> {
        self.evaluate()?;
        let state = self.validate_processing()?;

        if matches!(state, NodeState::Waiting | NodeState::Inactive) {
            return Ok(TaskOutcome::Waiting {
                reason: format!("Node is in '{state}' state."),
                unresolved_dependencies: Vec::new(),
            });
        }

        let scan = self.scan_dependencies();
        if !scan.is_resolved() {
            self.evaluate()?;
            return Ok(TaskOutcome::Waiting {
                reason: "Dependencies are unresolved.".to_string(),
                unresolved_dependencies: scan.unresolved,
            });
        }

        let (task, prompt) = {
            let inner = self.inner.lock();
            let Some(task) = inner.task.clone() else {
                self.sink.log_error(
                    &inner.name,
                    Some(self.id.as_str()),
                    &format!("No task assigned to Node {} (ID: {}).", inner.name, self.id),
                );
                return Ok(TaskOutcome::Error {
                    message: "No task assigned.".to_string(),
                });
            };
            let prompt = TaskPrompt::build(
                &inner.identity_template,
                &inner.name,
                &inner.description,
                &inner.purpose,
                &task,
            );
            self.emit(&inner, EventKind::Debug, format!("Generated prompt: {prompt}"));
            (task, prompt)
        };

        match self.worker.execute(&task, &prompt) {
            Ok(output) => Ok(self.complete_task(task, output)),
            Err(error) => Ok(self.fail_task(task, error)),
        }
    }

    /// Serializable snapshot of the node
    pub fn get_details(&self) -> NodeDetails {
        let inner = self.inner.lock();
        NodeDetails {
            node_id: self.id.clone(),
            name: inner.name.clone(),
            description: inner.description.clone(),
            purpose: inner.purpose.clone(),
            priority: inner.priority,
            status: inner.status.clone(),
            state: inner.state_machine.current_state(),
            task: inner.task.clone(),
            supported_tasks: inner.supported_tasks.iter().cloned().collect(),
            dependencies: inner.dependencies.clone(),
            last_error: inner.last_error.clone(),
        }
    }

    /// Status update message addressed to `recipient`
    pub fn status_update(&self, recipient: impl Into<String>) -> NodeMessage {
        let inner = self.inner.lock();
        NodeMessage::new(
            self.id.as_str(),
            recipient,
            MessagePayload::StatusUpdate {
                task_id: inner.task.clone(),
                status: inner.status.clone(),
                progress: None,
                issues: inner.last_error.clone(),
            },
        )
    }

    fn complete_task(&self, task: String, output: String) -> TaskOutcome {
        let outcome = TaskOutcome::Success {
            node_id: self.id.clone(),
            task: task.clone(),
            output,
            timestamp: Utc::now(),
        };

        let mut inner = self.inner.lock();
        inner
            .activity_log
            .append(format!("Processed task: {task}"), serde_json::to_value(&outcome).ok());
        if inner.task.as_deref() == Some(task.as_str()) {
            inner.task = None;
        }

        let facts = inner.facts(false);
        if let Err(err) = inner.state_machine.evaluate(facts) {
            self.sink
                .log_error(&inner.name, Some(self.id.as_str()), &err.to_string());
        }
        self.refresh_status(&mut inner);
        self.emit(&inner, EventKind::Task, format!("Task '{task}' completed"));
        outcome
    }

    fn fail_task(&self, task: String, error: anyhow::Error) -> TaskOutcome {
        let message = format!("{error:#}");
        let failure = NodeError::WorkFailure {
            task: task.clone(),
            message: message.clone(),
        };

        let mut inner = self.inner.lock();
        self.sink.log_error(
            &inner.name,
            Some(self.id.as_str()),
            &format!("Error processing task in Node {}: {failure}", inner.name),
        );
        inner.last_error = Some(message.clone());
        inner
            .activity_log
            .append(format!("Task failed: {task}"), Some(json!({ "error": message })));
        inner
            .state_machine
            .force_state(NodeState::Error, "work function failed");
        self.refresh_status(&mut inner);

        TaskOutcome::Error { message }
    }

    fn clear_error(&self, inner: &mut NodeInner) {
        let failed_task = inner.task.take();
        let last_error = inner.last_error.take();
        inner.activity_log.append(
            "Error cleared",
            Some(json!({ "task": failed_task, "error": last_error })),
        );
        self.emit(inner, EventKind::Node, "Error cleared".to_string());
    }

    fn scan_dependencies(&self) -> DependencyScan {
        let dependencies = self.inner.lock().dependencies.clone();
        let registry = self.registry();
        DependencyScan::run(&dependencies, registry.as_deref())
    }

    fn recover_missing(&self, missing: &[NodeId]) {
        let mut inner = self.inner.lock();
        self.log_missing(&inner, missing);

        match inner.state_machine.current_state() {
            Some(state) if state == NodeState::Waiting || state.is_sticky() => {}
            _ => {
                if let Err(err) = inner.state_machine.transition_to(
                    NodeState::Waiting,
                    "Dependency missing from registry; waiting for registry population.",
                ) {
                    self.sink
                        .log_error(&inner.name, Some(self.id.as_str()), &err.to_string());
                }
                self.refresh_status(&mut inner);
            }
        }
    }

    fn log_missing(&self, inner: &NodeInner, missing: &[NodeId]) {
        for dependency in missing {
            self.emit(
                inner,
                EventKind::Node,
                format!("Dependency {dependency} not found in registry"),
            );
        }
    }

    fn refresh_status(&self, inner: &mut NodeInner) {
        let projected = inner.project_status();
        if inner.status != projected {
            inner.status = projected.to_string();
            self.emit(inner, EventKind::Node, format!("Status updated to {projected}"));
        }
    }

    fn emit(&self, inner: &NodeInner, kind: EventKind, message: String) {
        self.sink.log_event(LogEvent::new(
            kind,
            inner.name.as_str(),
            Some(self.id.as_str()),
            message,
        ));
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        write!(
            f,
            "Node({}, Priority={}, Status={}, Purpose={}, Task={})",
            self.id,
            inner.priority,
            inner.status,
            inner.purpose,
            inner.task.as_deref().unwrap_or("None")
        )
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("details", &self.get_details())
            .finish()
    }
}
