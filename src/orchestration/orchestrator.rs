use super::errors::{OrchestrationError, OrchestrationResult};
use super::types::{CollectedResponses, TeamProgress};
use crate::activity::{ActivityLog, ActivityRecord};
use crate::constants::context_keys;
use crate::events::{EventKind, EventSink, LogEvent, TracingSink};
use crate::logging::{log_node_operation, log_task_operation};
use crate::messaging::NodeMessage;
use crate::node::{Node, TaskOutcome};
use crate::registry::NodeRegistry;
use crate::state_machine::NodeState;
use crate::types::NodeId;
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

#[derive(Default)]
struct Roster {
    order: Vec<NodeId>,
    nodes: HashMap<NodeId, Arc<Node>>,
}

impl Roster {
    fn insert(&mut self, node: Arc<Node>) -> bool {
        let id = node.id().clone();
        let replaced = self.nodes.insert(id.clone(), node).is_some();
        if !replaced {
            self.order.push(id);
        }
        replaced
    }

    fn snapshot(&self) -> Vec<Arc<Node>> {
        self.order
            .iter()
            .filter_map(|id| self.nodes.get(id).cloned())
            .collect()
    }
}

/// Task orchestrator over a roster of nodes
///
/// A plain orchestrator assigns tasks by node id. Built with [`Orchestrator::team`]
/// it also acts as a team orchestrator: [`dispatch`](Self::dispatch) picks a node
/// by capability and [`report_progress`](Self::report_progress) summarises the team.
pub struct Orchestrator {
    name: String,
    team_name: Option<String>,
    roster: RwLock<Roster>,
    registry: Option<Arc<NodeRegistry>>,
    activity_log: Mutex<ActivityLog>,
    context: DashMap<String, Value>,
    sink: Arc<dyn EventSink>,
}

impl Orchestrator {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            team_name: None,
            roster: RwLock::new(Roster::default()),
            registry: None,
            activity_log: Mutex::new(ActivityLog::new()),
            context: DashMap::new(),
            sink: Arc::new(TracingSink),
        }
    }

    /// Team (local) orchestrator
    pub fn team(team_name: impl Into<String>) -> Self {
        let team_name = team_name.into();
        let mut orchestrator = Self::new(format!("Local Orchestrator: {team_name}"));
        orchestrator.team_name = Some(team_name);
        orchestrator
    }

    /// Also register roster nodes into a shared registry
    pub fn with_registry(mut self, registry: &Arc<NodeRegistry>) -> Self {
        self.registry = Some(Arc::clone(registry));
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn team_name(&self) -> Option<&str> {
        self.team_name.as_deref()
    }

    /// Team name, or the orchestrator name for a plain orchestrator
    pub fn display_name(&self) -> &str {
        self.team_name.as_deref().unwrap_or(&self.name)
    }

    pub fn registry(&self) -> Option<&Arc<NodeRegistry>> {
        self.registry.as_ref()
    }

    /// Add a node to the roster (and the shared registry, if any)
    ///
    /// With a shared registry the node also resolves its dependencies through it
    /// and is re-evaluated. Re-registering an id replaces the node but keeps its
    /// roster position.
    pub fn register_node(&self, node: Arc<Node>) {
        if let Some(registry) = &self.registry {
            node.attach_registry(registry);
            registry.register(Arc::clone(&node));
            if let Err(err) = node.evaluate() {
                self.sink
                    .log_error(&self.name, Some(node.id().as_str()), &err.to_string());
            }
        }

        let id = node.id().clone();
        let name = node.name();
        let replaced = self.roster.write().insert(node);

        self.emit(
            EventKind::Node,
            Some(id.as_str()),
            format!("Registered node {name} ({id})"),
        );
        log_node_operation(
            "register",
            Some(id.as_str()),
            Some(&name),
            if replaced { "replaced" } else { "success" },
            Some(&self.name),
        );
    }

    /// Roster node by id
    pub fn node(&self, node_id: &str) -> Option<Arc<Node>> {
        self.roster.read().nodes.get(node_id).cloned()
    }

    /// Roster ids in insertion order
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.roster.read().order.clone()
    }

    /// Roster nodes in insertion order
    pub fn nodes(&self) -> Vec<Arc<Node>> {
        self.roster.read().snapshot()
    }

    pub fn len(&self) -> usize {
        self.roster.read().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roster.read().order.is_empty()
    }

    /// Assign a task to a roster node
    pub fn assign_task(&self, node_id: &str, task: &str) -> OrchestrationResult<()> {
        let node = self.node(node_id).ok_or_else(|| {
            let err = OrchestrationError::UnknownNode {
                node_id: NodeId::from(node_id),
            };
            self.sink
                .log_error(&self.name, Some(node_id), &err.to_string());
            err
        })?;

        node.assign_task(task)?;
        let state = node.evaluate()?;

        self.log_activity(format!("Task assigned to {node_id}: {task}"), None);
        log_task_operation(
            "assign",
            Some(node_id),
            Some(task),
            "success",
            Some(&format!("state {state}")),
        );
        Ok(())
    }

    /// Process every roster node that holds a task, in insertion order
    ///
    /// Never aborts: a waiting or inactive node yields a waiting record. A node in
    /// error and any other failure yield an error record.
    pub fn collect_responses(&self) -> CollectedResponses {
        let mut responses = CollectedResponses::new();

        for node in self.nodes() {
            if node.task().is_none() {
                continue;
            }

            let outcome = match node.process_task() {
                Ok(outcome) => outcome,
                Err(err) if err.is_not_ready() && !node.is_in_state(NodeState::Error) => {
                    TaskOutcome::Waiting {
                        reason: err.to_string(),
                        unresolved_dependencies: node.unresolved_dependencies(),
                    }
                }
                Err(err) => TaskOutcome::Error {
                    message: err.to_string(),
                },
            };

            if let Err(err) = node.evaluate() {
                self.sink
                    .log_error(&self.name, Some(node.id().as_str()), &err.to_string());
            }

            self.log_activity(
                format!("Response from {}: {}", node.id(), outcome.status()),
                serde_json::to_value(&outcome).ok(),
            );
            responses.push(node.id().clone(), outcome);
        }

        responses
    }

    /// Give a task to the first idle roster node that supports it
    ///
    /// Candidates are ordered by priority (1 first), then roster insertion order.
    /// Returns the chosen node id, or `None` when no node is suitable.
    pub fn dispatch(&self, task: &str) -> OrchestrationResult<Option<NodeId>> {
        let mut candidates = self.nodes();
        candidates.sort_by_key(|node| node.priority());

        let Some(node) = candidates
            .into_iter()
            .find(|node| node.is_task_supported(task) && node.is_idle())
        else {
            self.log_activity(format!("No suitable node found for task: {task}."), None);
            return Ok(None);
        };

        node.assign_task(task)?;
        self.log_activity(
            format!("Task '{task}' assigned to node {}.", node.name()),
            Some(json!({ "node_id": node.id() })),
        );
        log_task_operation("dispatch", Some(node.id().as_str()), Some(task), "success", None);
        Ok(Some(node.id().clone()))
    }

    /// Status of every roster node
    pub fn report_progress(&self) -> TeamProgress {
        let progress = self
            .nodes()
            .iter()
            .map(|node| (node.id().to_string(), node.status()))
            .collect();
        let report = TeamProgress {
            team_name: self.display_name().to_string(),
            progress,
        };
        self.log_activity(
            "Progress report".to_string(),
            serde_json::to_value(&report.progress).ok(),
        );
        report
    }

    /// Store data received from another team under `received_data`
    pub fn receive_data(&self, message: &NodeMessage) {
        let data = json!({
            "from": message.sender,
            "message_id": message.message_id,
            "payload": message.payload,
        });
        self.update_context(context_keys::RECEIVED_DATA, data.clone());
        self.log_activity(
            format!(
                "Received {} from {}",
                message.message_type(),
                message.sender
            ),
            Some(data),
        );
    }

    pub fn update_context(&self, key: impl Into<String>, value: Value) {
        self.context.insert(key.into(), value);
    }

    pub fn context_value(&self, key: &str) -> Option<Value> {
        self.context.get(key).map(|entry| entry.value().clone())
    }

    /// Copy of the whole context map
    pub fn context(&self) -> HashMap<String, Value> {
        self.context
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    /// Copy of the activity log
    pub fn activity_log(&self) -> Vec<ActivityRecord> {
        self.activity_log.lock().entries().to_vec()
    }

    pub fn activity_count(&self) -> usize {
        self.activity_log.lock().len()
    }

    pub(crate) fn log_activity(&self, activity: String, details: Option<Value>) {
        self.emit(EventKind::Task, None, activity.clone());
        self.activity_log.lock().append(activity, details);
    }

    pub(crate) fn emit(&self, kind: EventKind, id: Option<&str>, message: String) {
        self.sink
            .log_event(LogEvent::new(kind, self.name.as_str(), id, message));
    }
}

impl fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("name", &self.name)
            .field("team_name", &self.team_name)
            .field("roster", &self.node_ids())
            .finish()
    }
}
