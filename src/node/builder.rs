use super::errors::{validate_priority, NodeError, NodeResult};
use super::worker::{EchoWorker, TaskWorker};
use super::{Node, NodeInner};
use crate::activity::ActivityLog;
use crate::config::NodeConfig;
use crate::constants::{defaults, status};
use crate::events::{EventSink, TracingSink};
use crate::logging::log_node_operation;
use crate::registry::NodeRegistry;
use crate::state_machine::StateMachine;
use crate::types::NodeId;
use parking_lot::{Mutex, RwLock};
use std::collections::BTreeSet;
use std::sync::{Arc, Weak};

/// Builder for [`Node`]
///
/// `build` validates the priority and the initial task, registers the node in the
/// attached registry and runs the first evaluation.
pub struct NodeBuilder {
    name: String,
    id: Option<NodeId>,
    description: String,
    purpose: String,
    priority: i64,
    identity_template: String,
    supported_tasks: BTreeSet<String>,
    dependencies: Vec<NodeId>,
    task: Option<String>,
    registry: Option<Arc<NodeRegistry>>,
    worker: Arc<dyn TaskWorker>,
    sink: Arc<dyn EventSink>,
}

impl NodeBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            description: String::new(),
            purpose: String::new(),
            priority: defaults::PRIORITY,
            identity_template: defaults::IDENTITY_TEMPLATE.to_string(),
            supported_tasks: BTreeSet::new(),
            dependencies: Vec::new(),
            task: None,
            registry: None,
            worker: Arc::new(EchoWorker),
            sink: Arc::new(TracingSink),
        }
    }

    /// Use an explicit id instead of a generated one
    pub fn id(mut self, id: impl Into<NodeId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn purpose(mut self, purpose: impl Into<String>) -> Self {
        self.purpose = purpose.into();
        self
    }

    pub fn priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    pub fn identity_template(mut self, template: impl Into<String>) -> Self {
        self.identity_template = template.into();
        self
    }

    pub fn supported_tasks<I, S>(mut self, tasks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.supported_tasks.extend(tasks.into_iter().map(Into::into));
        self
    }

    /// Ordered dependency list; duplicates are dropped
    pub fn dependencies<I, D>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<NodeId>,
    {
        for dependency in dependencies {
            let dependency = dependency.into();
            if !self.dependencies.contains(&dependency) {
                self.dependencies.push(dependency);
            }
        }
        self
    }

    /// Initial task; must be one of the supported tasks
    pub fn task(mut self, task: impl Into<String>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// Shared registry the node registers into and resolves dependencies through
    pub fn registry(mut self, registry: &Arc<NodeRegistry>) -> Self {
        self.registry = Some(Arc::clone(registry));
        self
    }

    pub fn worker(mut self, worker: impl TaskWorker + 'static) -> Self {
        self.worker = Arc::new(worker);
        self
    }

    pub fn shared_worker(mut self, worker: Arc<dyn TaskWorker>) -> Self {
        self.worker = worker;
        self
    }

    pub fn sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Apply configured defaults for priority and identity template
    pub fn config(mut self, config: &NodeConfig) -> Self {
        self.priority = config.default_priority;
        self.identity_template = config.identity_template.clone();
        self
    }

    pub fn build(self) -> NodeResult<Arc<Node>> {
        let priority = validate_priority(self.priority)?;
        let id = self.id.unwrap_or_else(NodeId::generate);

        if let Some(task) = &self.task {
            if !self.supported_tasks.contains(task) {
                return Err(NodeError::UnsupportedTask {
                    node_id: id,
                    task: task.clone(),
                });
            }
        }

        let state_machine =
            StateMachine::new(id.clone(), self.name.clone(), Arc::clone(&self.sink));
        let inner = NodeInner {
            name: self.name,
            description: self.description,
            purpose: self.purpose,
            identity_template: self.identity_template,
            priority,
            status: status::UNINITIALIZED.to_string(),
            task: self.task,
            supported_tasks: self.supported_tasks,
            dependencies: self.dependencies,
            activity_log: ActivityLog::new(),
            last_error: None,
            state_machine,
        };

        let node = Arc::new(Node {
            id,
            inner: Mutex::new(inner),
            registry: RwLock::new(
                self.registry
                    .as_ref()
                    .map(Arc::downgrade)
                    .unwrap_or_else(Weak::new),
            ),
            worker: self.worker,
            sink: self.sink,
        });

        if let Some(registry) = &self.registry {
            registry.register(Arc::clone(&node));
        }

        let state = node.evaluate()?;
        log_node_operation(
            "create",
            Some(node.id.as_str()),
            Some(&node.name()),
            "success",
            Some(&format!("initial state {state}")),
        );
        Ok(node)
    }
}
