use crate::constants::subjects;
use crate::events::{EventKind, EventSink, LogEvent, TracingSink};
use crate::node::Node;
use crate::types::NodeId;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Thread-safe map of node id to node
pub struct NodeRegistry {
    nodes: RwLock<HashMap<NodeId, Arc<Node>>>,
    sink: Arc<dyn EventSink>,
}

impl NodeRegistry {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self {
            nodes: RwLock::new(HashMap::new()),
            sink,
        }
    }

    /// Insert or overwrite by node id; last writer wins
    pub fn register(&self, node: Arc<Node>) {
        let id = node.id().clone();
        let name = node.name();
        let replaced = self.nodes.write().insert(id.clone(), node).is_some();

        if replaced {
            warn!(node_id = %id, "Node already registered, replacing");
        }
        self.emit(
            Some(id.as_str()),
            if replaced {
                format!("Replaced node {name} ({id})")
            } else {
                format!("Registered node {name} ({id})")
            },
        );
    }

    /// Remove a node; no-op when absent
    pub fn deregister(&self, id: &str) -> Option<Arc<Node>> {
        let removed = self.nodes.write().remove(id);
        self.emit(
            Some(id),
            if removed.is_some() {
                format!("Deregistered node {id}")
            } else {
                format!("Node {id} not registered; nothing to deregister")
            },
        );
        removed
    }

    /// Look up a node; absence is a value, not an error
    pub fn lookup(&self, id: &str) -> Option<Arc<Node>> {
        self.nodes.read().get(id).cloned()
    }

    /// Snapshot of every registered node, ordered by id
    pub fn all(&self) -> Vec<Arc<Node>> {
        let mut nodes: Vec<_> = self.nodes.read().values().cloned().collect();
        nodes.sort_by(|a, b| a.id().as_str().cmp(b.id().as_str()));
        nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.read().is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.read().contains_key(id)
    }

    /// Emit one debug record per registered node
    pub fn debug_registry(&self) {
        // Snapshot first: reading a node locks it, and nodes read the registry.
        for node in self.all() {
            self.sink.log_event(LogEvent::new(
                EventKind::Debug,
                subjects::REGISTRY,
                Some(node.id().as_str()),
                format!("Node {}: {}, Status: {}", node.id(), node.name(), node.status()),
            ));
        }
    }
}

impl NodeRegistry {
    fn emit(&self, id: Option<&str>, message: String) {
        self.sink
            .log_event(LogEvent::new(EventKind::Registry, subjects::REGISTRY, id, message));
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new(Arc::new(TracingSink))
    }
}

impl fmt::Debug for NodeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<String> = self.all().iter().map(|n| n.id().to_string()).collect();
        f.debug_struct("NodeRegistry").field("nodes", &ids).finish()
    }
}
