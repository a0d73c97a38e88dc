//! Node and registry fixtures shared across integration tests

use agentnet_core::events::{EventKind, EventPublisher, LogEvent};
use agentnet_core::node::{Node, NodeBuilder, TaskPrompt};
use agentnet_core::registry::NodeRegistry;
use std::sync::Arc;
use tokio::sync::broadcast;

pub fn registry() -> Arc<NodeRegistry> {
    Arc::new(NodeRegistry::default())
}

/// The frontend node used throughout the workflow tests
pub fn frontend_node() -> NodeBuilder {
    Node::builder("FrontendCoderNode")
        .id("frontend1")
        .description("Handles frontend coding tasks.")
        .purpose("Frontend Development")
        .supported_tasks(["UI design"])
}

pub fn security_node() -> NodeBuilder {
    Node::builder("SecurityNode")
        .id("security1")
        .description("Handles cybersecurity tasks.")
        .purpose("Cybersecurity")
        .supported_tasks(["security analysis"])
}

/// Plain node supporting `tasks`, registered into `registry`
pub fn registered_node(registry: &Arc<NodeRegistry>, id: &str, tasks: &[&str]) -> Arc<Node> {
    Node::builder(format!("Node {id}"))
        .id(id)
        .supported_tasks(tasks.iter().copied())
        .registry(registry)
        .build()
        .expect("node should build")
}

/// Node whose work function always fails
pub fn failing_node(id: &str, task: &str) -> Arc<Node> {
    Node::builder(format!("Failing {id}"))
        .id(id)
        .supported_tasks([task])
        .worker(|_: &str, _: &TaskPrompt| -> anyhow::Result<String> {
            anyhow::bail!("Execution failed")
        })
        .build()
        .expect("node should build")
}

/// Drain whatever is buffered on a publisher subscription
pub fn drain(receiver: &mut broadcast::Receiver<LogEvent>) -> Vec<LogEvent> {
    let mut events = Vec::new();
    while let Ok(event) = receiver.try_recv() {
        events.push(event);
    }
    events
}

pub fn observed_publisher() -> (Arc<EventPublisher>, broadcast::Receiver<LogEvent>) {
    let publisher = Arc::new(EventPublisher::new(256));
    let receiver = publisher.subscribe();
    (publisher, receiver)
}

pub fn count_kind(events: &[LogEvent], kind: EventKind) -> usize {
    events.iter().filter(|event| event.kind == kind).count()
}
