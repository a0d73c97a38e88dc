use crate::common::*;
use agentnet_core::node::{Node, TaskOutcome};
use agentnet_core::state_machine::NodeState;
use agentnet_core::types::NodeId;

#[test]
fn test_unresolved_dependency_forces_waiting() {
    let registry = registry();
    let node = Node::builder("Dependent")
        .supported_tasks(["work"])
        .task("work")
        .dependencies(["dep1"])
        .registry(&registry)
        .build()
        .unwrap();

    assert_eq!(node.current_state(), Some(NodeState::Waiting));
    assert_eq!(node.evaluate().unwrap(), NodeState::Waiting);
    assert_eq!(node.unresolved_dependencies(), vec![NodeId::from("dep1")]);
    assert!(node.process_task().unwrap_err().is_not_ready());
}

#[test]
fn test_resolving_dependencies_unblocks() {
    let registry = registry();
    let without_task = Node::builder("A")
        .dependencies(["dep1"])
        .registry(&registry)
        .build()
        .unwrap();
    let with_task = Node::builder("B")
        .supported_tasks(["work"])
        .task("work")
        .dependencies(["dep1"])
        .registry(&registry)
        .build()
        .unwrap();

    registered_node(&registry, "dep1", &[]);

    assert_eq!(without_task.evaluate().unwrap(), NodeState::Ready);
    assert_eq!(with_task.evaluate().unwrap(), NodeState::Processing);
}

#[test]
fn test_resolve_dependency_removes_entry() {
    let node = Node::builder("Acknowledger")
        .dependencies(["dep1", "dep2"])
        .build()
        .unwrap();

    assert_eq!(node.resolve_dependency("dep1").unwrap(), NodeState::Waiting);
    assert_eq!(node.dependencies(), vec![NodeId::from("dep2")]);
    assert_eq!(node.resolve_dependency("dep2").unwrap(), NodeState::Ready);
    assert_eq!(node.resolve_dependency("dep2").unwrap(), NodeState::Ready);
}

#[test]
fn test_missing_dependency_triggers_recovery() {
    let registry = registry();
    let node = registered_node(&registry, "n1", &[]);
    assert_eq!(node.current_state(), Some(NodeState::Ready));

    node.add_dependency("ghost").unwrap();
    node.force_state(NodeState::Ready, "test");

    assert!(!node.check_dependencies());
    assert_eq!(node.current_state(), Some(NodeState::Waiting));

    registered_node(&registry, "ghost", &[]);
    assert!(node.check_dependencies());
    assert_eq!(node.evaluate().unwrap(), NodeState::Ready);
}

#[test]
fn test_busy_dependency_is_pending() {
    let registry = registry();
    let dep = registered_node(&registry, "dep", &["build"]);
    dep.assign_task("build").unwrap();

    let node = Node::builder("Dependent")
        .dependencies(["dep"])
        .registry(&registry)
        .build()
        .unwrap();
    assert_eq!(node.current_state(), Some(NodeState::Waiting));

    dep.process_task().unwrap();
    assert_eq!(node.evaluate().unwrap(), NodeState::Ready);
}

#[test]
fn test_self_and_mutual_dependencies_do_not_deadlock() {
    let registry = registry();
    let a = Node::builder("A")
        .id("a")
        .dependencies(["a", "b"])
        .registry(&registry)
        .build()
        .unwrap();
    let b = Node::builder("B")
        .id("b")
        .dependencies(["a"])
        .registry(&registry)
        .build()
        .unwrap();

    assert_eq!(a.evaluate().unwrap(), NodeState::Waiting);
    assert_eq!(b.evaluate().unwrap(), NodeState::Waiting);
    assert_eq!(
        a.unresolved_dependencies(),
        vec![NodeId::from("a"), NodeId::from("b")]
    );
}

#[test]
fn test_end_to_end_dependency_workflow() {
    let registry = registry();
    let dep1 = registered_node(&registry, "dep1", &["schema"]);
    let dep2 = registered_node(&registry, "dep2", &["assets"]);
    dep1.assign_task("schema").unwrap();
    dep2.assign_task("assets").unwrap();

    let dependent = Node::builder("Dependent")
        .id("dependent")
        .supported_tasks(["assemble"])
        .dependencies(["dep1", "dep2"])
        .registry(&registry)
        .build()
        .unwrap();
    dependent.assign_task("assemble").unwrap();
    assert_eq!(dependent.current_state(), Some(NodeState::Waiting));

    assert!(dep1.process_task().unwrap().is_success());
    assert!(dep2.process_task().unwrap().is_success());
    assert!(dep1.is_idle() && dep2.is_idle());

    match dependent.process_task().unwrap() {
        TaskOutcome::Success { task, node_id, .. } => {
            assert_eq!(task, "assemble");
            assert_eq!(node_id.as_str(), "dependent");
        }
        other => panic!("Expected success, got {other:?}"),
    }
    assert_eq!(dependent.current_state(), Some(NodeState::Ready));
}

#[test]
fn test_dropped_registry_leaves_dependencies_missing() {
    let registry = registry();
    registered_node(&registry, "dep", &[]);
    let node = Node::builder("Orphan")
        .dependencies(["dep"])
        .registry(&registry)
        .build()
        .unwrap();
    assert_eq!(node.current_state(), Some(NodeState::Ready));

    drop(registry);
    assert!(node.registry().is_none());
    assert_eq!(node.evaluate().unwrap(), NodeState::Waiting);
}
