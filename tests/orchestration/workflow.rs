use crate::common::*;
use agentnet_core::node::{Node, TaskOutcome};
use agentnet_core::orchestration::{OrchestrationError, Orchestrator};
use agentnet_core::state_machine::NodeState;
use agentnet_core::types::NodeId;

#[test]
fn test_integration_workflow() {
    let orchestrator = Orchestrator::new("integration");
    orchestrator.register_node(frontend_node().build().unwrap());
    orchestrator.register_node(security_node().build().unwrap());

    orchestrator.assign_task("frontend1", "UI design").unwrap();
    orchestrator
        .assign_task("security1", "security analysis")
        .unwrap();

    let responses = orchestrator.collect_responses();
    assert!(responses.contains("frontend1"));
    assert!(responses.contains("security1"));
    assert_eq!(responses.get("frontend1").unwrap().status(), "success");
    assert_eq!(responses.get("security1").unwrap().status(), "success");

    // 2 tasks assigned + 2 responses collected
    assert_eq!(orchestrator.activity_log().len(), 4);
}

#[test]
fn test_collect_responses_keeps_roster_order() {
    let orchestrator = Orchestrator::new("ordered");
    for id in ["c", "a", "b"] {
        orchestrator.register_node(
            Node::builder(id)
                .id(id)
                .supported_tasks(["t"])
                .build()
                .unwrap(),
        );
        orchestrator.assign_task(id, "t").unwrap();
    }

    let ids: Vec<String> = orchestrator
        .collect_responses()
        .iter()
        .map(|response| response.node_id.to_string())
        .collect();
    assert_eq!(ids, vec!["c", "a", "b"]);
}

#[test]
fn test_collect_responses_records_waiting_and_errors() {
    let registry = registry();
    let orchestrator = Orchestrator::new("mixed").with_registry(&registry);

    let blocked = Node::builder("Blocked")
        .id("blocked")
        .supported_tasks(["t"])
        .dependencies(["missing"])
        .build()
        .unwrap();
    orchestrator.register_node(blocked);
    orchestrator.register_node(failing_node("failing", "t"));
    orchestrator.register_node(registered_node(&registry, "fine", &["t"]));

    for id in ["blocked", "failing", "fine"] {
        orchestrator.assign_task(id, "t").unwrap();
    }

    let responses = orchestrator.collect_responses();
    assert_eq!(responses.len(), 3);

    match responses.get("blocked").unwrap() {
        TaskOutcome::Waiting {
            unresolved_dependencies,
            ..
        } => assert_eq!(unresolved_dependencies, &vec![NodeId::from("missing")]),
        other => panic!("Expected waiting, got {other:?}"),
    }
    assert_eq!(responses.get("failing").unwrap().status(), "error");
    assert!(responses.get("fine").unwrap().is_success());

    assert_eq!(
        orchestrator.node("failing").unwrap().current_state(),
        Some(NodeState::Error)
    );

    let json = serde_json::to_value(&responses).unwrap();
    assert_eq!(json["fine"]["status"], "success");
    assert_eq!(json["blocked"]["status"], "waiting");
}

#[test]
fn test_roster_nodes_resolve_through_orchestrator_registry() {
    let registry = registry();
    let orchestrator = Orchestrator::new("shared").with_registry(&registry);

    let dep = Node::builder("Dependency")
        .id("dep")
        .supported_tasks(["prep"])
        .build()
        .unwrap();
    let dependent = Node::builder("Dependent")
        .id("n")
        .supported_tasks(["t"])
        .dependencies(["dep"])
        .build()
        .unwrap();
    orchestrator.register_node(dependent.clone());
    orchestrator.register_node(dep.clone());
    assert!(dependent.registry().is_some());

    orchestrator.assign_task("dep", "prep").unwrap();
    orchestrator.assign_task("n", "t").unwrap();
    assert_eq!(dependent.current_state(), Some(NodeState::Waiting));

    let first = orchestrator.collect_responses();
    assert!(first.get("dep").unwrap().is_success());
    match first.get("n").unwrap() {
        TaskOutcome::Waiting {
            unresolved_dependencies,
            ..
        } => assert_eq!(unresolved_dependencies, &vec![NodeId::from("dep")]),
        other => panic!("Expected waiting, got {other:?}"),
    }

    let second = orchestrator.collect_responses();
    assert_eq!(second.len(), 1);
    assert!(second.get("n").unwrap().is_success());
    assert!(dep.is_idle());
}

#[test]
fn test_unknown_node_is_reported() {
    let orchestrator = Orchestrator::new("empty");
    assert!(matches!(
        orchestrator.assign_task("nobody", "t"),
        Err(OrchestrationError::UnknownNode { .. })
    ));
}

#[test]
fn test_nodes_without_tasks_are_skipped() {
    let orchestrator = Orchestrator::new("idle");
    orchestrator.register_node(frontend_node().build().unwrap());
    assert!(orchestrator.collect_responses().is_empty());
    assert_eq!(orchestrator.activity_count(), 0);
}

#[test]
fn test_registered_dependencies_resolve_across_orchestrator() {
    let registry = registry();
    let orchestrator = Orchestrator::new("pipeline").with_registry(&registry);

    let schema = Node::builder("Schema")
        .id("schema")
        .supported_tasks(["design schema"])
        .registry(&registry)
        .build()
        .unwrap();
    let api = Node::builder("Api")
        .id("api")
        .supported_tasks(["build api"])
        .dependencies(["schema"])
        .registry(&registry)
        .build()
        .unwrap();
    orchestrator.register_node(schema);
    orchestrator.register_node(api.clone());

    orchestrator.assign_task("schema", "design schema").unwrap();
    orchestrator.assign_task("api", "build api").unwrap();
    assert_eq!(api.current_state(), Some(NodeState::Waiting));

    // schema is swept first and goes idle before api is processed
    let responses = orchestrator.collect_responses();
    assert!(responses.get("schema").unwrap().is_success());
    assert!(responses.get("api").unwrap().is_success());
    assert_eq!(api.current_state(), Some(NodeState::Ready));
}
