use agentnet_core::constants::context_keys;
use agentnet_core::messaging::MessagePayload;
use agentnet_core::node::Node;
use agentnet_core::orchestration::{GlobalOrchestrator, Orchestrator, SubGoal};
use agentnet_core::types::NodeId;
use serde_json::json;
use std::sync::Arc;

fn team(team_name: &str, nodes: &[(&str, &str, i64)]) -> Arc<Orchestrator> {
    let team = Orchestrator::team(team_name);
    for (id, task, priority) in nodes {
        team.register_node(
            Node::builder(format!("{team_name}/{id}"))
                .id(*id)
                .priority(*priority)
                .supported_tasks([*task])
                .build()
                .unwrap(),
        );
    }
    Arc::new(team)
}

fn website_goal(goal: &str, _teams: &[String]) -> Vec<SubGoal> {
    assert_eq!(goal, "Build website");
    vec![
        SubGoal::new("Team_A", "Design website layout"),
        SubGoal::new("Team_B", "Write website content"),
    ]
}

#[test]
fn test_goal_flows_to_teams() {
    let global = GlobalOrchestrator::new().with_planner(website_goal);
    global.register_team(team(
        "Team_A",
        &[
            ("a-junior", "Design website layout", 3),
            ("a-senior", "Design website layout", 1),
        ],
    ));
    global.register_team(team("Team_B", &[("b1", "Write website content", 1)]));

    let report = global.assign_high_level_goal("Build website").unwrap();
    assert!(report.missing_teams.is_empty());
    assert_eq!(report.assignments[0].assigned_to, Some(NodeId::from("a-senior")));
    assert_eq!(report.assignments[1].assigned_to, Some(NodeId::from("b1")));

    let updates = global.collect_team_updates();
    let team_a = updates.iter().find(|u| u.team_name == "Team_A").unwrap();
    assert_eq!(team_a.progress["a-senior"], "processing");
    assert_eq!(team_a.progress["a-junior"], "idle");

    let stored = global.context_value("Team_B").unwrap();
    assert_eq!(stored["progress"]["b1"], "processing");
}

#[test]
fn test_missing_team_is_not_fatal() {
    let global = GlobalOrchestrator::new().with_planner(website_goal);
    global.register_team(team("Team_B", &[("b1", "Write website content", 1)]));

    let report = global.assign_high_level_goal("Build website").unwrap();
    assert_eq!(report.missing_teams, vec!["Team_A"]);
    assert_eq!(report.assignments.len(), 1);
}

#[test]
fn test_team_without_capable_node() {
    let global = GlobalOrchestrator::new();
    global.register_team(team("Team_A", &[("a1", "something else", 1)]));

    let report = global.assign_high_level_goal("Build website").unwrap();
    assert_eq!(report.assignments[0].assigned_to, None);
    assert_eq!(
        global.team("Team_A").unwrap().activity_log().last().unwrap().activity,
        "No suitable node found for task: Build website."
    );
}

#[test]
fn test_mediation_forwards_provenance() {
    let global = GlobalOrchestrator::new();
    let target = team("Team_B", &[]);
    global.register_team(team("Team_A", &[]));
    global.register_team(Arc::clone(&target));

    let message = global
        .mediate_team_interaction(
            "Team_A",
            "Team_B",
            MessagePayload::DependencyResponse {
                task_id: "layout".to_string(),
                provided_data: json!({"grid": 12}),
            },
        )
        .unwrap();

    let received = target.context_value(context_keys::RECEIVED_DATA).unwrap();
    assert_eq!(received["from"], "Team_A");
    assert_eq!(received["message_id"], json!(message.message_id));
    assert_eq!(received["payload"]["type"], "dependency_response");
    assert_eq!(received["payload"]["provided_data"]["grid"], 12);

    assert!(global
        .mediate_team_interaction(
            "Team_A",
            "Team_Q",
            MessagePayload::StatusUpdate {
                task_id: None,
                status: "idle".to_string(),
                progress: None,
                issues: None,
            },
        )
        .is_err());
}
