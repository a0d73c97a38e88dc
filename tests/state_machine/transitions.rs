use crate::common::*;
use agentnet_core::events::EventKind;
use agentnet_core::node::Node;
use agentnet_core::state_machine::{NodeState, StateMachineError};
use agentnet_core::NodeError;

#[test]
fn test_transition_table_matrix() {
    use NodeState::*;

    let legal = [
        (Waiting, Ready),
        (Waiting, Processing),
        (Waiting, Error),
        (Waiting, Inactive),
        (Ready, Waiting),
        (Ready, Processing),
        (Ready, Error),
        (Ready, Inactive),
        (Processing, Waiting),
        (Processing, Ready),
        (Processing, Error),
        (Processing, Inactive),
        (Error, Waiting),
        (Error, Ready),
        (Error, Inactive),
        (Inactive, Waiting),
        (Inactive, Ready),
        (Inactive, Error),
    ];

    for from in NodeState::ALL {
        for to in NodeState::ALL {
            if from == to {
                continue;
            }
            assert_eq!(
                from.can_transition_to(to),
                legal.contains(&(from, to)),
                "{from} -> {to}"
            );
        }
    }
    assert!(!Error.can_transition_to(Processing));
    assert!(!Inactive.can_transition_to(Processing));
}

#[test]
fn test_idempotent_transition_emits_single_note() {
    let (publisher, mut events) = observed_publisher();
    let node = Node::builder("Idempotent")
        .sink(publisher)
        .build()
        .unwrap();
    drain(&mut events);

    assert_eq!(
        node.transition_to(NodeState::Ready, "again").unwrap(),
        NodeState::Ready
    );

    let events = drain(&mut events);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, EventKind::Debug);
    assert_eq!(
        events[0].message,
        "State transition to 'ready' ignored: already in this state."
    );
    assert_eq!(node.current_state(), Some(NodeState::Ready));
}

#[test]
fn test_unreachable_and_unknown_targets() {
    let node = Node::builder("Broken").supported_tasks(["t"]).build().unwrap();
    node.force_state(NodeState::Error, "test");

    let err = node.transition_to_named("processing", "retry").unwrap_err();
    assert!(matches!(
        err,
        NodeError::StateMachine(StateMachineError::GuardFailed { .. })
    ));

    node.assign_task("t").unwrap();
    let err = node.transition_to(NodeState::Processing, "retry").unwrap_err();
    assert!(matches!(
        err,
        NodeError::StateMachine(StateMachineError::InvalidTransition { .. })
    ));
    assert_eq!(node.current_state(), Some(NodeState::Error));

    let err = node.transition_to_named("sleeping", "nope").unwrap_err();
    assert_eq!(
        err,
        NodeError::StateMachine(StateMachineError::InvalidTransition {
            from: Some("error".to_string()),
            to: "sleeping".to_string(),
        })
    );
    assert_eq!(node.current_state(), Some(NodeState::Error));
}

#[test]
fn test_state_names_round_trip() {
    for state in NodeState::ALL {
        assert_eq!(state.to_string().parse::<NodeState>().unwrap(), state);
    }
    assert!("paused".parse::<NodeState>().is_err());
}
