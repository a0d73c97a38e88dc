use crate::common::*;
use agentnet_core::node::{Node, NodeError};
use agentnet_core::state_machine::NodeState;
use proptest::prelude::*;

proptest! {
    /// Property: construction rejects every priority below 1
    #[test]
    fn construction_rejects_invalid_priority(priority in invalid_priority_strategy()) {
        let result = Node::builder("Prop").priority(priority).build();
        prop_assert_eq!(result.unwrap_err(), NodeError::InvalidPriority { priority });
    }

    /// Property: a rejected set_priority leaves the previous value in place
    #[test]
    fn set_priority_keeps_previous_value(
        initial in valid_priority_strategy(),
        invalid in invalid_priority_strategy(),
    ) {
        let node = Node::builder("Prop").priority(initial).build().unwrap();
        prop_assert!(node.set_priority(invalid).is_err());
        prop_assert_eq!(node.priority(), initial);
    }

    /// Property: a task outside the supported set never lands on the node
    #[test]
    fn unsupported_tasks_never_assigned(
        supported in proptest::collection::btree_set(task_name_strategy(), 0..4),
        task in task_name_strategy(),
    ) {
        let node = Node::builder("Prop")
            .supported_tasks(supported.iter().cloned())
            .build()
            .unwrap();
        let result = node.assign_task(task.clone());

        if supported.contains(&task) {
            prop_assert!(result.is_ok());
            prop_assert_eq!(node.task(), Some(task));
            prop_assert_eq!(node.current_state(), Some(NodeState::Processing));
        } else {
            let is_unsupported = matches!(result, Err(NodeError::UnsupportedTask { .. }));
            prop_assert!(is_unsupported);
            prop_assert_eq!(node.task(), None);
            prop_assert_eq!(node.current_state(), Some(NodeState::Ready));
        }
    }

    /// Property: Processing always carries a task
    #[test]
    fn processing_implies_task(ops in proptest::collection::vec(0u8..4, 0..12)) {
        let node = Node::builder("Prop").supported_tasks(["t"]).build().unwrap();
        for op in ops {
            match op {
                0 => { let _ = node.assign_task("t"); }
                1 => { let _ = node.process_task(); }
                2 => { let _ = node.transition_to(NodeState::Processing, "prop"); }
                _ => { let _ = node.evaluate(); }
            }
            if node.current_state() == Some(NodeState::Processing) {
                prop_assert!(node.task().is_some());
            }
        }
    }
}
