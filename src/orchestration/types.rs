use crate::node::TaskOutcome;
use crate::types::NodeId;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One node's answer to a response sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeResponse {
    pub node_id: NodeId,
    pub outcome: TaskOutcome,
}

/// Responses keyed by node id, in roster insertion order
///
/// Serializes as a JSON object `{node_id: outcome}` with keys in sweep order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectedResponses {
    responses: Vec<NodeResponse>,
}

impl CollectedResponses {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, node_id: NodeId, outcome: TaskOutcome) {
        self.responses.push(NodeResponse { node_id, outcome });
    }

    pub fn get(&self, node_id: &str) -> Option<&TaskOutcome> {
        self.responses
            .iter()
            .find(|response| response.node_id.as_str() == node_id)
            .map(|response| &response.outcome)
    }

    pub fn contains(&self, node_id: &str) -> bool {
        self.get(node_id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeResponse> {
        self.responses.iter()
    }

    pub fn node_ids(&self) -> Vec<&NodeId> {
        self.responses.iter().map(|response| &response.node_id).collect()
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    pub fn into_inner(self) -> Vec<NodeResponse> {
        self.responses
    }
}

impl IntoIterator for CollectedResponses {
    type Item = NodeResponse;
    type IntoIter = std::vec::IntoIter<NodeResponse>;

    fn into_iter(self) -> Self::IntoIter {
        self.responses.into_iter()
    }
}

impl Serialize for CollectedResponses {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.responses.len()))?;
        for response in &self.responses {
            map.serialize_entry(response.node_id.as_str(), &response.outcome)?;
        }
        map.end()
    }
}

/// Team progress report: node id to status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamProgress {
    pub team_name: String,
    pub progress: BTreeMap<String, String>,
}

/// Where one sub-goal of a high-level goal ended up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamAssignment {
    pub team_name: String,
    pub task: String,
    /// Node chosen by the team, `None` when no node was suitable
    pub assigned_to: Option<NodeId>,
}

/// A sub-goal whose team failed to dispatch it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedAssignment {
    pub team_name: String,
    pub task: String,
    pub error: String,
}

/// Summary of [`GlobalOrchestrator::assign_high_level_goal`](super::GlobalOrchestrator::assign_high_level_goal)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GoalReport {
    pub goal: String,
    pub assignments: Vec<TeamAssignment>,
    pub missing_teams: Vec<String>,
    #[serde(default)]
    pub failed: Vec<FailedAssignment>,
}
