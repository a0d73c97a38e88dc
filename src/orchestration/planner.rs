//! Goal decomposition for the global orchestrator.

use serde::{Deserialize, Serialize};

/// A task destined for one team
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubGoal {
    pub team_name: String,
    pub task: String,
}

impl SubGoal {
    pub fn new(team_name: impl Into<String>, task: impl Into<String>) -> Self {
        Self {
            team_name: team_name.into(),
            task: task.into(),
        }
    }
}

/// Breaks a high-level goal into per-team sub-goals
///
/// `teams` lists the currently registered team names in registration order.
/// Planners may name teams that are not registered; the orchestrator reports them.
pub trait GoalPlanner: Send + Sync {
    fn plan(&self, goal: &str, teams: &[String]) -> Vec<SubGoal>;
}

impl<F> GoalPlanner for F
where
    F: Fn(&str, &[String]) -> Vec<SubGoal> + Send + Sync,
{
    fn plan(&self, goal: &str, teams: &[String]) -> Vec<SubGoal> {
        self(goal, teams)
    }
}

/// Hands the goal verbatim to every registered team
#[derive(Debug, Clone, Copy, Default)]
pub struct BroadcastPlanner;

impl GoalPlanner for BroadcastPlanner {
    fn plan(&self, goal: &str, teams: &[String]) -> Vec<SubGoal> {
        teams.iter().map(|team| SubGoal::new(team, goal)).collect()
    }
}

/// Fixed decomposition, independent of the goal text
#[derive(Debug, Clone, Default)]
pub struct StaticPlanner {
    sub_goals: Vec<SubGoal>,
}

impl StaticPlanner {
    pub fn new(sub_goals: Vec<SubGoal>) -> Self {
        Self { sub_goals }
    }
}

impl GoalPlanner for StaticPlanner {
    fn plan(&self, _goal: &str, _teams: &[String]) -> Vec<SubGoal> {
        self.sub_goals.clone()
    }
}
