use super::errors::{OrchestrationError, OrchestrationResult};
use super::orchestrator::Orchestrator;
use super::planner::{BroadcastPlanner, GoalPlanner};
use super::planner::SubGoal;
use super::types::{FailedAssignment, GoalReport, TeamAssignment, TeamProgress};
use crate::activity::ActivityRecord;
use crate::constants::{context_keys, defaults};
use crate::events::{EventKind, EventSink};
use crate::logging::log_error;
use crate::messaging::{MessagePayload, NodeMessage};
use crate::types::NodeId;
use parking_lot::RwLock;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Coordinates team orchestrators toward a high-level goal
///
/// Teams are keyed by team name and kept in registration order. The global
/// orchestrator has no roster of its own; activity and context live in an inner
/// [`Orchestrator`].
pub struct GlobalOrchestrator {
    core: Orchestrator,
    teams: RwLock<Vec<Arc<Orchestrator>>>,
    planner: Box<dyn GoalPlanner>,
}

impl GlobalOrchestrator {
    pub fn new() -> Self {
        Self::with_name(defaults::ORCHESTRATOR_NAME)
    }

    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            core: Orchestrator::new(name),
            teams: RwLock::new(Vec::new()),
            planner: Box::new(BroadcastPlanner),
        }
    }

    pub fn with_planner(mut self, planner: impl GoalPlanner + 'static) -> Self {
        self.planner = Box::new(planner);
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.core = self.core.with_sink(sink);
        self
    }

    pub fn name(&self) -> &str {
        self.core.name()
    }

    /// Register a team orchestrator under its team name, replacing any previous one
    pub fn register_team(&self, team: Arc<Orchestrator>) {
        let team_name = team.display_name().to_string();
        {
            let mut teams = self.teams.write();
            match teams.iter_mut().find(|t| t.display_name() == team_name) {
                Some(slot) => *slot = team,
                None => teams.push(team),
            }
        }
        self.core
            .emit(EventKind::Node, None, format!("Registered team {team_name}"));
    }

    pub fn team(&self, team_name: &str) -> Option<Arc<Orchestrator>> {
        self.teams
            .read()
            .iter()
            .find(|team| team.display_name() == team_name)
            .cloned()
    }

    /// Team names in registration order
    pub fn team_names(&self) -> Vec<String> {
        self.teams
            .read()
            .iter()
            .map(|team| team.display_name().to_string())
            .collect()
    }

    /// Decompose a goal and dispatch each sub-goal to its team
    ///
    /// Sub-goals naming an unregistered team, or whose dispatch fails, are logged
    /// and listed in the report; they do not stop the remaining sub-goals.
    pub fn assign_high_level_goal(&self, goal: &str) -> OrchestrationResult<GoalReport> {
        self.core
            .log_activity(format!("Assigning goal: {goal}"), None);
        self.core
            .update_context(context_keys::LAST_GOAL, Value::String(goal.to_string()));

        let sub_goals = self.planner.plan(goal, &self.team_names());
        let mut report = GoalReport {
            goal: goal.to_string(),
            ..GoalReport::default()
        };

        for sub_goal in sub_goals {
            let Some(team) = self.team(&sub_goal.team_name) else {
                self.core
                    .log_activity(format!("Team {} not found!", sub_goal.team_name), None);
                log_error(
                    "GlobalOrchestrator",
                    "assign_high_level_goal",
                    &format!("Team {} not found", sub_goal.team_name),
                    Some(goal),
                );
                report.missing_teams.push(sub_goal.team_name);
                continue;
            };

            let dispatched = team.dispatch(&sub_goal.task);
            self.record_dispatch(&mut report, sub_goal, dispatched);
        }

        Ok(report)
    }

    fn record_dispatch(
        &self,
        report: &mut GoalReport,
        sub_goal: SubGoal,
        dispatched: OrchestrationResult<Option<NodeId>>,
    ) {
        match dispatched {
            Ok(assigned_to) => report.assignments.push(TeamAssignment {
                team_name: sub_goal.team_name,
                task: sub_goal.task,
                assigned_to,
            }),
            Err(err) => {
                let error = err.to_string();
                self.core.log_activity(
                    format!(
                        "Team {} failed to dispatch '{}': {error}",
                        sub_goal.team_name, sub_goal.task
                    ),
                    None,
                );
                log_error(
                    "GlobalOrchestrator",
                    "assign_high_level_goal",
                    &error,
                    Some(&report.goal),
                );
                report.failed.push(FailedAssignment {
                    team_name: sub_goal.team_name,
                    task: sub_goal.task,
                    error,
                });
            }
        }
    }

    /// Gather progress from every team and store it in context under the team name
    pub fn collect_team_updates(&self) -> Vec<TeamProgress> {
        let teams: Vec<_> = self.teams.read().clone();
        teams
            .iter()
            .map(|team| {
                let progress = team.report_progress();
                self.core.update_context(
                    progress.team_name.clone(),
                    json!({ "team_name": progress.team_name, "progress": progress.progress }),
                );
                progress
            })
            .collect()
    }

    /// Forward a payload from one team to another with sender provenance
    pub fn mediate_team_interaction(
        &self,
        source_team: &str,
        target_team: &str,
        payload: MessagePayload,
    ) -> OrchestrationResult<NodeMessage> {
        let Some(target) = self.team(target_team) else {
            self.core
                .log_activity(format!("Target team {target_team} not found."), None);
            return Err(OrchestrationError::UnknownTeam {
                team_name: target_team.to_string(),
            });
        };

        let message = NodeMessage::new(source_team, target_team, payload);
        target.receive_data(&message);
        self.core.log_activity(
            format!("Forwarded {} from {source_team} to {target_team}", message.message_type()),
            Some(json!({ "message_id": message.message_id })),
        );
        Ok(message)
    }

    pub fn update_context(&self, key: impl Into<String>, value: Value) {
        self.core.update_context(key, value);
    }

    pub fn context_value(&self, key: &str) -> Option<Value> {
        self.core.context_value(key)
    }

    pub fn context(&self) -> HashMap<String, Value> {
        self.core.context()
    }

    pub fn activity_log(&self) -> Vec<ActivityRecord> {
        self.core.activity_log()
    }
}

impl Default for GlobalOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for GlobalOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobalOrchestrator")
            .field("name", &self.core.name())
            .field("teams", &self.team_names())
            .finish()
    }
}
