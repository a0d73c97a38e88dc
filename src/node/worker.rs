//! # Pluggable Work
//!
//! The work function is the only place business logic lives. The core decides
//! *when* it runs and what state the node is left in; the worker decides *what*
//! comes out.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Context handed to the work function: the node's rendered identity plus the task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPrompt {
    pub system: String,
    pub task: String,
}

impl TaskPrompt {
    /// Build a prompt from an identity template and a task description
    ///
    /// The template may reference `{name}`, `{description}` and `{purpose}`.
    pub fn build(
        template: &str,
        name: &str,
        description: &str,
        purpose: &str,
        task: &str,
    ) -> Self {
        let system = template
            .replace("{name}", name)
            .replace("{description}", description)
            .replace("{purpose}", purpose);
        Self {
            system,
            task: task.to_string(),
        }
    }
}

impl fmt::Display for TaskPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "System: {}\nTask: {}", self.system, self.task)
    }
}

/// The pluggable work function
///
/// Runs to completion on the caller's thread. Any error is absorbed at the node's
/// processing boundary and turned into an Error state.
pub trait TaskWorker: Send + Sync {
    fn execute(&self, task: &str, prompt: &TaskPrompt) -> anyhow::Result<String>;
}

impl<F> TaskWorker for F
where
    F: Fn(&str, &TaskPrompt) -> anyhow::Result<String> + Send + Sync,
{
    fn execute(&self, task: &str, prompt: &TaskPrompt) -> anyhow::Result<String> {
        self(task, prompt)
    }
}

/// Default worker that echoes the task back
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoWorker;

impl TaskWorker for EchoWorker {
    fn execute(&self, task: &str, _prompt: &TaskPrompt) -> anyhow::Result<String> {
        Ok(format!("Generated output for task: {task}"))
    }
}
