use serde::{Deserialize, Serialize};
use std::fmt;

/// Node lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeState {
    /// At least one dependency is unresolved
    Waiting,
    /// Dependencies resolved, no task assigned
    Ready,
    /// Dependencies resolved and a task is assigned
    Processing,
    /// The last unit of work failed
    Error,
    /// Administratively paused
    Inactive,
}

impl NodeState {
    /// All states, in declaration order
    pub const ALL: [NodeState; 5] = [
        Self::Waiting,
        Self::Ready,
        Self::Processing,
        Self::Error,
        Self::Inactive,
    ];

    /// States reachable from this one through a checked transition
    pub fn allowed_targets(&self) -> &'static [NodeState] {
        match self {
            Self::Waiting => &[Self::Ready, Self::Processing, Self::Error, Self::Inactive],
            Self::Ready => &[Self::Waiting, Self::Processing, Self::Error, Self::Inactive],
            Self::Processing => &[Self::Waiting, Self::Ready, Self::Error, Self::Inactive],
            Self::Error => &[Self::Waiting, Self::Ready, Self::Inactive],
            Self::Inactive => &[Self::Waiting, Self::Ready, Self::Error],
        }
    }

    /// Check if a checked transition to `target` is legal
    pub fn can_transition_to(&self, target: NodeState) -> bool {
        self.allowed_targets().contains(&target)
    }

    /// Check if a task may be processed while in this state
    pub fn can_process_task(&self) -> bool {
        matches!(self, Self::Ready | Self::Processing)
    }

    /// States that automatic evaluation never leaves; they need an explicit exit
    pub fn is_sticky(&self) -> bool {
        matches!(self, Self::Error | Self::Inactive)
    }

    /// Check if this is an error state that may allow recovery
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }

    /// Check if this is an active state (task is being processed)
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Processing)
    }
}

impl fmt::Display for NodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Waiting => write!(f, "waiting"),
            Self::Ready => write!(f, "ready"),
            Self::Processing => write!(f, "processing"),
            Self::Error => write!(f, "error"),
            Self::Inactive => write!(f, "inactive"),
        }
    }
}

impl std::str::FromStr for NodeState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "waiting" => Ok(Self::Waiting),
            "ready" => Ok(Self::Ready),
            "processing" => Ok(Self::Processing),
            "error" => Ok(Self::Error),
            "inactive" => Ok(Self::Inactive),
            _ => Err(format!("Invalid node state: {s}")),
        }
    }
}
