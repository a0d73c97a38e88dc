//! # System Constants
//!
//! Status strings, context keys and environment variable names shared across the
//! node, registry and orchestration layers.

/// Status projections written to `Node::status`
pub mod status {
    /// Idle sentinel: Ready with no task. Dependency resolution compares against this.
    pub const IDLE: &str = "idle";
    pub const UNINITIALIZED: &str = "uninitialized";
    pub const WAITING: &str = "waiting";
    pub const READY: &str = "ready";
    pub const PROCESSING: &str = "processing";
    pub const ERROR: &str = "error";
    pub const INACTIVE: &str = "inactive";
}

/// Subject used for log records emitted by the registry
pub mod subjects {
    pub const REGISTRY: &str = "registry";
}

/// Well-known orchestrator context keys
pub mod context_keys {
    pub const RECEIVED_DATA: &str = "received_data";
    pub const LAST_GOAL: &str = "last_goal";
}

/// Environment variables consulted at startup
pub mod env_vars {
    pub const ENVIRONMENT: &str = "AGENTNET_ENV";
    pub const APP_ENVIRONMENT: &str = "APP_ENV";
    pub const CONFIG_PREFIX: &str = "AGENTNET";
}

/// Node construction defaults
pub mod defaults {
    pub const PRIORITY: i64 = 1;
    pub const EVENT_CHANNEL_CAPACITY: usize = 1000;
    pub const IDENTITY_TEMPLATE: &str =
        "You are {name}: {description}. Your purpose is {purpose}.";
    pub const ORCHESTRATOR_NAME: &str = "Global Orchestrator";
}
