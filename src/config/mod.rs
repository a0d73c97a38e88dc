//! # Configuration
//!
//! Layered configuration for the node network: built-in defaults, an optional
//! configuration file and `AGENTNET_*` environment variables, validated after
//! loading.
//!
//! ```rust,no_run
//! use agentnet_core::config::NetworkConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = NetworkConfig::load(Some("config/agentnet.toml"))?;
//! agentnet_core::logging::init_structured_logging(&config.logging);
//! # Ok(())
//! # }
//! ```

pub mod error;
mod loader;

use crate::constants::defaults;
use crate::node::errors::validate_priority;
use serde::{Deserialize, Serialize};

pub use error::{ConfigResult, ConfigurationError};

/// Root configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub node: NodeConfig,
    pub events: EventsConfig,
    pub logging: LoggingConfig,
}

/// Defaults applied to nodes built with `NodeBuilder::config`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub default_priority: i64,
    pub identity_template: String,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            default_priority: defaults::PRIORITY,
            identity_template: defaults::IDENTITY_TEMPLATE.to_string(),
        }
    }
}

/// Event publisher settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    /// Broadcast channel capacity
    pub channel_capacity: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            channel_capacity: defaults::EVENT_CHANNEL_CAPACITY,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level filter; derived from the environment when unset
    pub level: Option<String>,
    /// Emit JSON records instead of human-readable lines
    pub json: bool,
}

impl NetworkConfig {
    /// Check values the type system cannot
    pub fn validate(&self) -> ConfigResult<()> {
        if validate_priority(self.node.default_priority).is_err() {
            return Err(ConfigurationError::invalid_value(
                "node.default_priority",
                self.node.default_priority,
                "must be greater than or equal to 1",
            ));
        }

        if self.events.channel_capacity == 0 {
            return Err(ConfigurationError::invalid_value(
                "events.channel_capacity",
                self.events.channel_capacity,
                "must be greater than 0",
            ));
        }

        if let Some(level) = &self.logging.level {
            const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
            if !LEVELS.contains(&level.to_lowercase().as_str()) {
                return Err(ConfigurationError::invalid_value(
                    "logging.level",
                    level,
                    "expected one of trace, debug, info, warn, error",
                ));
            }
        }

        Ok(())
    }
}
