use super::error::ConfigResult;
use super::NetworkConfig;
use crate::constants::env_vars;
use config::{Config, Environment, File};
use tracing::debug;

impl NetworkConfig {
    /// Load configuration: defaults, then the optional file, then the environment
    ///
    /// The file may be any format the `config` crate recognizes by extension and is
    /// skipped when absent. Environment variables use the `AGENTNET` prefix with `__`
    /// between section and key, e.g. `AGENTNET_NODE__DEFAULT_PRIORITY=3`.
    pub fn load(path: Option<&str>) -> ConfigResult<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Some(path) = path {
            debug!(path = path, "Adding configuration file source");
            builder = builder.add_source(File::with_name(path).required(false));
        }

        builder = builder.add_source(
            Environment::with_prefix(env_vars::CONFIG_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overlaid with environment variables only
    pub fn from_env() -> ConfigResult<Self> {
        Self::load(None)
    }
}
