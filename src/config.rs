//! Layered configuration: defaults, an optional TOML file, then `VFS_SCAFFOLD__*` variables.

use std::path::Path;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ScaffoldError;
use crate::logging::LoggingConfig;
use crate::scaffold::DEFAULT_DIR_MODE;

/// Prefix of environment overrides, e.g. `VFS_SCAFFOLD__LOGGING__FORMAT=json`.
pub const ENV_PREFIX: &str = "VFS_SCAFFOLD";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaffoldConfig {
    /// Mode of directories created while materializing.
    #[serde(default = "default_dir_mode")]
    pub dir_mode: u32,

    /// Whether `inspect` reports file contents.
    #[serde(default)]
    pub include_contents: bool,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_dir_mode() -> u32 {
    DEFAULT_DIR_MODE
}

impl Default for ScaffoldConfig {
    fn default() -> Self {
        Self {
            dir_mode: default_dir_mode(),
            include_contents: false,
            logging: LoggingConfig::default(),
        }
    }
}

impl ScaffoldConfig {
    /// Loads and validates the configuration. A given `path` must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ScaffoldError> {
        Self::load_with(path, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_with(path: Option<&Path>, env: Environment) -> Result<Self, ScaffoldError> {
        let mut builder = builder_with_defaults()?;
        if let Some(path) = path {
            debug!(config_path = %path.display(), "loading configuration file");
            builder = builder.add_source(
                File::from(path)
                    .format(FileFormat::Toml)
                    .required(true),
            );
        }
        let config: ScaffoldConfig = builder
            .add_source(env.separator("__").try_parsing(true))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ScaffoldError> {
        if self.dir_mode > 0o777 {
            return Err(invalid(format!(
                "dir_mode {:#o} is not a permission mode (max 0o777)",
                self.dir_mode
            )));
        }
        match self.logging.format.as_str() {
            "text" | "json" => Ok(()),
            other => Err(invalid(format!(
                "logging.format '{other}' is not one of text, json"
            ))),
        }
    }
}

fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let logging = LoggingConfig::default();
    Config::builder()
        .set_default("dir_mode", i64::from(DEFAULT_DIR_MODE))?
        .set_default("include_contents", false)?
        .set_default("logging.level", logging.level)?
        .set_default("logging.format", logging.format)
}

fn invalid(message: String) -> ScaffoldError {
    ScaffoldError::Config(ConfigError::Message(message))
}
