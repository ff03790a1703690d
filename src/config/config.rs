use std::path::Path;

use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use super::logging::LoggingConfig;
use super::middleware::{LatencyConfig, MetricsConfig};
use crate::error::ServerError;

/// Version reported by `/headers` when `VERSION` is unset or empty.
pub const DEFAULT_VERSION: &str = "0.1";

/// Environment variable holding the version reported by `/headers`.
pub const VERSION_ENV: &str = "VERSION";

/// Config file used when `HTTPSERVER_CONFIG` is not set.
pub const DEFAULT_CONFIG_PATH: &str = "./config.yaml";

/// Prefix of the environment variables that override config keys.
pub const ENV_PREFIX: &str = "HTTPSERVER_";

/// Main server configuration.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct Config {
    pub bind_address: String,
    /// Reported in the `version` header of `/headers`. Fed from `VERSION`.
    pub app_version: String,
    pub latency: LatencyConfig,
    pub metrics: MetricsConfig,
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_address: "0.0.0.0:8080".to_string(),
            app_version: DEFAULT_VERSION.to_string(),
            latency: LatencyConfig::default(),
            metrics: MetricsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Layers defaults, the YAML file at `path` and `HTTPSERVER_*` variables.
    pub fn figment(path: impl AsRef<Path>) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// The version string, falling back to the default when configured as empty.
    pub fn app_version(&self) -> &str {
        if self.app_version.is_empty() {
            DEFAULT_VERSION
        } else {
            &self.app_version
        }
    }
}

/// Load config from the file named by `HTTPSERVER_CONFIG`, or `./config.yaml`.
/// A missing file is not an error; defaults and environment still apply.
pub fn load_config() -> Result<Config, ServerError> {
    let path = std::env::var(format!("{}CONFIG", ENV_PREFIX))
        .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    load_config_from(path)
}

pub fn load_config_from(path: impl AsRef<Path>) -> Result<Config, ServerError> {
    let mut config = Config::figment(path).extract::<Config>()?;
    // Read verbatim: figment would parse a value like "0.2" as a float.
    if let Ok(version) = std::env::var(VERSION_ENV) {
        config.app_version = version;
    }
    Ok(config)
}

/// Print the JSON schema for the configuration to stdout.
pub fn print_schema() -> Result<(), serde_json::Error> {
    let schema = schema_for!(Config);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
