//! Configuration for minidfs components

use crate::common::{Node, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "minidfs";

/// Prefix of environment overrides, e.g. `MINIDFS_LOG_LEVEL=debug`
pub const ENV_PREFIX: &str = "MINIDFS";

/// Global configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Coordinator config
    #[serde(default)]
    pub coordinator: CoordinatorConfig,

    /// Logging level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            coordinator: CoordinatorConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load config from a TOML file and `MINIDFS_*` environment variables.
    ///
    /// With no explicit path, `minidfs.toml` in the working directory is used
    /// if it exists. Nested keys use a double underscore in the environment,
    /// e.g. `MINIDFS_COORDINATOR__NODES=10.0.0.1:8080,10.0.0.2:8080`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("coordinator.nodes")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

/// Coordinator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    /// Storage nodes, in placement order
    #[serde(default)]
    pub nodes: Vec<Node>,

    /// Directory for staged downloads (system temp dir if unset)
    #[serde(default)]
    pub staging_dir: Option<PathBuf>,

    /// Reject downloads whose size differs from the size recorded at upload
    #[serde(default = "default_verify_download_size")]
    pub verify_download_size: bool,

    /// Per-request timeout; unset leaves the transport default
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
}

fn default_verify_download_size() -> bool {
    true
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            staging_dir: None,
            verify_download_size: default_verify_download_size(),
            request_timeout_ms: None,
        }
    }
}

impl CoordinatorConfig {
    pub fn with_nodes(nodes: Vec<Node>) -> Self {
        Self {
            nodes,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(crate::Error::InvalidConfig(
                "at least one storage node is required".into(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    pub fn staging_dir(&self) -> PathBuf {
        self.staging_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}
