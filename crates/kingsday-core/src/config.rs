//! Configuration loading and typed config structures.
//!
//! The canonical configuration lives in `kingsday.yaml` next to the
//! data directory. Every field has a default, so a missing file yields
//! a fully usable configuration; environment variables override the
//! data directory and bind address for container deployments.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration for the game server.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GameConfig {
    /// Root of the content and runtime data directory.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Game rule settings.
    #[serde(default)]
    pub game: RulesConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            server: ServerConfig::default(),
            game: RulesConfig::default(),
        }
    }
}

impl GameConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override file values:
    /// - `KINGSDAY_DATA_DIR` overrides `data_dir`
    /// - `KINGSDAY_HOST` overrides `server.host`
    /// - `KINGSDAY_PORT` overrides `server.port`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Self = serde_yml::from_str(&contents)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from a file if it exists, otherwise use defaults. Env
    /// overrides apply in both cases.
    pub fn load_or_default(path: &Path) -> Self {
        Self::from_file(path).unwrap_or_else(|_| {
            let mut config = Self::default();
            config.apply_env_overrides();
            config
        })
    }

    /// Apply environment-variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(dir) = std::env::var("KINGSDAY_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Ok(host) = std::env::var("KINGSDAY_HOST") {
            self.server.host = host;
        }
        if let Some(port) = std::env::var("KINGSDAY_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
        {
            self.server.port = port;
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    /// The host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// The TCP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Game rule configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RulesConfig {
    /// Roles that are always seated, whether selected or not.
    #[serde(default = "default_required_roles")]
    pub required_roles: Vec<String>,

    /// The role that receives vendor trade counters at setup.
    #[serde(default = "default_vendor_role")]
    pub vendor_role_id: String,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            required_roles: default_required_roles(),
            vendor_role_id: default_vendor_role(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_host() -> String {
    String::from("0.0.0.0")
}

const fn default_port() -> u16 {
    8420
}

fn default_required_roles() -> Vec<String> {
    vec![String::from("role_finn"), String::from("role_tourist")]
}

fn default_vendor_role() -> String {
    String::from("role_vendor")
}
