//! Start-up configuration.
//!
//! An [`AppConfig`] is assembled once from defaults, an optional TOML file
//! and the environment, then handed to the components that need it. Nothing
//! reads the environment after start-up.

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::source::BackendKind;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "REELGRAPH_CONFIG";
/// Bolt URI of the database.
pub const NEO4J_URI_ENV: &str = "NEO4J_URI";
/// Database user.
pub const NEO4J_USER_ENV: &str = "NEO4J_USER";
/// Database password.
pub const NEO4J_PASSWORD_ENV: &str = "NEO4J_PASSWORD";
/// Database name, honored for 3.x servers only.
pub const NEO4J_DATABASE_ENV: &str = "NEO4J_DATABASE";
/// Server version string.
pub const NEO4J_VERSION_ENV: &str = "NEO4J_VERSION";

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_ORIGIN: &str = "http://127.0.0.1";

/// Complete runtime configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Which tuple source to query.
    pub backend: BackendKind,
    /// HTTP listener settings.
    pub server: ServerConfig,
    /// Neo4j connection settings.
    pub neo4j: Neo4jSettings,
    /// In-memory graph settings.
    pub memory: MemorySettings,
}

impl AppConfig {
    /// Reads the TOML file at `explicit`, or the default path when `None`.
    ///
    /// A missing default file yields the defaults; a missing explicit file is
    /// an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => read_file(path),
            None => match default_config_path() {
                Some(path) if path.exists() => read_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Overlays values found through `lookup` (normally the process
    /// environment) on top of the current settings.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let neo4j = &mut self.neo4j;
        for (key, slot) in [
            (NEO4J_URI_ENV, &mut neo4j.uri),
            (NEO4J_USER_ENV, &mut neo4j.user),
            (NEO4J_PASSWORD_ENV, &mut neo4j.password),
            (NEO4J_DATABASE_ENV, &mut neo4j.database),
            (NEO4J_VERSION_ENV, &mut neo4j.version),
        ] {
            if let Some(value) = lookup(key) {
                *slot = value;
            }
        }
    }

    /// Overlays the process environment.
    pub fn apply_process_env(&mut self) {
        self.apply_env(|key| std::env::var(key).ok());
    }
}

/// HTTP listener and CORS settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Origins allowed by CORS.
    pub allow_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: DEFAULT_PORT,
            allow_origins: vec![DEFAULT_ORIGIN.into()],
        }
    }
}

impl ServerConfig {
    /// Parses `host:port` into a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse().map_err(|_| ConfigError::InvalidAddress { value: raw })
    }
}

/// Neo4j settings as written in the config file or environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Neo4jSettings {
    /// Bolt URI.
    pub uri: String,
    /// User name.
    pub user: String,
    /// Password.
    pub password: String,
    /// Database name; only sent to 3.x servers.
    pub database: String,
    /// Server version string.
    pub version: String,
}

impl Default for Neo4jSettings {
    fn default() -> Self {
        Self {
            uri: "neo4j://localhost:7687".into(),
            user: "neo4j".into(),
            password: "password".into(),
            database: "neo4j".into(),
            version: "5".into(),
        }
    }
}

impl Neo4jSettings {
    /// Resolves the settings into driver configuration.
    ///
    /// The database name is kept only when `version` starts with `3`; newer
    /// servers use the driver's default database.
    pub fn resolve(&self) -> Neo4jConfig {
        let database = if self.version.starts_with('3') && !self.database.is_empty() {
            Some(self.database.clone())
        } else {
            None
        };
        Neo4jConfig {
            uri: self.uri.clone(),
            username: self.user.clone(),
            password: self.password.clone(),
            database,
        }
    }
}

/// Driver configuration for the Neo4j tuple source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Neo4jConfig {
    /// Bolt URI.
    pub uri: String,
    /// User name.
    pub username: String,
    /// Password.
    pub password: String,
    /// Database to open, `None` for the server default.
    pub database: Option<String>,
}

/// CSV files for the in-memory backend; the demo graph is used when unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemorySettings {
    /// Nodes CSV.
    pub nodes: Option<PathBuf>,
    /// Edges CSV.
    pub edges: Option<PathBuf>,
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {path}: {source}")]
    Read {
        /// File that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The config file is not valid TOML for [`AppConfig`].
    #[error("failed to parse config {path}: {source}")]
    Parse {
        /// File that was parsed.
        path: PathBuf,
        /// Underlying TOML error.
        source: toml::de::Error,
    },
    /// `host:port` is not a socket address.
    #[error("invalid listen address '{value}'")]
    InvalidAddress {
        /// The rejected address.
        value: String,
    },
    /// Edges were configured without nodes.
    #[error("an edges file requires a nodes file")]
    EdgesWithoutNodes,
}

/// `<config_dir>/reelgraph/config.toml`, when the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join("reelgraph").join("config.toml"))
}

fn read_file(path: &Path) -> Result<AppConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
