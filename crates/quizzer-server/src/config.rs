//! Configuration types for the Quizzer server.
//!
//! Configuration is read from `quizzer.json`. Every field has a default, so
//! an absent file or an empty object yields a working local setup backed by
//! `quizzer.db` in the current directory.

use std::net::SocketAddr;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{QuizError, Result};

/// The default config file name.
const CONFIG_FILE_NAME: &str = "quizzer.json";

/// Default database location.
fn default_database_url() -> String {
    "sqlite://quizzer.db".to_string()
}

/// Default interface to bind.
fn default_host() -> String {
    "127.0.0.1".to_string()
}

/// Default HTTP port.
const fn default_port() -> u16 {
    3000
}

/// Default size of the database connection pool.
const fn default_max_connections() -> u32 {
    5
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// SQLite connection URL (`sqlite://path.db` or `sqlite::memory:`).
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Interface the HTTP server binds to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port the HTTP server listens on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum number of pooled database connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Also run the authoring validator on create requests.
    #[serde(default)]
    pub strict_validation: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            host: default_host(),
            port: default_port(),
            max_connections: default_max_connections(),
            strict_validation: false,
        }
    }
}

impl Config {
    /// Loads configuration from the current working directory.
    ///
    /// Looks for `quizzer.json` in the current directory. If not found,
    /// returns the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but contains invalid JSON.
    pub fn load() -> Result<Self> {
        let current_dir = std::env::current_dir().map_err(|e| {
            QuizError::config_parse(
                "<current directory>",
                format!("cannot determine current directory: {e}"),
            )
        })?;
        Self::load_from_dir(&current_dir)
    }

    /// Loads configuration from `quizzer.json` in a specific directory.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        Self::load_from_file(&dir.join(CONFIG_FILE_NAME))
    }

    /// Loads configuration from a specific file path.
    ///
    /// If the file does not exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::ConfigParseError` if the file exists but contains
    /// invalid JSON, and `QuizError::ConfigValidationError` if the values are
    /// out of range.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let config = Self::default();
                config.validate()?;
                return Ok(config);
            }
            Err(e) => {
                return Err(QuizError::config_parse(
                    path,
                    format!("failed to read file: {e}"),
                ));
            }
        };

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| QuizError::config_parse(path, e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::ConfigValidationError` if any check fails.
    pub fn validate(&self) -> Result<()> {
        if self.database_url.trim().is_empty() {
            return Err(QuizError::config_validation(
                "databaseUrl must not be empty",
                "Set databaseUrl to e.g. \"sqlite://quizzer.db\" in your quizzer.json",
            ));
        }

        if self.host.trim().is_empty() {
            return Err(QuizError::config_validation(
                "host must not be empty",
                "Set host to an interface address such as \"127.0.0.1\" in your quizzer.json",
            ));
        }

        if self.port == 0 {
            return Err(QuizError::config_validation(
                "port must be greater than 0",
                "Set port to a free TCP port in your quizzer.json or pass --port",
            ));
        }

        if self.max_connections == 0 {
            return Err(QuizError::config_validation(
                "maxConnections must be greater than 0",
                "Set maxConnections to at least 1 in your quizzer.json",
            ));
        }

        Ok(())
    }

    /// The socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::ConfigValidationError` if `host` is not an IP address.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| {
                QuizError::config_validation(
                    format!("host '{}' is not a valid IP address: {e}", self.host),
                    "Use a literal address such as \"127.0.0.1\" or \"0.0.0.0\"",
                )
            })
    }
}
