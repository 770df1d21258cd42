//! Server configuration.
//!
//! Values come from `NOTEPAD_*` environment variables (a `.env` file is
//! honored) and are validated before the server starts.

use notepad_core::db::IN_MEMORY_PATH;
use std::error::Error;
use std::fmt::{Display, Formatter};
use validator::Validate;

pub const ENV_HOST: &str = "NOTEPAD_HOST";
pub const ENV_PORT: &str = "NOTEPAD_PORT";
pub const ENV_DB_PATH: &str = "NOTEPAD_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "NOTEPAD_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "NOTEPAD_LOG_DIR";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: &str = "8080";
const DEFAULT_DB_PATH: &str = "notepad.sqlite3";

#[derive(Debug)]
pub enum ConfigError {
    Parse {
        field: &'static str,
        value: String,
        message: String,
    },
    Validation(validator::ValidationErrors),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse {
                field,
                value,
                message,
            } => write!(f, "invalid value `{value}` for {field}: {message}"),
            Self::Validation(errors) => write!(f, "invalid configuration: {errors}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse { .. } => None,
            Self::Validation(errors) => Some(errors),
        }
    }
}

impl From<validator::ValidationErrors> for ConfigError {
    fn from(value: validator::ValidationErrors) -> Self {
        Self::Validation(value)
    }
}

/// Runtime configuration for the notepad HTTP server.
#[derive(Clone, Debug, PartialEq, Eq, Validate)]
pub struct ServerConfig {
    #[validate(length(min = 1, message = "HTTP host cannot be empty"))]
    pub http_host: String,

    #[validate(range(min = 1, message = "HTTP port must be between 1 and 65535"))]
    pub http_port: u16,

    /// SQLite file path, or `:memory:` for a throwaway database.
    #[validate(length(min = 1, message = "database path cannot be empty"))]
    pub db_path: String,

    /// One of `trace|debug|info|warn|error`; checked again by logging init.
    #[validate(length(min = 1, message = "log level cannot be empty"))]
    pub log_level: String,

    /// Absolute directory for rolling log files; stderr when unset.
    pub log_dir: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_host: DEFAULT_HOST.to_string(),
            http_port: 8080,
            db_path: DEFAULT_DB_PATH.to_string(),
            log_level: notepad_core::default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl ServerConfig {
    /// Loads configuration from the process environment and `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let port_text = lookup(ENV_PORT).unwrap_or_else(|| DEFAULT_PORT.to_string());
        let http_port = port_text.trim().parse::<u16>().map_err(|err| ConfigError::Parse {
            field: ENV_PORT,
            value: port_text.clone(),
            message: format!("{err}"),
        })?;

        let config = Self {
            http_host: lookup(ENV_HOST).unwrap_or(defaults.http_host),
            http_port,
            db_path: lookup(ENV_DB_PATH).unwrap_or(defaults.db_path),
            log_level: lookup(ENV_LOG_LEVEL).unwrap_or(defaults.log_level),
            log_dir: lookup(ENV_LOG_DIR).filter(|dir| !dir.trim().is_empty()),
        };

        config.validated()
    }

    /// Re-checks field constraints, e.g. after command-line overrides.
    pub fn validated(self) -> Result<Self, ConfigError> {
        self.validate()?;
        Ok(self)
    }

    /// Address the HTTP listener binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }

    pub fn uses_in_memory_db(&self) -> bool {
        self.db_path == IN_MEMORY_PATH
    }
}
