//! Configuration loading for the EcoScan client
//!
//! Settings are resolved in priority order:
//! 1. Command-line arguments (highest priority)
//! 2. Environment variables (`ECOSCAN_ENDPOINT`, `ECOSCAN_ROOT_FOLDER`)
//! 3. TOML config file
//! 4. Compiled defaults (fallback)
//!
//! A missing TOML file is not an error: the client warns and starts with
//! defaults. A file that exists but cannot be parsed is a configuration error.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Default classifier endpoint (local development server)
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/classify";

/// Default number of history entries kept by the ledger
pub const DEFAULT_MAX_HISTORY: usize = 10;

pub const ENV_ENDPOINT: &str = "ECOSCAN_ENDPOINT";
pub const ENV_ROOT_FOLDER: &str = "ECOSCAN_ROOT_FOLDER";

/// Database file created inside the root folder
pub const DATABASE_FILE_NAME: &str = "ecoscan.db";

/// Bootstrap configuration loaded from TOML file
///
/// Every field is optional; absent fields fall back to compiled defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct TomlConfig {
    /// Classifier endpoint URL
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Folder holding `ecoscan.db`
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// HTTP request timeout in seconds
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Position request timeout in seconds
    #[serde(default)]
    pub location_timeout_secs: Option<u64>,

    /// History ledger capacity
    #[serde(default)]
    pub max_history: Option<usize>,

    /// Fixed position used as the location capability
    #[serde(default)]
    pub location: Option<LocationConfig>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Configured position, in decimal degrees
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
pub struct LocationConfig {
    pub lat: f64,
    pub lon: f64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub endpoint: Option<String>,
    pub root_folder: Option<PathBuf>,
}

/// Fully resolved client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub endpoint: String,
    pub root_folder: PathBuf,
    pub request_timeout: Duration,
    pub location_timeout: Duration,
    pub max_history: usize,
    pub location: Option<LocationConfig>,
    pub logging: LoggingConfig,
}

impl ClientConfig {
    /// Resolve configuration from CLI overrides, environment, TOML and defaults
    pub fn resolve(overrides: ConfigOverrides, toml_config: TomlConfig) -> Result<Self> {
        let endpoint = overrides
            .endpoint
            .or_else(|| std::env::var(ENV_ENDPOINT).ok())
            .or(toml_config.endpoint)
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(Error::Config(format!(
                "Endpoint must be an http(s) URL: {}",
                endpoint
            )));
        }

        let root_folder = overrides
            .root_folder
            .or_else(|| std::env::var(ENV_ROOT_FOLDER).ok().map(PathBuf::from))
            .or(toml_config.root_folder)
            .unwrap_or_else(default_root_folder);

        let max_history = toml_config.max_history.unwrap_or(DEFAULT_MAX_HISTORY);
        if max_history == 0 {
            return Err(Error::Config("max_history must be at least 1".to_string()));
        }

        Ok(Self {
            endpoint,
            root_folder,
            request_timeout: Duration::from_secs(toml_config.request_timeout_secs.unwrap_or(30)),
            location_timeout: Duration::from_secs(toml_config.location_timeout_secs.unwrap_or(10)),
            max_history,
            location: toml_config.location,
            logging: toml_config.logging,
        })
    }

    /// Path of the SQLite database inside the root folder
    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILE_NAME)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            root_folder: default_root_folder(),
            request_timeout: Duration::from_secs(30),
            location_timeout: Duration::from_secs(10),
            max_history: DEFAULT_MAX_HISTORY,
            location: None,
            logging: LoggingConfig::default(),
        }
    }
}

/// Load TOML configuration
///
/// Uses `path` when given, otherwise the platform config file. Returns
/// defaults (with a warning) when the file does not exist.
pub fn load_toml_config(path: Option<&Path>) -> Result<TomlConfig> {
    let config_path = match path {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) => p,
            None => {
                warn!("Could not determine config directory, using defaults");
                return Ok(TomlConfig::default());
            }
        },
    };

    if !config_path.exists() {
        warn!("Config file not found: {:?} (using defaults)", config_path);
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(&config_path)?;
    let config: TomlConfig = toml::from_str(&content).map_err(|e| {
        Error::Config(format!("Failed to parse TOML {:?}: {}", config_path, e))
    })?;

    info!("Loaded TOML configuration from {:?}", config_path);
    Ok(config)
}

/// Platform config file: `<config dir>/ecoscan/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("ecoscan").join("config.toml"))
}

/// OS-dependent default root folder
fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("ecoscan"))
        .unwrap_or_else(|| PathBuf::from("./ecoscan_data"))
}
