//! Treasury operator configuration file handling
//!
//! Provides default configuration generation and loading for the treasury
//! CLI. Configuration files are TOML and stored adjacent to the pool state
//! file.
//!
//! ## Operator vs Pool Rules
//!
//! This file contains OPERATOR configuration only: where the state file
//! lives and how logging behaves. Governance rules (voting window bounds,
//! approval rule) are fixed by the pool and cannot be changed here.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Default log level
const DEFAULT_LOG_LEVEL: &str = "info";

/// Treasury CLI configuration (OPERATOR settings only)
#[derive(Debug, Clone, Deserialize)]
pub struct TreasuryConfig {
    /// Pool state file configuration
    pub state: StateConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// State file configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StateConfig {
    /// Path to the CBOR pool state file
    pub path: PathBuf,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    pub file: Option<PathBuf>,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            file: None,
        }
    }
}

impl TreasuryConfig {
    /// Create a new configuration with the given state path
    pub fn new(state_path: PathBuf) -> Self {
        Self {
            state: StateConfig { path: state_path },
            logging: LoggingConfig::default(),
        }
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;

        let config: TreasuryConfig = toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config file '{}': {}", path.display(), e))?;

        Ok(config)
    }

    /// Generate default configuration content as a string with comments
    pub fn generate_default_toml(state_path: &Path) -> String {
        format!(
            r#"# Treasury Configuration (Operator Settings)
#
# This file contains OPERATOR configuration only: where the pool state
# lives and how the CLI logs.
#
# GOVERNANCE RULES (1-30 day voting window, strict yes > no majority,
# proposer-only execution) are fixed by the pool and cannot be changed here.

[state]
# Path to the CBOR pool state file (created by `treasury init`)
path = "{state_path}"

[logging]
# Log level: trace, debug, info, warn, error
# RUST_LOG overrides this when set.
level = "info"

# Log file path (optional, logs to stderr if not specified)
# file = "/var/log/treasury/treasury.log"
"#,
            state_path = state_path.display()
        )
    }

    /// Create and save a default configuration file
    pub fn create_default(
        config_path: &Path,
        state_path: &Path,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let contents = Self::generate_default_toml(state_path);

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        fs::write(config_path, contents).map_err(|e| {
            format!(
                "Failed to write config file '{}': {}",
                config_path.display(),
                e
            )
        })?;

        Ok(())
    }
}

/// Get the default data directory
///
/// - Data: ~/.local/share/treasury/
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("treasury")
}

/// Get the default config file path
///
/// - Config: ~/.local/share/treasury/config.toml
pub fn default_config_path() -> PathBuf {
    default_data_dir().join("config.toml")
}

/// Get the default state file path based on the config path
///
/// The state file is stored adjacent to the config:
/// - Config: ~/.local/share/treasury/config.toml
/// - State: ~/.local/share/treasury/pool.cbor
pub fn default_state_path(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join("pool.cbor")
}
