use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const APP_NAME: &str = "ctxtree";
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Leaf names used by the synthetic stress workload when none are configured.
pub const DEFAULT_LEAF_NAMES: [&str; 9] = [
    "Time",
    "Defects",
    "Size",
    "Estimated Time",
    "Completed",
    "Started",
    "Node_Type",
    "Rollup",
    "Notes",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default log level, overridden by `--log-level` and `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Synthetic workload used by `ctxtree stress`
    #[serde(default)]
    pub stress: StressConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressConfig {
    #[serde(default = "default_entries")]
    pub entries: usize,
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_leaf_names")]
    pub leaf_names: Vec<String>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_entries() -> usize {
    30_000
}

fn default_max_depth() -> usize {
    6
}

fn default_seed() -> u64 {
    0x5eed
}

fn default_leaf_names() -> Vec<String> {
    DEFAULT_LEAF_NAMES.iter().map(|s| s.to_string()).collect()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            stress: StressConfig::default(),
        }
    }
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            entries: default_entries(),
            max_depth: default_max_depth(),
            seed: default_seed(),
            leaf_names: default_leaf_names(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the ctxtree directory (~/.ctxtree)
    pub ctxtree_dir: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the ctxtree directory path (custom or default ~/.ctxtree)
    pub fn ctxtree_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }
        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Write a config file into a fresh ctxtree directory
    pub fn init(custom_path: Option<PathBuf>, config: Option<AppConfig>) -> Result<Self, StateError> {
        let ctxtree_dir = Self::ctxtree_dir(custom_path)?;
        let config_path = ctxtree_dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            return Err(StateError::AlreadyInitialized);
        }

        fs::create_dir_all(&ctxtree_dir)?;

        let config = config.unwrap_or_default();
        let config_toml = toml::to_string_pretty(&config)?;
        fs::write(&config_path, config_toml)?;

        Ok(Self {
            ctxtree_dir,
            config_path,
            config,
        })
    }

    /// Load state from the ctxtree directory. A missing config file is not
    /// an error; every field falls back to its default.
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let ctxtree_dir = Self::ctxtree_dir(custom_path)?;
        let config_path = ctxtree_dir.join(CONFIG_FILE_NAME);

        let config = if config_path.exists() {
            let config_toml = fs::read_to_string(&config_path)?;
            toml::from_str(&config_toml)?
        } else {
            AppConfig::default()
        };

        Ok(Self {
            ctxtree_dir,
            config_path,
            config,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("ctxtree directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}
