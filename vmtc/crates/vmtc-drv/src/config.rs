//! Configuration for the vmtc translator.
//!
//! Settings come from a `vmtc.toml` file (every field optional) and are then
//! overridden by command line flags.

use dirs::{config_dir, home_dir};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use vmtc_gen::{DEFAULT_ENTRY_POINT, DEFAULT_STACK_BASE};
use vmtc_sem::CheckPolicy;

use crate::error::{Result, TranslateError};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "vmtc.toml";

/// Highest stack base the bootstrap can load with one A-instruction.
const MAX_STACK_BASE: u16 = 32767;

/// Application configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Global verbose setting.
    #[serde(default)]
    pub verbose: bool,

    /// Code generation settings.
    #[serde(default)]
    pub translate: TranslateConfig,

    /// Whole-program checks run before any code is written.
    #[serde(default)]
    pub checks: CheckPolicy,
}

/// Code generation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TranslateConfig {
    /// Emit `// push constant 7` style comments above each block.
    #[serde(default = "default_true")]
    pub emit_comments: bool,

    /// When to emit the bootstrap.
    #[serde(default)]
    pub bootstrap: BootstrapMode,

    /// Initial SP written by the bootstrap.
    #[serde(default = "default_stack_base")]
    pub stack_base: u16,

    /// Function the bootstrap calls.
    #[serde(default = "default_entry_point")]
    pub entry_point: String,
}

/// When the bootstrap sequence is emitted.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum BootstrapMode {
    /// For directory input only.
    #[default]
    Auto,
    /// Always, single files included.
    Always,
    /// Never.
    Never,
}

impl BootstrapMode {
    /// Whether a run over `directory` (or a single file) gets a bootstrap.
    pub fn applies(self, directory: bool) -> bool {
        match self {
            BootstrapMode::Auto => directory,
            BootstrapMode::Always => true,
            BootstrapMode::Never => false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_stack_base() -> u16 {
    DEFAULT_STACK_BASE
}

fn default_entry_point() -> String {
    DEFAULT_ENTRY_POINT.to_string()
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            emit_comments: true,
            bootstrap: BootstrapMode::default(),
            stack_base: default_stack_base(),
            entry_point: default_entry_point(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verbose: false,
            translate: TranslateConfig::default(),
            checks: CheckPolicy::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Searches for configuration in the following order:
    /// 1. Current directory
    /// 2. `~/.config/vmtc/`
    /// 3. System configuration directory
    ///
    /// Returns the default configuration if no config file is found.
    pub fn load() -> Result<Self> {
        match Self::find_config_file() {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(TranslateError::Config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path).map_err(|source| TranslateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            TranslateError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a specific path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let io_error = |source| TranslateError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            TranslateError::Config(format!("Failed to serialize configuration: {}", e))
        })?;

        std::fs::write(path, content).map_err(io_error)?;
        Ok(())
    }

    /// Reject settings the generator could not honour.
    pub fn validate(&self) -> Result<()> {
        if self.translate.stack_base > MAX_STACK_BASE {
            return Err(TranslateError::Config(format!(
                "stack_base {} is above {}",
                self.translate.stack_base, MAX_STACK_BASE
            )));
        }
        let entry = self.translate.entry_point.as_str();
        if entry.is_empty() || entry.chars().any(char::is_whitespace) {
            return Err(TranslateError::Config(format!(
                "entry_point {:?} is not a function name",
                entry
            )));
        }
        Ok(())
    }

    fn check_current_dir_config() -> Option<PathBuf> {
        let path = PathBuf::from(CONFIG_FILE_NAME);
        path.exists().then_some(path)
    }

    fn check_home_config() -> Option<PathBuf> {
        home_dir()
            .map(|dir| dir.join(".config").join("vmtc").join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
    }

    fn check_system_config() -> Option<PathBuf> {
        config_dir()
            .map(|dir| dir.join("vmtc").join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
    }

    /// Find the configuration file in standard locations.
    fn find_config_file() -> Option<PathBuf> {
        Self::check_current_dir_config()
            .or_else(Self::check_home_config)
            .or_else(Self::check_system_config)
    }
}
