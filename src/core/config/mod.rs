//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! cfxml has two configuration scopes:
//! - **Global**: User-level settings
//! - **Project**: `.cfxml.toml` in the working directory
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Project config file
//! 4. CLI flags (not handled here)
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. `$CFXML_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/cfxml/config.toml`
//! 3. `~/.cfxml/config.toml`
//!
//! # Example
//!
//! ```no_run
//! use cfxml::core::config::Config;
//! use std::path::Path;
//!
//! let config = Config::load(Some(Path::new("."))).unwrap();
//! println!("Input format: {}", config.input_format().as_str());
//! println!("Strict: {}", config.strict());
//! ```

pub mod schema;

pub use schema::{ConfigFile, ExportDefaults};

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::types::{InputFormat, MetadataKind};

/// Name of the project config file.
pub const PROJECT_CONFIG_FILE: &str = ".cfxml.toml";

/// Environment variable naming the global config file.
pub const CONFIG_ENV: &str = "CFXML_CONFIG";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("home directory not found")]
    NoHomeDir,
}

/// Merged configuration from all sources.
///
/// Accessors apply precedence: project over global over defaults.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub global: ConfigFile,
    pub project: Option<ConfigFile>,
    global_path: Option<PathBuf>,
    project_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// If `project_dir` is provided, `.cfxml.toml` there is loaded too.
    ///
    /// # Errors
    ///
    /// Returns an error if config files exist but cannot be parsed or hold
    /// invalid values. Missing files are not an error.
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ConfigError> {
        let global_path = Self::locate_global();
        let project_path = project_dir
            .map(|dir| dir.join(PROJECT_CONFIG_FILE))
            .filter(|path| path.is_file());
        Self::load_files(global_path, project_path)
    }

    /// Load from explicit file paths.
    pub fn load_files(
        global_path: Option<PathBuf>,
        project_path: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let global = match &global_path {
            Some(path) => Self::read_file(path)?,
            None => ConfigFile::default(),
        };
        let project = project_path.as_deref().map(Self::read_file).transpose()?;

        global.validate()?;
        if let Some(project) = &project {
            project.validate()?;
        }

        Ok(Config {
            global,
            project,
            global_path,
            project_path,
        })
    }

    /// First existing global config file.
    fn locate_global() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("cfxml/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        dirs::home_dir()
            .map(|home| home.join(".cfxml/config.toml"))
            .filter(|path| path.exists())
    }

    fn read_file(path: &Path) -> Result<ConfigFile, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Get the canonical path for global config.
    ///
    /// Returns `~/.cfxml/config.toml`.
    pub fn global_config_path() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".cfxml/config.toml"))
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    fn pick<T>(&self, get: impl Fn(&ConfigFile) -> Option<T>) -> Option<T> {
        self.project.as_ref().and_then(&get).or_else(|| get(&self.global))
    }

    fn export_flag(&self, get: impl Fn(&ExportDefaults) -> Option<bool>) -> Option<bool> {
        self.pick(|file| file.export.as_ref().and_then(&get))
    }

    /// Input format. Defaults to `auto`.
    pub fn input_format(&self) -> InputFormat {
        self.pick(ConfigFile::input_format).unwrap_or_default()
    }

    /// Kinds to export. Defaults to every exportable kind.
    pub fn kinds(&self) -> Vec<MetadataKind> {
        self.pick(ConfigFile::kinds)
            .unwrap_or_else(|| MetadataKind::EXPORTABLE.to_vec())
    }

    /// Whether module text is written. Defaults to `true`.
    pub fn modules(&self) -> bool {
        self.export_flag(|e| e.modules).unwrap_or(true)
    }

    /// Whether embedded form definitions are written. Defaults to `true`.
    pub fn form_definitions(&self) -> bool {
        self.export_flag(|e| e.form_definitions).unwrap_or(true)
    }

    /// Whether skips fail the run. Defaults to `false`.
    pub fn strict(&self) -> bool {
        self.export_flag(|e| e.strict).unwrap_or(false)
    }

    pub fn global_config_loaded_from(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    pub fn project_config_loaded_from(&self) -> Option<&Path> {
        self.project_path.as_deref()
    }
}
