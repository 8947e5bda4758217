//! Configuration management for mojira.
//!
//! This module handles loading, saving, and validating the user's
//! configuration file (`config.toml`).

mod settings;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::api::DEFAULT_TIMEOUT_SECS;
use crate::catalog::{Catalog, EnumOption};
use crate::ui::theme::ThemeMode;

pub use settings::QueryDefaults;

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "MOJIRA_CONFIG";

/// Default tracker URL.
pub const DEFAULT_BASE_URL: &str = "https://bugs.mojang.com";

/// Errors that can occur while handling configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine configuration directory")]
    NoConfigDir,

    /// The config directory could not be created.
    #[error("failed to create configuration directory: {0}")]
    CreateDirError(#[source] std::io::Error),

    /// The config file could not be read.
    #[error("failed to read configuration file: {0}")]
    ReadError(#[source] std::io::Error),

    /// The config file could not be written.
    #[error("failed to write configuration file: {0}")]
    WriteError(#[source] std::io::Error),

    /// The config file is not valid TOML for this schema.
    #[error("failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),

    /// The configuration could not be serialized.
    #[error("failed to serialize configuration: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// The configuration is well-formed but inconsistent.
    #[error("invalid configuration: {0}")]
    ValidationError(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The tracker's base URL.
    pub base_url: String,
    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,
    /// Whether j/k navigation is enabled.
    pub vim_mode: bool,
    /// Color palette: `"dark"` or `"light"`.
    pub theme: ThemeMode,
    /// Initial query selections.
    pub defaults: QueryDefaults,
    /// Replacement project list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<EnumOption>>,
    /// Replacement filter list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<EnumOption>>,
    /// Replacement sort field list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_fields: Option<Vec<EnumOption>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            vim_mode: true,
            theme: ThemeMode::Dark,
            defaults: QueryDefaults::default(),
            projects: None,
            filters: None,
            sort_fields: None,
        }
    }
}

impl Config {
    /// Default config file location: `<config_dir>/mojira/config.toml`.
    pub fn default_path() -> Result<PathBuf> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(dir.join("mojira").join("config.toml"))
    }

    /// Resolve the config path from an explicit path, the environment, or the default.
    pub fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            return Ok(path.to_path_buf());
        }
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }
        Self::default_path()
    }

    /// Load and validate the configuration at `path`.
    ///
    /// A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "No configuration file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;

        debug!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Write the configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::CreateDirError)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents).map_err(ConfigError::WriteError)?;

        info!(path = %path.display(), "Configuration saved");
        Ok(())
    }

    /// The selector catalog, with any configured lists replacing the built-ins.
    pub fn catalog(&self) -> Catalog {
        let mut catalog = Catalog::default();
        if let Some(projects) = &self.projects {
            catalog.projects = projects.clone();
        }
        if let Some(filters) = &self.filters {
            catalog.filters = filters.clone();
        }
        if let Some(sort_fields) = &self.sort_fields {
            catalog.sort_fields = sort_fields.clone();
        }
        catalog
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::ValidationError` describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if !self.base_url.starts_with("https://") && !self.base_url.starts_with("http://") {
            return Err(ConfigError::ValidationError(format!(
                "base_url '{}' must start with http:// or https://",
                self.base_url
            )));
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }

        let catalog = self.catalog();
        validate_options("projects", &catalog.projects)?;
        validate_options("filters", &catalog.filters)?;
        validate_options("sort_fields", &catalog.sort_fields)?;

        if let Some(project) = &self.defaults.project {
            if !catalog.has_project(project) {
                return Err(ConfigError::ValidationError(format!(
                    "default project '{}' is not in the project list",
                    project
                )));
            }
        }
        if !catalog.has_filter(&self.defaults.filter) {
            return Err(ConfigError::ValidationError(format!(
                "default filter '{}' is not in the filter list",
                self.defaults.filter
            )));
        }
        if !catalog.has_sort_field(&self.defaults.sort_field) {
            return Err(ConfigError::ValidationError(format!(
                "default sort field '{}' is not in the sort field list",
                self.defaults.sort_field
            )));
        }

        Ok(())
    }
}

fn validate_options(name: &str, options: &[EnumOption]) -> Result<()> {
    if options.is_empty() {
        return Err(ConfigError::ValidationError(format!(
            "{} cannot be empty",
            name
        )));
    }

    let mut seen = HashSet::new();
    for option in options {
        if option.id.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{}: ids cannot be empty",
                name
            )));
        }
        if !seen.insert(option.id.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "{}: duplicate id '{}'",
                name, option.id
            )));
        }
    }

    Ok(())
}
