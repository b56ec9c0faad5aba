//! Persistence layer for application configuration.
//!
//! Provides RON-based save/load for app metadata, the verbosity level and
//! extra command aliases.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{CliApp, Verbosity};

/// Default config file name.
pub const DEFAULT_CONFIG_FILE: &str = "app.ron";

/// Serializable application configuration.
///
/// Every field is optional; absent or empty fields leave the app untouched.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfigFile {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub logo_text: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub logo_style: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub default_command: String,
    /// Level name or numeral, see [`Verbosity`]'s `FromStr`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub verbosity: String,
    /// Command aliases (alias -> command).
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

impl AppConfigFile {
    /// Create a new empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from a RON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.display().to_string(), e.to_string()))?;

        ron::from_str(&contents)
            .map_err(|e| ConfigError::Parse(path.display().to_string(), e.to_string()))
    }

    /// Save config to a RON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Io(parent.display().to_string(), e.to_string()))?;
        }

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(2)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let contents = ron::ser::to_string_pretty(self, pretty)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;

        fs::write(path, contents)
            .map_err(|e| ConfigError::Io(path.display().to_string(), e.to_string()))
    }

    /// Load config from file, returning default if it can't be read.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Snapshot an app's metadata and aliases.
    pub fn from_app(app: &CliApp) -> Self {
        Self {
            name: app.name.clone(),
            version: app.version.clone(),
            description: app.description.clone(),
            logo_text: app.logo.text.clone(),
            logo_style: app.logo.style.clone(),
            default_command: app.default_command().to_string(),
            verbosity: app.logger().verbosity().to_string(),
            aliases: app.catalog().aliases().clone(),
        }
    }

    /// Parse the verbosity field, if present.
    pub fn parsed_verbosity(&self) -> Result<Option<Verbosity>, ConfigError> {
        if self.verbosity.is_empty() {
            return Ok(None);
        }
        self.verbosity
            .parse::<Verbosity>()
            .map(Some)
            .map_err(|e| ConfigError::Invalid("verbosity".to_string(), e.to_string()))
    }

    /// Apply the config to an app.
    ///
    /// Metadata fields are meant for [`CliApp::with`] closures, so they land
    /// before `init` fires. The verbosity is validated before anything changes.
    pub fn apply_to(&self, app: &mut CliApp) -> Result<(), ConfigError> {
        let verbosity = self.parsed_verbosity()?;

        if !self.name.is_empty() {
            app.name = self.name.clone();
        }
        if !self.version.is_empty() {
            app.version = self.version.clone();
        }
        if !self.description.is_empty() {
            app.description = self.description.clone();
        }
        if !self.logo_text.is_empty() {
            app.logo.text = self.logo_text.clone();
        }
        if !self.logo_style.is_empty() {
            app.logo.style = self.logo_style.clone();
        }
        if !self.default_command.is_empty() {
            app.set_default_command(self.default_command.clone());
        }
        if let Some(level) = verbosity {
            app.set_verbose(level);
        }

        for (alias, command) in &self.aliases {
            app.add_aliases(command, [alias.clone()]);
        }
        Ok(())
    }
}

/// Errors that can occur during config operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// IO error (path, message).
    Io(String, String),
    /// Parse error (path, message).
    Parse(String, String),
    /// Serialization error.
    Serialize(String),
    /// A field holds an unusable value (field, message).
    Invalid(String, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, msg) => write!(f, "IO error for '{}': {}", path, msg),
            ConfigError::Parse(path, msg) => write!(f, "Parse error for '{}': {}", path, msg),
            ConfigError::Serialize(msg) => write!(f, "Serialization error: {}", msg),
            ConfigError::Invalid(field, msg) => write!(f, "Invalid '{}': {}", field, msg),
        }
    }
}

impl std::error::Error for ConfigError {}
