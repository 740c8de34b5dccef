use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use toml_edit::{Array, DocumentMut, Item, Table};

use crate::util::paths::config_path;

/// Example configuration file contents (bundled with the binary)
pub const EXAMPLE_CONFIG: &str = include_str!("config.toml.example");

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to edit config: {0}")]
    Edit(#[from] toml_edit::TomlError),
}

/// Scope membership configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Patterns for items added to every new scope
    pub include: Vec<String>,
    /// Patterns for items removed from new scopes
    pub exclude: Vec<String>,
    /// Patterns for items left out of listings
    pub hidden: Vec<String>,
    /// Patterns for items never destroyed by kill operations
    pub kill_exclude: Vec<String>,
    /// Treat buried items as part of a scope's list
    pub include_buried: bool,
    /// List only scope-local items for display
    pub prefer_local_items: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            include: Vec::new(),
            exclude: Vec::new(),
            hidden: vec!["^ ".into()],
            kill_exclude: vec![
                "^ ".into(),
                r"^\*scratch\*$".into(),
                r"^\*Messages\*$".into(),
            ],
            include_buried: false,
            prefer_local_items: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlFilters {
    pub include: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
    pub hidden: Option<Vec<String>>,
    pub kill_exclude: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlScopes {
    pub include_buried: Option<bool>,
    pub prefer_local_items: Option<bool>,
}

/// TOML representation of the config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub filters: Option<TomlFilters>,
    pub scopes: Option<TomlScopes>,
}

/// One of the pattern lists under `[filters]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Include,
    Exclude,
    Hidden,
    KillExclude,
}

impl FilterKind {
    pub fn key(self) -> &'static str {
        match self {
            FilterKind::Include => "include",
            FilterKind::Exclude => "exclude",
            FilterKind::Hidden => "hidden",
            FilterKind::KillExclude => "kill_exclude",
        }
    }
}

impl Settings {
    /// Load settings from the default config file, merging with defaults.
    ///
    /// Never fails: a missing file is created from the bundled example and an
    /// unreadable or unparsable one falls back to defaults.
    pub fn load() -> Self {
        let config_file = config_path();

        // Create example config on first run
        if !config_file.exists() {
            Self::create_default_config(&config_file);
        }

        Self::load_or_default(&config_file)
    }

    /// Lenient load from an explicit path
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Ignoring unusable config file"
                );
                Self::default()
            }
        }
    }

    /// Strict load from an explicit path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let toml_config: TomlConfig = toml::from_str(contents)?;
        let mut settings = Self::default();
        settings.merge(toml_config);
        Ok(settings)
    }

    /// Overlay the values present in a parsed config file
    pub fn merge(&mut self, toml_config: TomlConfig) {
        if let Some(filters) = toml_config.filters {
            if let Some(include) = filters.include {
                self.include = include;
            }
            if let Some(exclude) = filters.exclude {
                self.exclude = exclude;
            }
            if let Some(hidden) = filters.hidden {
                self.hidden = hidden;
            }
            if let Some(kill_exclude) = filters.kill_exclude {
                self.kill_exclude = kill_exclude;
            }
        }

        if let Some(scopes) = toml_config.scopes {
            if let Some(include_buried) = scopes.include_buried {
                self.include_buried = include_buried;
            }
            if let Some(prefer_local_items) = scopes.prefer_local_items {
                self.prefer_local_items = prefer_local_items;
            }
        }
    }

    pub fn patterns(&self, kind: FilterKind) -> &[String] {
        match kind {
            FilterKind::Include => &self.include,
            FilterKind::Exclude => &self.exclude,
            FilterKind::Hidden => &self.hidden,
            FilterKind::KillExclude => &self.kill_exclude,
        }
    }

    /// Create the default config file from the bundled example
    fn create_default_config(path: &Path) {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                if let Err(e) = fs::create_dir_all(parent) {
                    tracing::warn!(error = %e, "Failed to create config directory");
                    return;
                }
            }
        }

        if let Err(e) = fs::write(path, EXAMPLE_CONFIG) {
            tracing::warn!(error = %e, "Failed to write default config");
        }
    }
}

/// Replace one `[filters]` pattern list in a config file.
///
/// Everything else in the document (comments, other tables) is preserved.
pub fn save_filter_patterns(
    path: &Path,
    kind: FilterKind,
    patterns: &[String],
) -> Result<(), ConfigError> {
    let contents = if path.exists() {
        fs::read_to_string(path)?
    } else {
        String::new()
    };

    let mut doc: DocumentMut = contents.parse()?;

    if !doc.contains_key("filters") {
        doc["filters"] = Item::Table(Table::new());
    }

    let mut array = Array::new();
    for pattern in patterns {
        array.push(pattern.as_str());
    }
    doc["filters"][kind.key()] = toml_edit::value(array);

    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    fs::write(path, doc.to_string())?;

    Ok(())
}
