//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/nametree/nametree.toml`
//! 3. Explicit config file passed with `--config`
//! 4. Environment variables: `NAMETREE_*` prefix, `__` between sections

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::NewNode;

/// Root node a fresh session starts with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SeedConfig {
    /// Start with a root node instead of an empty tree
    pub enabled: bool,
    pub name: String,
    pub value: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            name: "Root".into(),
            value: "root".into(),
        }
    }
}

impl SeedConfig {
    /// The seed as an insertable node, None when disabled.
    pub fn node(&self) -> Option<NewNode> {
        self.enabled
            .then(|| NewNode::new(self.name.clone(), self.value.clone()))
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSeedConfig {
    pub enabled: Option<bool>,
    pub name: Option<String>,
    pub value: Option<String>,
}

/// Raw settings for intermediate parsing (`None` = not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub validate_input: Option<bool>,
    pub json_pretty: Option<bool>,
    pub seed: RawSeedConfig,
}

/// Unified configuration for nametree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Reject empty node names and values before they reach the tree
    pub validate_input: bool,
    /// Pretty-print JSON snapshots
    pub json_pretty: bool,
    pub seed: SeedConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            validate_input: true,
            json_pretty: true,
            seed: SeedConfig::default(),
        }
    }
}

/// Get the XDG config directory for nametree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "nametree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("nametree.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins wherever it specifies a value.
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            validate_input: overlay.validate_input.unwrap_or(self.validate_input),
            json_pretty: overlay.json_pretty.unwrap_or(self.json_pretty),
            seed: SeedConfig {
                enabled: overlay.seed.enabled.unwrap_or(self.seed.enabled),
                name: overlay
                    .seed
                    .name
                    .clone()
                    .unwrap_or_else(|| self.seed.name.clone()),
                value: overlay
                    .seed
                    .value
                    .clone()
                    .unwrap_or_else(|| self.seed.value.clone()),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file; it must exist if given
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(path) = config_file {
            let raw = load_raw_settings(path)?;
            current = current.merge_with(&raw);
        }

        Self::apply_env_overrides(current)
    }

    /// Apply NAMETREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("NAMETREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_bool("validate_input") {
            settings.validate_input = val;
        }
        if let Ok(val) = config.get_bool("json_pretty") {
            settings.json_pretty = val;
        }
        if let Ok(val) = config.get_bool("seed.enabled") {
            settings.seed.enabled = val;
        }
        if let Ok(val) = config.get_string("seed.name") {
            settings.seed.name = val;
        }
        if let Ok(val) = config.get_string("seed.value") {
            settings.seed.value = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# nametree configuration
#
# Locations (by precedence, lowest to highest):
#   Global:   ~/.config/nametree/nametree.toml
#   Explicit: nametree --config <file>
#   Env:      NAMETREE_* environment variables (NAMETREE_SEED__NAME=...)

# Reject empty node names and values
# validate_input = true

# Pretty-print JSON snapshots
# json_pretty = true

[seed]
# Start every session with this root node
# enabled = true
# name = "Root"
# value = "root"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
