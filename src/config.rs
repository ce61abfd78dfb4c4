//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/orgchart/orgchart.toml`
//! 3. Local config: `<project_dir>/.orgchart.toml`
//! 4. Environment variables: `ORGCHART_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::roles::{RoleRules, DEFAULT_ROOT_TITLE, DEFAULT_TERMINAL_TITLE};

/// Unified configuration for orgchart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Title of the record kept as the single chart root
    pub root_title: String,
    /// Title of the record whose linked children are dropped
    pub terminal_title: String,
    /// Keep records with `isActive: false` (default: true)
    pub include_inactive: bool,
    /// Snapshot file used when no file argument is given
    pub snapshot: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root_title: DEFAULT_ROOT_TITLE.to_string(),
            terminal_title: DEFAULT_TERMINAL_TITLE.to_string(),
            include_inactive: true,
            snapshot: None,
        }
    }
}

/// Raw settings for intermediate parsing (`None` = not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub root_title: Option<String>,
    pub terminal_title: Option<String>,
    pub include_inactive: Option<bool>,
    pub snapshot: Option<PathBuf>,
}

/// Get the XDG config directory for orgchart.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "orgchart").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("orgchart.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".orgchart.toml")
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

/// Expand `~`, `$VAR` and `${VAR}` in a path string.
fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    let expanded = shellexpand::full(raw.as_ref())
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| raw.to_string());
    PathBuf::from(expanded)
}

impl Settings {
    /// Role rules derived from the configured titles.
    pub fn role_rules(&self) -> RoleRules {
        RoleRules::new(self.root_title.clone(), self.terminal_title.clone())
    }

    fn expand_paths(&mut self) {
        if let Some(snapshot) = &self.snapshot {
            self.snapshot = Some(expand_path(snapshot));
        }
    }

    /// Overlay wins for every field it specifies.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            root_title: overlay
                .root_title
                .clone()
                .unwrap_or_else(|| self.root_title.clone()),
            terminal_title: overlay
                .terminal_title
                .clone()
                .unwrap_or_else(|| self.terminal_title.clone()),
            include_inactive: overlay.include_inactive.unwrap_or(self.include_inactive),
            snapshot: overlay.snapshot.clone().or_else(|| self.snapshot.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional project directory holding `.orgchart.toml`
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("load: global config {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(dir) = project_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                debug!("load: local config {}", local_path.display());
                current = current.merge_with(&load_raw_settings(&local_path)?);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply ORGCHART_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("ORGCHART").separator("__"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("root_title") {
            settings.root_title = val;
        }
        if let Ok(val) = config.get_string("terminal_title") {
            settings.terminal_title = val;
        }
        if let Ok(val) = config.get_bool("include_inactive") {
            settings.include_inactive = val;
        }
        if let Ok(val) = config.get_string("snapshot") {
            settings.snapshot = Some(PathBuf::from(val));
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
        r#"# orgchart configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/orgchart/orgchart.toml
#   Local:  <project_dir>/.orgchart.toml
#   Env:    ORGCHART_* environment variables

# Record kept as the only chart root when present (exact match)
# root_title = "GENEL KURUL"

# Record rendered as a leaf; children linked to it are dropped (exact match)
# terminal_title = "DENETİM KURULU"

# Keep records with isActive = false
# include_inactive = true

# Snapshot used when no file argument is given
# snapshot = "~/orgchart/nodes.json"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
