//! Locating and loading `gadgets.toml`.
//!
//! The first hit wins: `--config`, then `gadgets.toml` or `.gadgets.toml` next
//! to the analyzed trees, then `config.toml` in the user directory
//! (`$GADGETS_CONFIG_DIR` or `~/.gadgets`). With no hit every inspection runs
//! with its built-in defaults.

use anyhow::{Context, Result};
use gadgets_core::Config;
use std::fmt;
use std::path::{Path, PathBuf};

const PROJECT_FILES: [&str; 2] = ["gadgets.toml", ".gadgets.toml"];
const USER_FILE: &str = "config.toml";

/// Where the inspection settings come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--config`. Not checked for existence.
    Explicit(PathBuf),
    /// Found beside the analyzed trees.
    Project(PathBuf),
    /// Found in the user directory.
    Global(PathBuf),
    /// Nothing found.
    Default,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit(p) => write!(f, "{} (--config)", p.display()),
            Self::Project(p) => write!(f, "{} (project)", p.display()),
            Self::Global(p) => write!(f, "{} (user)", p.display()),
            Self::Default => f.write_str("built-in defaults"),
        }
    }
}

impl ConfigSource {
    /// Settings file, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Reads the inspection settings. [`ConfigSource::Default`] yields an
    /// empty [`Config`], so every inspection keeps its own defaults.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or is not valid TOML.
    pub fn load(&self) -> Result<Config> {
        tracing::debug!("Inspection settings from {}", self);
        match self.path() {
            Some(path) => Config::from_file(path)
                .with_context(|| format!("Failed to load inspection settings from {self}")),
            None => Ok(Config::default()),
        }
    }

    fn search(project_dir: &Path, explicit: Option<&Path>, user_dir: Option<&Path>) -> Self {
        if let Some(path) = explicit {
            return Self::Explicit(path.to_path_buf());
        }
        let project = PROJECT_FILES
            .iter()
            .map(|name| project_dir.join(name))
            .find(|p| p.is_file());
        if let Some(path) = project {
            return Self::Project(path);
        }
        user_dir
            .map(|dir| dir.join(USER_FILE))
            .filter(|p| p.is_file())
            .map_or(Self::Default, Self::Global)
    }
}

/// Picks the settings file for trees under `project_dir`.
#[must_use]
pub fn resolve(project_dir: &Path, explicit: Option<&Path>) -> ConfigSource {
    let source = ConfigSource::search(project_dir, explicit, user_config_dir().as_deref());
    if matches!(source, ConfigSource::Global(_)) {
        tracing::info!("Using inspection settings from {}", source);
    }
    source
}

/// `$GADGETS_CONFIG_DIR`, else `~/.gadgets`.
#[must_use]
pub fn user_config_dir() -> Option<PathBuf> {
    std::env::var_os("GADGETS_CONFIG_DIR")
        .map(PathBuf::from)
        .or_else(|| home::home_dir().map(|h| h.join(".gadgets")))
}
