//! Configuration file discovery and loading.
//!
//! Exactly one file is loaded, the first found of:
//!
//! 1. An explicit `--config` path (must exist)
//! 2. Project config (`.waldo/config.yml` under the working directory)
//! 3. User global config (`~/.waldo/config.yml`)
//!
//! With no file, built-in defaults are used.

use crate::config::schema::AgentConfig;
use crate::error::{Result, WaldoError};
use std::fs;
use std::path::{Path, PathBuf};

/// Find the config file to load, if any.
pub fn discover_config(project_root: &Path) -> Option<PathBuf> {
    let project = project_root.join(".waldo").join("config.yml");
    if project.is_file() {
        return Some(project);
    }

    let user_global = dirs::home_dir()?.join(".waldo").join("config.yml");
    if user_global.is_file() {
        Some(user_global)
    } else {
        None
    }
}

/// Load the agent configuration.
///
/// # Arguments
///
/// * `explicit` - A path given on the command line; it must exist
/// * `project_root` - Directory searched for `.waldo/config.yml`
pub fn load_config(explicit: Option<&Path>, project_root: &Path) -> Result<AgentConfig> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => discover_config(project_root),
    };

    match path {
        Some(path) => {
            tracing::debug!("Loading config from {}", path.display());
            load_config_file(&path)
        }
        None => Ok(AgentConfig::default()),
    }
}

/// Load and parse a single config file.
pub fn load_config_file(path: &Path) -> Result<AgentConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            WaldoError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            WaldoError::Io(e)
        }
    })?;

    parse_config(&content, path)
}

/// Parse YAML content into an [`AgentConfig`].
///
/// An empty document yields the defaults.
pub fn parse_config(content: &str, source_path: &Path) -> Result<AgentConfig> {
    if content.trim().is_empty() {
        return Ok(AgentConfig::default());
    }

    serde_yaml::from_str(content).map_err(|e| WaldoError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}
