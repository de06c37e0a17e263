//! Agent configuration.
//!
//! - Schema and override handling in [`schema`]
//! - File discovery and loading in [`loader`]
//!
//! # Example
//!
//! ```
//! use waldo::config::{load_merged_config, AgentConfig};
//! use tempfile::TempDir;
//!
//! let temp = TempDir::new().unwrap();
//! let config = load_merged_config(
//!     None,
//!     temp.path(),
//!     &["apiTriggerEndpoint=http://localhost:8080/suites"],
//! )
//! .unwrap();
//!
//! assert_eq!(config.endpoints.trigger, "http://localhost:8080/suites");
//! assert_eq!(config.endpoints.build, AgentConfig::default().endpoints.build);
//! ```
//!
//! # Layering
//!
//! Built-in defaults, then one YAML file (see [`loader`]), then
//! `--override KEY=VALUE` pairs in command-line order.

pub mod loader;
pub mod schema;

use std::path::Path;

use crate::error::Result;

pub use loader::{discover_config, load_config, load_config_file, parse_config};
pub use schema::{
    parse_override, AgentConfig, Endpoints, DEFAULT_BUILD_ENDPOINT, DEFAULT_ERROR_ENDPOINT,
    DEFAULT_TRIGGER_ENDPOINT,
};

/// Load the config file (if any) and apply command-line overrides.
pub fn load_merged_config<S: AsRef<str>>(
    explicit: Option<&Path>,
    project_root: &Path,
    overrides: &[S],
) -> Result<AgentConfig> {
    let mut config = load_config(explicit, project_root)?;
    config.apply_overrides(overrides)?;
    Ok(config)
}
