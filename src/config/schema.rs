//! Agent configuration schema.
//!
//! Product identity, version and service endpoints are plain data injected
//! at startup rather than compiled-in globals, so tests and wrappers can
//! point the agent at alternate endpoints.

use serde::{Deserialize, Serialize};

use crate::error::{Result, WaldoError};

/// Default endpoint for build uploads.
pub const DEFAULT_BUILD_ENDPOINT: &str = "https://api.waldo.io/versions";

/// Default endpoint for upload error reports.
pub const DEFAULT_ERROR_ENDPOINT: &str = "https://api.waldo.io/uploadError";

/// Default endpoint for run triggers.
pub const DEFAULT_TRIGGER_ENDPOINT: &str = "https://api.waldo.io/suites";

/// Root configuration structure for `.waldo/config.yml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Product name used as the User-Agent prefix.
    pub product_name: String,

    /// Agent name reported to the intake service.
    pub agent_name: String,

    /// Agent version reported to the intake service.
    pub agent_version: String,

    /// Service endpoints.
    pub endpoints: Endpoints,

    /// Name of a tool wrapping this agent (e.g. a CI plugin).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrapper_name: Option<String>,

    /// Version of the wrapping tool.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrapper_version: Option<String>,

    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,
}

/// Intake service endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    /// Build upload endpoint.
    pub build: String,
    /// Upload error report endpoint.
    pub error: String,
    /// Run trigger endpoint.
    pub trigger: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            build: DEFAULT_BUILD_ENDPOINT.to_string(),
            error: DEFAULT_ERROR_ENDPOINT.to_string(),
            trigger: DEFAULT_TRIGGER_ENDPOINT.to_string(),
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            product_name: "Waldo".to_string(),
            agent_name: "Waldo Agent".to_string(),
            agent_version: env!("CARGO_PKG_VERSION").to_string(),
            endpoints: Endpoints::default(),
            wrapper_name: None,
            wrapper_version: None,
            timeout_secs: 300,
        }
    }
}

impl AgentConfig {
    /// Apply a single `KEY=VALUE` override.
    ///
    /// Recognized keys: `apiBuildEndpoint`, `apiErrorEndpoint`,
    /// `apiTriggerEndpoint`, `wrapperName`, `wrapperVersion`. An empty value
    /// leaves the setting unchanged.
    pub fn apply_override(&mut self, key: &str, value: &str) -> Result<()> {
        if value.is_empty() {
            return Ok(());
        }

        match key {
            "apiBuildEndpoint" => self.endpoints.build = value.to_string(),
            "apiErrorEndpoint" => self.endpoints.error = value.to_string(),
            "apiTriggerEndpoint" => self.endpoints.trigger = value.to_string(),
            "wrapperName" => self.wrapper_name = Some(value.to_string()),
            "wrapperVersion" => self.wrapper_version = Some(value.to_string()),
            _ => {
                return Err(WaldoError::InvalidOverride {
                    key: key.to_string(),
                    message: "unknown key".to_string(),
                })
            }
        }

        Ok(())
    }

    /// Apply a list of `KEY=VALUE` strings in order.
    pub fn apply_overrides<S: AsRef<str>>(&mut self, overrides: &[S]) -> Result<()> {
        for raw in overrides {
            let (key, value) = parse_override(raw.as_ref())?;
            self.apply_override(key, value)?;
        }
        Ok(())
    }

    /// Version reported in User-Agent headers: the wrapper's if set.
    pub fn reported_version(&self) -> &str {
        self.wrapper_version
            .as_deref()
            .unwrap_or(&self.agent_version)
    }
}

/// Split a `KEY=VALUE` override.
pub fn parse_override(raw: &str) -> Result<(&str, &str)> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value.trim())),
        _ => Err(WaldoError::InvalidOverride {
            key: raw.to_string(),
            message: "expected KEY=VALUE".to_string(),
        }),
    }
}
