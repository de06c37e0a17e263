//! Pieces shared by the uploader and the triggerer.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::blocking::Client;

use crate::ci::CiProvider;
use crate::error::{Result, WaldoError};

/// User-Agent provider segment when no CI provider was detected.
pub const FALLBACK_AGENT_SOURCE: &str = "Rust CLI";

// The intake service reports failures as a numeric `"status"` in the body.
static RE_BODY_STATUS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""status":([0-9]+)"#).expect("valid status regex"));

/// Ordered key/value fields where empty values are dropped.
///
/// Used for both the upload query string and the JSON bodies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields {
    entries: Vec<(&'static str, String)>,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `key` unless `value` is empty.
    pub fn with(mut self, key: &'static str, value: impl AsRef<str>) -> Self {
        let value = value.as_ref();
        if !value.is_empty() {
            self.entries.push((key, value.to_string()));
        }
        self
    }

    /// Add `key` when `value` is present and non-empty.
    pub fn with_opt(self, key: &'static str, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.with(key, v),
            None => self,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.entries.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Fields as a flat JSON object of strings.
    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .entries
            .iter()
            .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.clone())))
            .collect::<serde_json::Map<_, _>>();
        serde_json::Value::Object(map)
    }
}

/// What the service answered, kept for verbose output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub url: String,
    pub status: u16,
    pub body: String,
}

/// Blocking client with the configured timeout.
pub fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| WaldoError::Other(anyhow::anyhow!("Failed to build HTTP client: {}", e)))
}

/// `Authorization` header value.
pub fn authorization(upload_token: &str) -> String {
    format!("Upload-Token {}", upload_token)
}

/// Provider name for the User-Agent, with a fallback for unknown CI.
pub fn agent_source(provider: CiProvider) -> &'static str {
    if provider.is_known() {
        provider.name()
    } else {
        FALLBACK_AGENT_SOURCE
    }
}

/// Decide whether an exchange succeeded.
///
/// A `"status":N` in the body wins over the HTTP status. 401 means the
/// upload token was rejected.
pub fn check_status(action: &str, http_status: u16, body: &str) -> Result<()> {
    let status = match RE_BODY_STATUS.captures(body) {
        Some(caps) => caps[1].parse::<u16>().unwrap_or(u16::MAX),
        // No body status: fall back to the HTTP status so proxy and gateway
        // errors are not reported as success.
        None => http_status,
    };

    if status == 401 {
        return Err(WaldoError::InvalidUploadToken);
    }

    if !(200..=299).contains(&status) {
        return Err(WaldoError::HttpStatus {
            action: action.to_string(),
            status,
        });
    }

    Ok(())
}

/// Map a transport failure to a request error naming the URL.
pub fn request_error(action: &str, url: &str, err: impl std::fmt::Display) -> WaldoError {
    WaldoError::Request {
        action: action.to_string(),
        url: url.to_string(),
        message: err.to_string(),
    }
}
