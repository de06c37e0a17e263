//! Run triggering.

use std::time::Duration;

use reqwest::blocking::Client;

use super::request::{
    agent_source, authorization, build_client, check_status, request_error, Fields, Receipt,
};
use crate::build;
use crate::ci::CiProvider;
use crate::config::AgentConfig;
use crate::error::Result;
use crate::platform::{detect_arch, detect_platform};

const TRIGGER_ACTION: &str = "trigger run on Waldo";

/// User-supplied trigger parameters.
#[derive(Debug, Clone, Default)]
pub struct TriggerOptions {
    pub upload_token: String,
    pub rule_name: Option<String>,
}

/// A validated trigger request.
#[derive(Debug)]
pub struct Triggerer {
    config: AgentConfig,
    options: TriggerOptions,
    provider: CiProvider,
    arch: String,
    platform: String,
    client: Client,
}

impl Triggerer {
    pub fn validate(
        config: AgentConfig,
        options: TriggerOptions,
        provider: CiProvider,
    ) -> Result<Self> {
        build::validate_upload_token(&options.upload_token)?;
        let client = build_client(Duration::from_secs(config.timeout_secs))?;

        Ok(Self {
            config,
            options,
            provider,
            arch: detect_arch(),
            platform: detect_platform(),
            client,
        })
    }

    /// JSON body of the trigger request.
    pub fn payload(&self) -> serde_json::Value {
        Fields::new()
            .with("agentName", &self.config.agent_name)
            .with("agentVersion", &self.config.agent_version)
            .with("arch", &self.arch)
            .with("ci", self.provider.name())
            .with("platform", &self.platform)
            .with_opt("ruleName", self.options.rule_name.as_deref())
            .with_opt("wrapperName", self.config.wrapper_name.as_deref())
            .with_opt("wrapperVersion", self.config.wrapper_version.as_deref())
            .to_json()
    }

    /// `<product> <provider> v<version>`
    pub fn user_agent(&self) -> String {
        format!(
            "{} {} v{}",
            self.config.product_name,
            agent_source(self.provider),
            self.config.reported_version()
        )
    }

    /// Send the trigger request.
    pub fn perform(&self) -> Result<Receipt> {
        let url = &self.config.endpoints.trigger;
        let payload = self.payload().to_string();

        tracing::info!("Triggering run");
        tracing::debug!("POST {} {}", url, payload);

        let response = self
            .client
            .post(url)
            .header("Authorization", authorization(&self.options.upload_token))
            .header("Content-Type", "application/json")
            .header("User-Agent", self.user_agent())
            .body(payload)
            .send()
            .map_err(|e| request_error(TRIGGER_ACTION, url, e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| request_error(TRIGGER_ACTION, url, e))?;
        tracing::debug!("Response {}: {}", status, body);

        check_status(TRIGGER_ACTION, status, &body)?;

        Ok(Receipt {
            url: url.clone(),
            status,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WaldoError;
    use httpmock::prelude::*;

    fn options() -> TriggerOptions {
        TriggerOptions {
            upload_token: "token123".to_string(),
            rule_name: Some("smoke".to_string()),
        }
    }

    fn config_for(server: &MockServer) -> AgentConfig {
        let mut config = AgentConfig::default();
        config.endpoints.trigger = server.url("/suites");
        config.timeout_secs = 10;
        config
    }

    #[test]
    fn validate_rejects_empty_token() {
        let result = Triggerer::validate(
            AgentConfig::default(),
            TriggerOptions::default(),
            CiProvider::Unknown,
        );
        assert!(matches!(result, Err(WaldoError::EmptyUploadToken)));
    }

    #[test]
    fn payload_omits_missing_rule_and_wrapper() {
        let triggerer = Triggerer::validate(
            AgentConfig::default(),
            TriggerOptions {
                upload_token: "t".to_string(),
                rule_name: None,
            },
            CiProvider::CircleCI,
        )
        .unwrap();

        let payload = triggerer.payload();
        assert_eq!(payload["ci"], "CircleCI");
        assert!(payload.get("ruleName").is_none());
        assert!(payload.get("wrapperName").is_none());
        assert_eq!(payload["arch"], detect_arch());
    }

    #[test]
    fn user_agent_has_no_flavor() {
        let triggerer =
            Triggerer::validate(AgentConfig::default(), options(), CiProvider::Unknown).unwrap();
        assert_eq!(
            triggerer.user_agent(),
            format!("Waldo Rust CLI v{}", env!("CARGO_PKG_VERSION"))
        );
    }

    #[test]
    fn perform_posts_json() {
        let server = MockServer::start();

        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/suites")
                .header("Authorization", "Upload-Token token123")
                .header("Content-Type", "application/json")
                .header("User-Agent", format!("Waldo GitHub Actions v{}", env!("CARGO_PKG_VERSION")))
                .body_includes("\"ruleName\":\"smoke\"");
            then.status(200).body(r#"{"id":"suite-1"}"#);
        });

        let triggerer =
            Triggerer::validate(config_for(&server), options(), CiProvider::GitHubActions)
                .unwrap();
        let receipt = triggerer.perform().unwrap();

        mock.assert();
        assert_eq!(receipt.status, 200);
    }

    #[test]
    fn perform_maps_unauthorized() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(POST).path("/suites");
            then.status(401).body("Unauthorized");
        });

        let triggerer =
            Triggerer::validate(config_for(&server), options(), CiProvider::Unknown).unwrap();
        let err = triggerer.perform().unwrap_err();
        assert_eq!(err.to_string(), "Upload token is invalid or missing!");
    }

    #[test]
    fn perform_reports_body_status() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(POST).path("/suites");
            then.status(200).body(r#"{"status":404,"message":"rule not found"}"#);
        });

        let triggerer =
            Triggerer::validate(config_for(&server), options(), CiProvider::Unknown).unwrap();
        let err = triggerer.perform().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unable to trigger run on Waldo, HTTP status: 404"
        );
    }

    #[test]
    fn unreachable_endpoint_names_url() {
        let mut config = AgentConfig::default();
        config.endpoints.trigger = "http://127.0.0.1:1/suites".to_string();
        config.timeout_secs = 5;

        let triggerer = Triggerer::validate(config, options(), CiProvider::Unknown).unwrap();
        let err = triggerer.perform().unwrap_err();
        assert!(matches!(err, WaldoError::Request { .. }));
        assert!(err.to_string().contains("http://127.0.0.1:1/suites"));
    }
}
