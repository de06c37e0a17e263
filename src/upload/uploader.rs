//! Build upload.

use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::Url;

use super::request::{
    agent_source, authorization, build_client, check_status, request_error, Fields, Receipt,
};
use crate::build::{self, BuildTarget, WorkingDir};
use crate::config::AgentConfig;
use crate::error::{Result, WaldoError};
use crate::platform::{detect_arch, detect_platform};
use crate::provenance::Provenance;

const UPLOAD_ACTION: &str = "upload build to Waldo";

/// User-supplied upload parameters.
#[derive(Debug, Clone, Default)]
pub struct UploadOptions {
    pub build_path: PathBuf,
    pub upload_token: String,
    pub variant_name: Option<String>,
    /// Branch the user says the build came from, reported alongside the
    /// inferred one.
    pub git_branch: Option<String>,
    pub git_commit: Option<String>,
}

/// A validated upload, ready to send.
///
/// # Example
///
/// ```no_run
/// use waldo::config::AgentConfig;
/// use waldo::provenance::Provenance;
/// use waldo::upload::{UploadOptions, Uploader};
///
/// let options = UploadOptions {
///     build_path: "build/MyApp.ipa".into(),
///     upload_token: "0123456789abcdef".to_string(),
///     ..Default::default()
/// };
/// let uploader = Uploader::validate(AgentConfig::default(), options, Provenance::gather())?;
/// uploader.upload()?;
/// # Ok::<(), waldo::WaldoError>(())
/// ```
#[derive(Debug)]
pub struct Uploader {
    config: AgentConfig,
    options: UploadOptions,
    target: BuildTarget,
    provenance: Provenance,
    arch: String,
    platform: String,
    working_dir: Option<PathBuf>,
    client: Client,
}

impl Uploader {
    /// Check the token and build path and capture the host details.
    pub fn validate(
        config: AgentConfig,
        options: UploadOptions,
        provenance: Provenance,
    ) -> Result<Self> {
        build::validate_upload_token(&options.upload_token)?;
        let target = build::validate_build_path(&options.build_path)?;
        let client = build_client(Duration::from_secs(config.timeout_secs))?;

        Ok(Self {
            config,
            options,
            target,
            provenance,
            arch: detect_arch(),
            platform: detect_platform(),
            working_dir: None,
            client,
        })
    }

    /// Package bundles under `path` instead of the per-process temp dir.
    pub fn with_working_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(path.into());
        self
    }

    pub fn target(&self) -> &BuildTarget {
        &self.target
    }

    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    /// Upload the build.
    ///
    /// On failure an error report is sent to the error endpoint before the
    /// original error is returned.
    pub fn upload(&self) -> Result<Receipt> {
        let result = self.send_build();

        if let Err(err) = &result {
            self.report_error(err);
        }

        result
    }

    /// Query parameters sent with the build.
    pub fn query(&self) -> Fields {
        let ci = &self.provenance.ci;
        let git = &self.provenance.git;

        Fields::new()
            .with("agentName", &self.config.agent_name)
            .with("agentVersion", &self.config.agent_version)
            .with("arch", &self.arch)
            .with("ci", ci.provider.name())
            .with_opt("ciGitBranch", ci.git_branch.as_deref())
            .with_opt("ciGitCommit", ci.git_commit.as_deref())
            .with("flavor", self.target.flavor.as_str())
            .with("gitAccess", git.access().as_str())
            .with_opt("gitBranch", git.branch())
            .with_opt("gitCommit", git.commit())
            .with("platform", &self.platform)
            .with_opt("userGitBranch", self.options.git_branch.as_deref())
            .with_opt("userGitCommit", self.options.git_commit.as_deref())
            .with_opt("variantName", self.options.variant_name.as_deref())
            .with_opt("wrapperName", self.config.wrapper_name.as_deref())
            .with_opt("wrapperVersion", self.config.wrapper_version.as_deref())
    }

    /// Build endpoint with the query string attached.
    pub fn build_url(&self) -> Result<Url> {
        let endpoint = &self.config.endpoints.build;
        Url::parse_with_params(endpoint, self.query().iter())
            .map_err(|e| request_error(UPLOAD_ACTION, endpoint, e))
    }

    /// JSON body for the error report.
    pub fn error_report(&self, err: &WaldoError) -> serde_json::Value {
        let ci = &self.provenance.ci;

        Fields::new()
            .with("agentName", &self.config.agent_name)
            .with("agentVersion", &self.config.agent_version)
            .with("arch", &self.arch)
            .with("ci", ci.provider.name())
            .with_opt("ciGitBranch", ci.git_branch.as_deref())
            .with_opt("ciGitCommit", ci.git_commit.as_deref())
            .with("message", err.to_string())
            .with("platform", &self.platform)
            .with_opt("wrapperName", self.config.wrapper_name.as_deref())
            .with_opt("wrapperVersion", self.config.wrapper_version.as_deref())
            .to_json()
    }

    /// `<product> <provider>/<flavor> v<version>`
    pub fn user_agent(&self) -> String {
        format!(
            "{} {}/{} v{}",
            self.config.product_name,
            agent_source(self.provenance.ci.provider),
            self.target.flavor,
            self.config.reported_version()
        )
    }

    fn send_build(&self) -> Result<Receipt> {
        let payload = build::prepare_payload(&self.target, || match &self.working_dir {
            Some(path) => WorkingDir::create_at(path),
            None => WorkingDir::for_process(),
        })?;

        let url = self.build_url()?;
        let url_str = url.to_string();
        let file =
            File::open(payload.path()).map_err(|e| request_error(UPLOAD_ACTION, &url_str, e))?;

        tracing::info!("Uploading {}", self.target.path.display());
        tracing::debug!("POST {} ({})", url_str, build::content_type(&self.target));

        let response = self
            .client
            .post(url)
            .header("Authorization", authorization(&self.options.upload_token))
            .header("Content-Type", build::content_type(&self.target))
            .header("User-Agent", self.user_agent())
            .body(file)
            .send()
            .map_err(|e| request_error(UPLOAD_ACTION, &url_str, e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| request_error(UPLOAD_ACTION, &url_str, e))?;
        tracing::debug!("Response {}: {}", status, body);

        check_status(UPLOAD_ACTION, status, &body)?;

        Ok(Receipt {
            url: url_str,
            status,
            body,
        })
    }

    fn report_error(&self, err: &WaldoError) {
        let url = &self.config.endpoints.error;
        let result = self
            .client
            .post(url)
            .header("Authorization", authorization(&self.options.upload_token))
            .header("Content-Type", "application/json")
            .header("User-Agent", self.user_agent())
            .body(self.error_report(err).to_string())
            .send();

        match result {
            Ok(response) => tracing::debug!("Error report sent: {}", response.status()),
            Err(e) => tracing::warn!("Failed to send error report to {}: {}", url, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ci::{CiInfo, CiProvider};
    use crate::git::{GitAccess, GitInfo};
    use httpmock::prelude::*;
    use std::fs;
    use tempfile::TempDir;

    fn provenance() -> Provenance {
        Provenance {
            ci: CiInfo {
                provider: CiProvider::Bitrise,
                git_branch: Some("main".to_string()),
                git_commit: Some("abc123".to_string()),
                skip_count: 0,
            },
            git: GitInfo::resolved(Some("main".to_string()), Some("abc123".to_string())),
        }
    }

    fn config_for(server: &MockServer) -> AgentConfig {
        let mut config = AgentConfig::default();
        config.endpoints.build = server.url("/versions");
        config.endpoints.error = server.url("/uploadError");
        config.timeout_secs = 10;
        config
    }

    fn options(build_path: PathBuf) -> UploadOptions {
        UploadOptions {
            build_path,
            upload_token: "token123".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn validate_rejects_empty_token() {
        let mut opts = options(PathBuf::from("/builds/app.apk"));
        opts.upload_token.clear();
        let result = Uploader::validate(AgentConfig::default(), opts, provenance());
        assert!(matches!(result, Err(WaldoError::EmptyUploadToken)));
    }

    #[test]
    fn validate_rejects_unknown_extension() {
        let result = Uploader::validate(
            AgentConfig::default(),
            options(PathBuf::from("/builds/app.tar")),
            provenance(),
        );
        assert!(matches!(
            result,
            Err(WaldoError::UnrecognizedBuildType { .. })
        ));
    }

    #[test]
    fn query_omits_empty_values() {
        let uploader = Uploader::validate(
            AgentConfig::default(),
            options(PathBuf::from("/builds/app.apk")),
            Provenance {
                ci: CiInfo::default(),
                git: GitInfo::inaccessible(GitAccess::NoGitCommandFound),
            },
        )
        .unwrap();

        let query = uploader.query();
        assert_eq!(query.get("ci"), Some("Unknown"));
        assert_eq!(query.get("gitAccess"), Some("noGitCommandFound"));
        assert_eq!(query.get("flavor"), Some("Android"));
        assert_eq!(query.get("gitBranch"), None);
        assert_eq!(query.get("ciGitCommit"), None);
        assert_eq!(query.get("variantName"), None);
        assert_eq!(query.get("wrapperName"), None);
    }

    #[test]
    fn query_includes_user_values_and_wrapper() {
        let mut config = AgentConfig::default();
        config.wrapper_name = Some("Fastlane Plugin".to_string());
        let mut opts = options(PathBuf::from("/builds/MyApp.ipa"));
        opts.variant_name = Some("release".to_string());
        opts.git_branch = Some("feature/x".to_string());
        opts.git_commit = Some("def456".to_string());

        let uploader = Uploader::validate(config, opts, provenance()).unwrap();
        let query = uploader.query();
        assert_eq!(query.get("userGitBranch"), Some("feature/x"));
        assert_eq!(query.get("userGitCommit"), Some("def456"));
        assert_eq!(query.get("variantName"), Some("release"));
        assert_eq!(query.get("wrapperName"), Some("Fastlane Plugin"));
        assert_eq!(query.get("ciGitBranch"), Some("main"));

        let url = uploader.build_url().unwrap();
        assert!(url.as_str().starts_with("https://api.waldo.io/versions?"));
        assert!(url.as_str().contains("userGitBranch=feature%2Fx"));
    }

    #[test]
    fn user_agent_uses_provider_and_flavor() {
        let uploader = Uploader::validate(
            AgentConfig::default(),
            options(PathBuf::from("/builds/MyApp.ipa")),
            provenance(),
        )
        .unwrap();
        assert_eq!(
            uploader.user_agent(),
            format!("Waldo Bitrise/iOS v{}", env!("CARGO_PKG_VERSION"))
        );
    }

    #[test]
    fn user_agent_falls_back_without_ci() {
        let mut config = AgentConfig::default();
        config.wrapper_version = Some("9.9.9".to_string());
        let uploader = Uploader::validate(
            config,
            options(PathBuf::from("/builds/app.apk")),
            Provenance {
                ci: CiInfo::default(),
                git: GitInfo::inaccessible(GitAccess::NotGitRepository),
            },
        )
        .unwrap();
        assert_eq!(uploader.user_agent(), "Waldo Rust CLI/Android v9.9.9");
    }

    #[test]
    fn upload_posts_file_with_headers() {
        let server = MockServer::start();
        let temp = TempDir::new().unwrap();
        let apk = temp.path().join("app.apk");
        fs::write(&apk, "apk-bytes").unwrap();

        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/versions")
                .query_param("flavor", "Android")
                .query_param("ci", "Bitrise")
                .query_param("gitBranch", "main")
                .header("Authorization", "Upload-Token token123")
                .header("Content-Type", "application/octet-stream")
                .body("apk-bytes");
            then.status(200).body(r#"{"id":"appv-123"}"#);
        });

        let uploader = Uploader::validate(config_for(&server), options(apk), provenance()).unwrap();
        let receipt = uploader.upload().unwrap();

        mock.assert();
        assert_eq!(receipt.status, 200);
        assert!(receipt.body.contains("appv-123"));
    }

    #[test]
    fn upload_zips_app_bundle() {
        let server = MockServer::start();
        let temp = TempDir::new().unwrap();
        let bundle = temp.path().join("MyApp.app");
        fs::create_dir_all(&bundle).unwrap();
        fs::write(bundle.join("Info.plist"), "<plist/>").unwrap();
        let working = temp.path().join("work");

        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/versions")
                .query_param("flavor", "iOS")
                .header("Content-Type", "application/zip");
            then.status(200).body("{}");
        });

        let uploader = Uploader::validate(config_for(&server), options(bundle), provenance())
            .unwrap()
            .with_working_dir(&working);
        uploader.upload().unwrap();

        mock.assert();
        assert!(!working.exists());
    }

    #[test]
    fn failed_upload_reports_error() {
        let server = MockServer::start();
        let temp = TempDir::new().unwrap();
        let apk = temp.path().join("app.apk");
        fs::write(&apk, "apk-bytes").unwrap();

        server.mock(|when, then| {
            when.method(POST).path("/versions");
            then.status(200).body(r#"{"status":401,"message":"nope"}"#);
        });
        let report = server.mock(|when, then| {
            when.method(POST)
                .path("/uploadError")
                .header("Content-Type", "application/json")
                .body_includes("Upload token is invalid or missing!")
                .body_includes("\"ci\":\"Bitrise\"");
            then.status(200);
        });

        let uploader = Uploader::validate(config_for(&server), options(apk), provenance()).unwrap();
        let err = uploader.upload().unwrap_err();

        assert!(matches!(err, WaldoError::InvalidUploadToken));
        report.assert();
    }

    #[test]
    fn missing_build_is_reported() {
        let server = MockServer::start();
        let temp = TempDir::new().unwrap();

        let report = server.mock(|when, then| {
            when.method(POST)
                .path("/uploadError")
                .body_includes("Unable to read build");
            then.status(200);
        });

        let uploader = Uploader::validate(
            config_for(&server),
            options(temp.path().join("missing.apk")),
            provenance(),
        )
        .unwrap();
        let err = uploader.upload().unwrap_err();

        assert!(matches!(err, WaldoError::UnreadableBuild { .. }));
        report.assert();
    }

    #[test]
    fn error_report_failure_keeps_original_error() {
        let server = MockServer::start();
        let temp = TempDir::new().unwrap();
        let apk = temp.path().join("app.apk");
        fs::write(&apk, "apk-bytes").unwrap();

        server.mock(|when, then| {
            when.method(POST).path("/versions");
            then.status(500);
        });

        let mut config = config_for(&server);
        config.endpoints.error = "http://127.0.0.1:1/uploadError".to_string();

        let uploader = Uploader::validate(config, options(apk), provenance()).unwrap();
        let err = uploader.upload().unwrap_err();
        assert!(matches!(err, WaldoError::HttpStatus { status: 500, .. }));
    }
}
