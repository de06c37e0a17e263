//! CI environment detection.
//!
//! Classifies the running environment into a [`CiProvider`] by checking
//! well-known environment variables, then pulls the provider's own idea of
//! the branch and commit being built.

use super::provider::{CiProvider, PROVIDER_RULES};

/// Variable a wrapping workflow sets to `github.event.pull_request.head.sha`.
///
/// GitHub does not export the pull request head SHA itself, so a custom
/// action has to populate this before the agent runs.
pub const GITHUB_PR_HEAD_SHA_VAR: &str = "GITHUB_EVENT_PULL_REQUEST_HEAD_SHA";

/// What the CI environment says about the current build.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CiInfo {
    /// The detected provider.
    pub provider: CiProvider,
    /// Branch reported by the provider, if any.
    pub git_branch: Option<String>,
    /// Commit reported by the provider, if any.
    pub git_commit: Option<String>,
    /// Most-recent commits to skip when resolving the real commit.
    pub skip_count: usize,
}

/// Detects the CI provider along with its branch/commit hints.
///
/// # Example
///
/// ```
/// use waldo::ci::{CiDetector, CiProvider};
///
/// let info = CiDetector::new().detect_with_env(|key| match key {
///     "CIRCLECI" => Ok("true".to_string()),
///     "CIRCLE_BRANCH" => Ok("main".to_string()),
///     _ => Err(std::env::VarError::NotPresent),
/// });
/// assert_eq!(info.provider, CiProvider::CircleCI);
/// assert_eq!(info.git_branch.as_deref(), Some("main"));
/// ```
#[derive(Debug, Default)]
pub struct CiDetector;

impl CiDetector {
    pub fn new() -> Self {
        Self
    }

    /// Detect from the process environment.
    pub fn detect(&self) -> CiInfo {
        self.detect_with_env(|key| std::env::var(key))
    }

    /// Detect with a custom env var lookup (for testing).
    pub fn detect_with_env<F>(&self, env_fn: F) -> CiInfo
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        let mut info = CiInfo {
            provider: detect_provider_with_env(&env_fn),
            ..Default::default()
        };
        extract_full_info(&mut info, &env_fn);

        tracing::debug!(
            provider = %info.provider,
            branch = ?info.git_branch,
            commit = ?info.git_commit,
            skip_count = info.skip_count,
            "Detected CI environment"
        );

        info
    }
}

/// Classify the process environment without reading any branch or commit
/// hints.
pub fn detect_provider() -> CiProvider {
    detect_provider_with_env(&|key: &str| std::env::var(key))
}

/// Classify an environment given as a lookup function.
///
/// Walks [`PROVIDER_RULES`] in order; the first matching rule wins.
pub fn detect_provider_with_env<F>(env_fn: &F) -> CiProvider
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    PROVIDER_RULES
        .iter()
        .find(|rule| rule.presence.matches(env_fn(rule.env).ok().as_deref()))
        .map(|rule| rule.provider)
        .unwrap_or_default()
}

fn extract_full_info<F>(info: &mut CiInfo, env_fn: &F)
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let var = |key: &str| non_empty(env_fn, key);

    match info.provider {
        CiProvider::AppCenter => {
            info.git_branch = var("APPCENTER_BRANCH");
        }
        CiProvider::AzureDevOps => {
            info.git_branch = var("BUILD_SOURCEBRANCHNAME");
            info.git_commit = var("BUILD_SOURCEVERSION");
        }
        CiProvider::Bitrise => {
            info.git_branch = var("BITRISE_GIT_BRANCH");
            info.git_commit = var("BITRISE_GIT_COMMIT");
        }
        CiProvider::CircleCI => {
            info.git_branch = var("CIRCLE_BRANCH");
            info.git_commit = var("CIRCLE_SHA1");
        }
        CiProvider::CodeBuild => {
            info.git_branch = var("CODEBUILD_WEBHOOK_TRIGGER")
                .and_then(|trigger| trigger.strip_prefix("branch/").map(str::to_string))
                .filter(|branch| !branch.is_empty());
            info.git_commit = var("CODEBUILD_WEBHOOK_PREV_COMMIT");
        }
        CiProvider::GitHubActions => extract_github_actions(info, env_fn),
        CiProvider::TravisCI => {
            info.git_branch = var("TRAVIS_BRANCH");
            info.git_commit = var("TRAVIS_COMMIT");
        }
        CiProvider::XcodeCloud => {
            info.git_branch = var("CI_BRANCH");
            info.git_commit = var("CI_COMMIT");
        }
        // Neither exposes a reliable branch/commit pair.
        CiProvider::Jenkins | CiProvider::TeamCity => {}
        CiProvider::Unknown => {}
    }
}

fn extract_github_actions<F>(info: &mut CiInfo, env_fn: &F)
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let event_name = non_empty(env_fn, "GITHUB_EVENT_NAME");
    let on_branch = non_empty(env_fn, "GITHUB_REF_TYPE").as_deref() == Some("branch");

    match event_name.as_deref() {
        Some("pull_request") | Some("pull_request_target") => {
            info.git_branch = on_branch
                .then(|| non_empty(env_fn, "GITHUB_HEAD_REF"))
                .flatten();
            info.git_commit = non_empty(env_fn, GITHUB_PR_HEAD_SHA_VAR);
            // HEAD is the synthetic merge commit, one ahead of the PR head.
            info.skip_count = 1;
        }
        Some("push") => {
            info.git_branch = on_branch
                .then(|| non_empty(env_fn, "GITHUB_REF_NAME"))
                .flatten();
            info.git_commit = non_empty(env_fn, "GITHUB_SHA");
        }
        _ => {
            info.git_branch = None;
            info.git_commit = None;
        }
    }
}

fn non_empty<F>(env_fn: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    env_fn(key).ok().filter(|value| !value.is_empty())
}
