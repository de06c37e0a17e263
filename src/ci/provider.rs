//! CI provider identities and their presence rules.

use std::fmt;

/// A continuous-integration platform the agent knows how to recognize.
///
/// `Unknown` is the default and sorts before every named provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum CiProvider {
    #[default]
    Unknown,
    AppCenter,
    AzureDevOps,
    Bitrise,
    CircleCI,
    CodeBuild,
    GitHubActions,
    Jenkins,
    TeamCity,
    TravisCI,
    XcodeCloud,
}

impl CiProvider {
    /// Human-readable name, as reported to the intake service.
    pub fn name(&self) -> &'static str {
        match self {
            CiProvider::Unknown => "Unknown",
            CiProvider::AppCenter => "App Center",
            CiProvider::AzureDevOps => "Azure DevOps",
            CiProvider::Bitrise => "Bitrise",
            CiProvider::CircleCI => "CircleCI",
            CiProvider::CodeBuild => "CodeBuild",
            CiProvider::GitHubActions => "GitHub Actions",
            CiProvider::Jenkins => "Jenkins",
            CiProvider::TeamCity => "TeamCity",
            CiProvider::TravisCI => "Travis CI",
            CiProvider::XcodeCloud => "Xcode Cloud",
        }
    }

    /// Whether this is a recognized provider.
    pub fn is_known(&self) -> bool {
        *self != CiProvider::Unknown
    }
}

impl fmt::Display for CiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a rule's environment variable must look for the rule to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// The variable is set to any non-empty value.
    NonEmpty,
    /// The variable equals this exact value.
    Equals(&'static str),
}

impl Presence {
    /// Check a looked-up value against this predicate.
    pub fn matches(&self, value: Option<&str>) -> bool {
        match (self, value) {
            (Presence::NonEmpty, Some(v)) => !v.is_empty(),
            (Presence::Equals(expected), Some(v)) => v == *expected,
            (_, None) => false,
        }
    }
}

/// A provider detection rule.
#[derive(Debug, Clone, Copy)]
pub struct ProviderRule {
    /// Provider selected when the rule matches.
    pub provider: CiProvider,
    /// The environment variable to check.
    pub env: &'static str,
    /// What the variable must look like.
    pub presence: Presence,
}

/// Provider rules in priority order. The first matching rule wins.
pub const PROVIDER_RULES: &[ProviderRule] = &[
    ProviderRule {
        provider: CiProvider::AppCenter,
        env: "APPCENTER_BUILD_ID",
        presence: Presence::NonEmpty,
    },
    ProviderRule {
        provider: CiProvider::AzureDevOps,
        env: "AGENT_ID",
        presence: Presence::NonEmpty,
    },
    ProviderRule {
        provider: CiProvider::Bitrise,
        env: "BITRISE_IO",
        presence: Presence::Equals("true"),
    },
    ProviderRule {
        provider: CiProvider::CircleCI,
        env: "CIRCLECI",
        presence: Presence::Equals("true"),
    },
    ProviderRule {
        provider: CiProvider::CodeBuild,
        env: "CODEBUILD_BUILD_ID",
        presence: Presence::NonEmpty,
    },
    ProviderRule {
        provider: CiProvider::GitHubActions,
        env: "GITHUB_ACTIONS",
        presence: Presence::Equals("true"),
    },
    ProviderRule {
        provider: CiProvider::Jenkins,
        env: "JENKINS_URL",
        presence: Presence::NonEmpty,
    },
    ProviderRule {
        provider: CiProvider::TeamCity,
        env: "TEAMCITY_VERSION",
        presence: Presence::NonEmpty,
    },
    ProviderRule {
        provider: CiProvider::TravisCI,
        env: "TRAVIS",
        presence: Presence::Equals("true"),
    },
    ProviderRule {
        provider: CiProvider::XcodeCloud,
        env: "CI_BUILD_ID",
        presence: Presence::NonEmpty,
    },
];
