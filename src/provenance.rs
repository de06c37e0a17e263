//! Combined CI and git provenance for a build.

use crate::ci::{CiDetector, CiInfo};
use crate::git::{CommandRunner, GitInfo, GitResolver};

/// Everything the agent knows about where a build came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    /// What the CI environment reports.
    pub ci: CiInfo,
    /// What git reports, after applying the CI skip count.
    pub git: GitInfo,
}

impl Provenance {
    /// Detect CI from the process environment, then resolve git in the
    /// current directory.
    pub fn gather() -> Self {
        let ci = CiDetector::new().detect();
        let git = GitResolver::new().resolve(ci.skip_count);
        Self { ci, git }
    }

    /// Detect CI from `env_fn`, then resolve git through `runner`.
    pub fn gather_with<F, R>(env_fn: F, runner: R) -> Self
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
        R: CommandRunner,
    {
        let ci = CiDetector::new().detect_with_env(env_fn);
        let git = GitResolver::with_runner(runner).resolve(ci.skip_count);
        Self { ci, git }
    }
}
