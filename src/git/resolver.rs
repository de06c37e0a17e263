//! Git commit and branch inference.
//!
//! Resolution runs in four steps:
//!
//! 1. Is git installed? If not, stop with [`GitAccess::NoGitCommandFound`].
//! 2. Are we inside a repository? If not, stop with
//!    [`GitAccess::NotGitRepository`].
//! 3. Resolve the commit, skipping the newest `skip_count` commits.
//! 4. Resolve the branch, first answer wins:
//!    - refs pointing exactly at the commit (`for-each-ref --points-at`)
//!    - the nearest symbolic name for the commit (`name-rev`)
//!    - the current branch (`rev-parse --abbrev-ref HEAD`)
//!
//! Failures inside steps 3 and 4 only leave a field empty.

use std::fmt;

use super::refs::{branch_from_short_ref, branch_names_from_refs, strip_ancestry_suffix};
use super::runner::{CommandRunner, SystemRunner};

const GIT: &str = "git";

/// Why git information may be incomplete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GitAccess {
    /// Git ran inside a repository.
    Ok,
    /// No git executable on the search path.
    NoGitCommandFound,
    /// The working directory is not inside a repository.
    NotGitRepository,
}

impl GitAccess {
    /// Name reported to the intake service.
    pub fn as_str(&self) -> &'static str {
        match self {
            GitAccess::Ok => "ok",
            GitAccess::NoGitCommandFound => "noGitCommandFound",
            GitAccess::NotGitRepository => "notGitRepository",
        }
    }
}

impl fmt::Display for GitAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What git says about the checkout.
///
/// When `access` is not [`GitAccess::Ok`], `branch` and `commit` are both
/// `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitInfo {
    access: GitAccess,
    branch: Option<String>,
    commit: Option<String>,
}

impl GitInfo {
    /// Information for a checkout git could not inspect.
    pub fn inaccessible(access: GitAccess) -> Self {
        Self {
            access,
            branch: None,
            commit: None,
        }
    }

    /// Information for a checkout git could inspect.
    pub fn resolved(branch: Option<String>, commit: Option<String>) -> Self {
        Self {
            access: GitAccess::Ok,
            branch,
            commit,
        }
    }

    /// Access status.
    pub fn access(&self) -> GitAccess {
        self.access
    }

    /// Best-effort branch name.
    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    /// Resolved commit hash.
    pub fn commit(&self) -> Option<&str> {
        self.commit.as_deref()
    }
}

/// Infers commit and branch by querying git.
///
/// # Example
///
/// ```
/// use waldo::git::{CommandOutput, GitAccess, GitResolver, ScriptedRunner};
///
/// let runner = ScriptedRunner::new()
///     .respond("git", &["rev-parse"], CommandOutput::success(""))
///     .respond("git", &["log", "--format=%H", "--skip=0", "-1"], CommandOutput::success("c0ffee"))
///     .respond(
///         "git",
///         &["for-each-ref", "--points-at=c0ffee", "--format=%(refname)"],
///         CommandOutput::success("refs/heads/main"),
///     );
///
/// let info = GitResolver::with_runner(runner).resolve(0);
/// assert_eq!(info.access(), GitAccess::Ok);
/// assert_eq!(info.commit(), Some("c0ffee"));
/// assert_eq!(info.branch(), Some("main"));
/// ```
pub struct GitResolver<R: CommandRunner = SystemRunner> {
    runner: R,
}

impl GitResolver<SystemRunner> {
    /// Resolve against the current directory.
    pub fn new() -> Self {
        Self {
            runner: SystemRunner::new(),
        }
    }
}

impl Default for GitResolver<SystemRunner> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: CommandRunner> GitResolver<R> {
    /// Resolve using a custom command runner.
    pub fn with_runner(runner: R) -> Self {
        Self { runner }
    }

    /// Get the command runner.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Resolve git information, skipping the newest `skip_count` commits.
    pub fn resolve(&self, skip_count: usize) -> GitInfo {
        if !self.runner.is_available(GIT) {
            tracing::debug!("git executable not found on PATH");
            return GitInfo::inaccessible(GitAccess::NoGitCommandFound);
        }

        if self.git(&["rev-parse"]).is_none() {
            tracing::debug!("Not inside a git repository");
            return GitInfo::inaccessible(GitAccess::NotGitRepository);
        }

        let commit = self.resolve_commit(skip_count);
        let branch = self.resolve_branch(commit.as_deref());

        tracing::debug!(?branch, ?commit, skip_count, "Resolved git information");

        GitInfo::resolved(branch, commit)
    }

    fn resolve_commit(&self, skip_count: usize) -> Option<String> {
        let skip = format!("--skip={}", skip_count);
        self.git(&["log", "--format=%H", &skip, "-1"])
            .map(|hash| hash.trim().to_string())
            .filter(|hash| !hash.is_empty())
    }

    fn resolve_branch(&self, commit: Option<&str>) -> Option<String> {
        if let Some(commit) = commit {
            if let Some(branch) = self.branch_from_refs(commit) {
                tracing::debug!(%branch, "Branch from refs pointing at commit");
                return Some(branch);
            }

            if let Some(branch) = self.branch_from_name_rev(commit) {
                tracing::debug!(%branch, "Branch from nearest symbolic name");
                return Some(branch);
            }
        }

        let branch = self.branch_from_head();
        if let Some(branch) = &branch {
            tracing::debug!(%branch, "Branch from current HEAD");
        }
        branch
    }

    fn branch_from_refs(&self, commit: &str) -> Option<String> {
        let points_at = format!("--points-at={}", commit);
        let output = self.git(&["for-each-ref", &points_at, "--format=%(refname)"])?;
        branch_names_from_refs(&output).into_iter().next()
    }

    fn branch_from_name_rev(&self, commit: &str) -> Option<String> {
        let name = self.git(&["name-rev", "--name-only", "--no-undefined", commit])?;
        branch_from_short_ref(strip_ancestry_suffix(name.trim())).map(str::to_string)
    }

    fn branch_from_head(&self) -> Option<String> {
        let name = self.git(&["rev-parse", "--abbrev-ref", "HEAD"])?;
        let name = name.trim();

        if name.is_empty() || name == "HEAD" {
            None
        } else {
            Some(name.to_string())
        }
    }

    /// Run git, returning stdout only when it exits successfully.
    fn git(&self, args: &[&str]) -> Option<String> {
        match self.runner.run(GIT, args) {
            Ok(output) if output.succeeded() => Some(output.stdout),
            Ok(output) => {
                tracing::debug!(
                    args = ?args,
                    exit_code = ?output.exit_code,
                    stderr = %output.stderr,
                    "git query failed"
                );
                None
            }
            Err(e) => {
                tracing::debug!(args = ?args, error = %e, "git could not be run");
                None
            }
        }
    }
}
