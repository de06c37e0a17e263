//! The `waldo info` command.
//!
//! Prints what the agent would report for a directory without uploading
//! anything.

use std::path::{Path, PathBuf};

use crate::ci::{CiDetector, CiInfo};
use crate::cli::args::InfoArgs;
use crate::config::AgentConfig;
use crate::error::Result;
use crate::git::{CommandRunner, GitResolver, SystemRunner};
use crate::platform::version_string;
use crate::provenance::Provenance;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The info command implementation.
pub struct InfoCommand {
    config: AgentConfig,
    dir: PathBuf,
}

impl InfoCommand {
    pub fn new(config: AgentConfig, project_root: &Path, args: InfoArgs) -> Self {
        let dir = match args.dir {
            Some(dir) if dir.is_absolute() => dir,
            Some(dir) => project_root.join(dir),
            None => project_root.to_path_buf(),
        };
        Self { config, dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Resolve git for HEAD itself.
    ///
    /// The CI skip count is not applied: `info` describes the checkout as
    /// it is, so under a pull request job it shows the merge commit rather
    /// than the pull request head that `upload` reports.
    pub fn inspect<R: CommandRunner>(&self, ci: CiInfo, runner: R) -> Provenance {
        let git = GitResolver::with_runner(runner).resolve(0);
        Provenance { ci, git }
    }
}

impl Command for InfoCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let ci = CiDetector::new().detect();
        let provenance = self.inspect(ci, SystemRunner::in_dir(&self.dir));

        ui.show_header(&version_string(&self.config));
        show_provenance(ui, &provenance);

        Ok(CommandResult::success())
    }
}

/// Print CI and git fields as aligned key-value lines.
pub(crate) fn show_provenance(ui: &mut dyn UserInterface, provenance: &Provenance) {
    let ci = &provenance.ci;
    let git = &provenance.git;

    ui.key_value("CI", ci.provider.name());
    if let Some(branch) = &ci.git_branch {
        ui.key_value("CI Branch", branch);
    }
    if let Some(commit) = &ci.git_commit {
        ui.key_value("CI Commit", commit);
    }
    ui.key_value("Access", git.access().as_str());
    ui.key_value("Branch", git.branch().unwrap_or(""));
    ui.key_value("Commit", git.commit().unwrap_or(""));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ci::{CiInfo, CiProvider};
    use crate::git::{CommandOutput, GitAccess, GitInfo, ScriptedRunner};
    use crate::ui::MockUI;

    #[test]
    fn relative_dir_is_joined_to_project_root() {
        let cmd = InfoCommand::new(
            AgentConfig::default(),
            Path::new("/work"),
            InfoArgs {
                dir: Some(PathBuf::from("app")),
            },
        );
        assert_eq!(cmd.dir(), Path::new("/work/app"));

        let cmd = InfoCommand::new(AgentConfig::default(), Path::new("/work"), InfoArgs { dir: None });
        assert_eq!(cmd.dir(), Path::new("/work"));
    }

    #[test]
    fn inspect_ignores_ci_skip_count() {
        let ci = CiInfo {
            provider: CiProvider::GitHubActions,
            git_branch: Some("feature/x".to_string()),
            git_commit: Some("pr-head".to_string()),
            skip_count: 1,
        };
        let runner = ScriptedRunner::new()
            .respond("git", &["rev-parse"], CommandOutput::success(""))
            .respond(
                "git",
                &["log", "--format=%H", "--skip=0", "-1"],
                CommandOutput::success("merge-commit"),
            )
            .respond(
                "git",
                &["log", "--format=%H", "--skip=1", "-1"],
                CommandOutput::success("pr-head"),
            );

        let cmd = InfoCommand::new(
            AgentConfig::default(),
            Path::new("/work"),
            InfoArgs { dir: None },
        );
        let provenance = cmd.inspect(ci, runner);

        assert_eq!(provenance.ci.skip_count, 1);
        assert_eq!(provenance.git.access(), GitAccess::Ok);
        assert_eq!(provenance.git.commit(), Some("merge-commit"));
    }

    #[test]
    fn show_provenance_lists_fields() {
        let provenance = Provenance {
            ci: CiInfo {
                provider: CiProvider::GitHubActions,
                git_branch: Some("feature/x".to_string()),
                git_commit: None,
                skip_count: 1,
            },
            git: GitInfo::resolved(Some("feature/x".to_string()), Some("abc".to_string())),
        };

        let mut ui = MockUI::new();
        show_provenance(&mut ui, &provenance);

        assert_eq!(ui.value_of("CI"), Some("GitHub Actions"));
        assert_eq!(ui.value_of("CI Branch"), Some("feature/x"));
        assert_eq!(ui.value_of("CI Commit"), None);
        assert_eq!(ui.value_of("Access"), Some("ok"));
        assert_eq!(ui.value_of("Commit"), Some("abc"));
    }
}
