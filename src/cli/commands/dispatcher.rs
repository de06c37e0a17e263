//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::PathBuf;

use crate::cli::args::{Cli, Commands};
use crate::config::{load_merged_config, AgentConfig};
use crate::error::Result;
use crate::ui::UserInterface;

/// Trait for command implementations.
pub trait Command {
    /// Execute the command, writing progress and results to `ui`.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    pub success: bool,
    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    project_root: PathBuf,
}

impl CommandDispatcher {
    /// Create a dispatcher that looks for `.waldo/config.yml` under
    /// `project_root`.
    pub fn new(project_root: PathBuf) -> Self {
        Self { project_root }
    }

    /// Defaults, then the config file, then `--override` pairs.
    pub fn load_config(&self, cli: &Cli) -> Result<AgentConfig> {
        load_merged_config(cli.config.as_deref(), &self.project_root, &cli.overrides)
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &cli.command {
            Commands::Upload(args) => {
                let cmd = super::upload::UploadCommand::new(self.load_config(cli)?, args.clone());
                cmd.execute(ui)
            }
            Commands::Trigger(args) => {
                let cmd =
                    super::trigger::TriggerCommand::new(self.load_config(cli)?, args.clone());
                cmd.execute(ui)
            }
            Commands::Info(args) => {
                let cmd = super::info::InfoCommand::new(
                    self.load_config(cli)?,
                    &self.project_root,
                    args.clone(),
                );
                cmd.execute(ui)
            }
            Commands::Completions(args) => {
                let cmd = super::completions::CompletionsCommand::new(args.clone());
                cmd.execute(ui)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WaldoError;
    use crate::ui::MockUI;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn command_result_success() {
        let result = CommandResult::success();
        assert!(result.success);
        assert_eq!(result.exit_code, 0);
    }

    #[test]
    fn load_config_applies_overrides() {
        let temp = TempDir::new().unwrap();
        let cli = Cli::parse_from([
            "waldo",
            "--override",
            "apiBuildEndpoint=http://localhost/versions",
            "info",
        ]);
        let dispatcher = CommandDispatcher::new(temp.path().to_path_buf());
        let config = dispatcher.load_config(&cli).unwrap();
        assert_eq!(config.endpoints.build, "http://localhost/versions");
    }

    #[test]
    fn bad_override_fails_dispatch() {
        let temp = TempDir::new().unwrap();
        let cli = Cli::parse_from(["waldo", "--override", "apiBogus=x", "info"]);
        let dispatcher = CommandDispatcher::new(temp.path().to_path_buf());
        let mut ui = MockUI::new();
        let result = dispatcher.dispatch(&cli, &mut ui);
        assert!(matches!(result, Err(WaldoError::InvalidOverride { .. })));
    }

    #[test]
    fn upload_without_token_fails() {
        let temp = TempDir::new().unwrap();
        let cli = Cli::parse_from([
            "waldo",
            "upload",
            "app.apk",
            "--upload-token",
            "",
        ]);
        let dispatcher = CommandDispatcher::new(temp.path().to_path_buf());
        let mut ui = MockUI::new();
        let result = dispatcher.dispatch(&cli, &mut ui);
        assert!(matches!(result, Err(WaldoError::EmptyUploadToken)));
    }
}
