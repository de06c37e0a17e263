//! The `waldo trigger` command.

use crate::ci::{detect_provider, CiProvider};
use crate::cli::args::TriggerArgs;
use crate::config::AgentConfig;
use crate::error::Result;
use crate::ui::UserInterface;
use crate::upload::{TriggerOptions, Triggerer};

use super::dispatcher::{Command, CommandResult};

/// The trigger command implementation.
pub struct TriggerCommand {
    config: AgentConfig,
    args: TriggerArgs,
}

impl TriggerCommand {
    pub fn new(config: AgentConfig, args: TriggerArgs) -> Self {
        Self { config, args }
    }

    /// Trigger a run as if running under `provider`.
    pub fn run_with(
        &self,
        provider: CiProvider,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        let options = TriggerOptions {
            upload_token: self.args.upload_token.clone(),
            rule_name: self.args.rule_name.clone(),
        };
        let triggerer = Triggerer::validate(self.config.clone(), options, provider)?;

        ui.detail("Request", &triggerer.payload().to_string());

        let mut spinner = ui.start_spinner("Triggering run");
        match triggerer.perform() {
            Ok(receipt) => {
                spinner.finish_success("Run successfully triggered");
                ui.detail(
                    "Response",
                    &format!("POST {}\nHTTP {}\n{}", receipt.url, receipt.status, receipt.body),
                );
                Ok(CommandResult::success())
            }
            Err(e) => {
                spinner.finish_error("Run trigger failed");
                Err(e)
            }
        }
    }
}

impl Command for TriggerCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        self.run_with(detect_provider(), ui)
    }
}
