//! The `waldo upload` command.

use crate::cli::args::UploadArgs;
use crate::config::AgentConfig;
use crate::error::Result;
use crate::git::GitAccess;
use crate::provenance::Provenance;
use crate::ui::UserInterface;
use crate::upload::{UploadOptions, Uploader};

use super::dispatcher::{Command, CommandResult};
use super::info::show_provenance;

/// The upload command implementation.
pub struct UploadCommand {
    config: AgentConfig,
    args: UploadArgs,
}

impl UploadCommand {
    pub fn new(config: AgentConfig, args: UploadArgs) -> Self {
        Self { config, args }
    }

    fn options(&self) -> UploadOptions {
        UploadOptions {
            build_path: self.args.build_path.clone(),
            upload_token: self.args.upload_token.clone(),
            variant_name: self.args.variant_name.clone(),
            git_branch: self.args.git_branch.clone(),
            git_commit: self.args.git_commit.clone(),
        }
    }

    /// Validate and upload with already-gathered provenance.
    pub fn run_with(
        &self,
        provenance: Provenance,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        let uploader = Uploader::validate(self.config.clone(), self.options(), provenance)?;

        let access = uploader.provenance().git.access();
        if access != GitAccess::Ok {
            ui.warning(&format!(
                "Uploading without git commit or branch ({})",
                access.as_str()
            ));
        }

        if ui.output_mode().shows_details() {
            show_provenance(ui, uploader.provenance());
        }

        let mut spinner = ui.start_spinner(&format!("Uploading {}", uploader.target().file_name()));
        match uploader.upload() {
            Ok(receipt) => {
                spinner.finish_success("Build successfully uploaded");
                ui.detail(
                    "Response",
                    &format!("POST {}\nHTTP {}\n{}", receipt.url, receipt.status, receipt.body),
                );
                Ok(CommandResult::success())
            }
            Err(e) => {
                spinner.finish_error("Build upload failed");
                Err(e)
            }
        }
    }
}

impl Command for UploadCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        self.run_with(Provenance::gather(), ui)
    }
}
