//! Command-line interface for the agent.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{Cli, Commands, CompletionsArgs, InfoArgs, TriggerArgs, UploadArgs};
pub use commands::{Command, CommandDispatcher, CommandResult};
