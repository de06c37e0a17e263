//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait and is routed to by
//! [`CommandDispatcher`], which also loads the agent configuration once for
//! the commands that need it.

pub mod completions;
pub mod dispatcher;
pub mod info;
pub mod trigger;
pub mod upload;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
