//! Git provenance inference.
//!
//! Works out which commit and branch a build corresponds to by querying the
//! local `git` executable:
//!
//! - [`runner`] - the command-running capability and its implementations
//! - [`refs`] - pure ref-name normalization
//! - [`resolver`] - the access checks and the branch fallback chain

pub mod refs;
pub mod resolver;
pub mod runner;

pub use refs::{
    branch_from_full_ref, branch_from_short_ref, branch_names_from_refs, strip_ancestry_suffix,
};
pub use resolver::{GitAccess, GitInfo, GitResolver};
pub use runner::{CommandOutput, CommandRunner, ScriptedRunner, SystemRunner};
