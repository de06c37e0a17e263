//! Waldo - build upload agent.
//!
//! Uploads mobile builds (`.apk`, `.app`, `.ipa`) together with where they
//! came from: the CI provider and the git commit and branch, as inferred from
//! environment variables and the local `git` executable.
//!
//! # Modules
//!
//! - [`ci`] - CI provider detection from environment variables
//! - [`git`] - Commit and branch inference through `git`
//! - [`provenance`] - CI and git information combined
//! - [`build`] - Build validation and `.app` packaging
//! - [`upload`] - Upload and trigger requests
//! - [`config`] - Agent configuration loading and overrides
//! - [`platform`] - Host platform and architecture names
//! - [`cli`] - Command-line interface and argument parsing
//! - [`ui`] - Spinners and terminal output
//! - [`error`] - Error types and result aliases
//!
//! # Example
//!
//! ```
//! use waldo::ci::{CiDetector, CiProvider};
//!
//! let info = CiDetector::new().detect_with_env(|key| match key {
//!     "BITRISE_IO" => Ok("true".to_string()),
//!     "BITRISE_GIT_BRANCH" => Ok("main".to_string()),
//!     _ => Err(std::env::VarError::NotPresent),
//! });
//!
//! assert_eq!(info.provider, CiProvider::Bitrise);
//! assert_eq!(info.git_branch.as_deref(), Some("main"));
//! ```

pub mod build;
pub mod ci;
pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod platform;
pub mod provenance;
pub mod ui;
pub mod upload;

pub use error::{Result, WaldoError};
