//! CI provider detection.
//!
//! Determines which continuous-integration platform the agent is running on
//! and what that platform reports about the branch and commit being built.
//!
//! Providers are checked in a fixed priority order (see
//! [`provider::PROVIDER_RULES`]); the first match wins and no match means
//! [`CiProvider::Unknown`].

pub mod detection;
pub mod provider;

pub use detection::{
    detect_provider, detect_provider_with_env, CiDetector, CiInfo, GITHUB_PR_HEAD_SHA_VAR,
};
pub use provider::{CiProvider, Presence, ProviderRule, PROVIDER_RULES};
