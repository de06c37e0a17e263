//! Talking to the intake service.
//!
//! [`Uploader`] sends a build together with its provenance; [`Triggerer`]
//! asks the service to start a run. Both validate their inputs up front and
//! share header and status handling from [`request`].

pub mod request;
pub mod triggerer;
pub mod uploader;

pub use request::{check_status, Fields, Receipt, FALLBACK_AGENT_SOURCE};
pub use triggerer::{TriggerOptions, Triggerer};
pub use uploader::{UploadOptions, Uploader};
