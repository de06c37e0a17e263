//! Build artifact validation and packaging.

pub mod payload;
pub mod validation;

pub use payload::{content_type, payload_path, prepare_payload, zip_bundle, Payload, WorkingDir};
pub use validation::{validate_build_path, validate_upload_token, BuildTarget, Flavor};
