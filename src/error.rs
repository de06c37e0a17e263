//! Error types for agent operations.
//!
//! This module defines [`WaldoError`], the primary error type used by the
//! upload, trigger, packaging and configuration layers, and a [`Result`]
//! type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - CI detection and git resolution never return errors; they degrade to
//!   empty fields and a terminal access status instead
//! - Use `WaldoError` for failures a user needs to act on
//! - Use `anyhow::Error` (via `WaldoError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for agent operations.
#[derive(Debug, Error)]
pub enum WaldoError {
    /// No upload token was supplied.
    #[error("Empty upload token")]
    EmptyUploadToken,

    /// No build path was supplied.
    #[error("Empty build path")]
    EmptyBuildPath,

    /// The build path does not end in a recognized extension.
    #[error("File extension of build at '{}' is not recognized", path.display())]
    UnrecognizedBuildType { path: PathBuf },

    /// The build exists in the wrong shape (file vs. bundle) or is missing.
    #[error("Unable to read build at '{}'", path.display())]
    UnreadableBuild { path: PathBuf },

    /// The intake service rejected the upload token.
    #[error("Upload token is invalid or missing!")]
    InvalidUploadToken,

    /// The intake service answered with a non-success status.
    #[error("Unable to {action}, HTTP status: {status}")]
    HttpStatus { action: String, status: u16 },

    /// The request could not be sent or its response could not be read.
    #[error("Unable to {action}, error: {message}, url: {url}")]
    Request {
        action: String,
        url: String,
        message: String,
    },

    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// An `--override` key or value was rejected.
    #[error("Invalid override '{key}': {message}")]
    InvalidOverride { key: String, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for agent operations.
pub type Result<T> = std::result::Result<T, WaldoError>;
