//! Upload token and build path validation.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Result, WaldoError};

/// Target platform family of a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    Android,
    Ios,
}

impl Flavor {
    /// Name reported to the intake service.
    pub fn as_str(&self) -> &'static str {
        match self {
            Flavor::Android => "Android",
            Flavor::Ios => "iOS",
        }
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated build artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTarget {
    /// Absolute path to the artifact.
    pub path: PathBuf,
    /// Extension without the leading dot (`apk`, `app` or `ipa`).
    pub suffix: String,
    pub flavor: Flavor,
}

impl BuildTarget {
    /// True for `.app` bundles, which are directories and must be zipped.
    pub fn is_bundle(&self) -> bool {
        self.suffix == "app"
    }

    /// Final path component, e.g. `MyApp.app`.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Reject an empty upload token.
pub fn validate_upload_token(token: &str) -> Result<()> {
    if token.is_empty() {
        return Err(WaldoError::EmptyUploadToken);
    }
    Ok(())
}

/// Make `path` absolute and classify it by extension.
///
/// Only the extension is checked here; whether the artifact exists in the
/// right shape is checked when the payload is prepared.
pub fn validate_build_path(path: &Path) -> Result<BuildTarget> {
    if path.as_os_str().is_empty() {
        return Err(WaldoError::EmptyBuildPath);
    }

    let path = std::path::absolute(path)?;

    let suffix = path
        .extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_default();

    let flavor = match suffix.as_str() {
        "apk" => Flavor::Android,
        "app" | "ipa" => Flavor::Ios,
        _ => return Err(WaldoError::UnrecognizedBuildType { path }),
    };

    Ok(BuildTarget {
        path,
        suffix,
        flavor,
    })
}
