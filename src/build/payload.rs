//! Upload payload preparation.
//!
//! `.apk` and `.ipa` builds are uploaded as-is. `.app` bundles are
//! directories, so they are zipped into a per-process working directory
//! first, with entry names relative to the bundle's parent.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use super::validation::BuildTarget;
use crate::error::{Result, WaldoError};

/// Scratch directory for packaging, removed on drop.
#[derive(Debug)]
pub struct WorkingDir {
    path: PathBuf,
}

impl WorkingDir {
    /// `<tmp>/waldo-agent-<pid>`, emptied and recreated.
    pub fn for_process() -> Result<Self> {
        let path = std::env::temp_dir().join(format!("waldo-agent-{}", std::process::id()));
        Self::create_at(path)
    }

    /// Recreate an empty directory at `path`.
    pub fn create_at(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if path.exists() {
            fs::remove_dir_all(&path)?;
        }
        fs::create_dir_all(&path)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for WorkingDir {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_dir_all(&self.path) {
            tracing::debug!(
                "Failed to remove working directory {}: {}",
                self.path.display(),
                e
            );
        }
    }
}

/// Where the upload body will be read from.
pub fn payload_path(working: &Path, target: &BuildTarget) -> PathBuf {
    if target.is_bundle() {
        working.join(format!("{}.zip", target.file_name()))
    } else {
        target.path.clone()
    }
}

/// `Content-Type` for the upload body.
pub fn content_type(target: &BuildTarget) -> &'static str {
    if target.is_bundle() {
        "application/zip"
    } else {
        "application/octet-stream"
    }
}

/// The file to upload, plus the scratch directory it may live in.
#[derive(Debug)]
pub struct Payload {
    path: PathBuf,
    _working: Option<WorkingDir>,
}

impl Payload {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Check the build's shape and produce the file to upload.
///
/// Bundles must be directories and are zipped into the directory returned
/// by `working`, which is only called for bundles. Anything else must be a
/// regular file and is uploaded in place.
pub fn prepare_payload<F>(target: &BuildTarget, working: F) -> Result<Payload>
where
    F: FnOnce() -> Result<WorkingDir>,
{
    let unreadable = || WaldoError::UnreadableBuild {
        path: target.path.clone(),
    };

    if target.is_bundle() {
        if !target.path.is_dir() {
            return Err(unreadable());
        }
        let working = working()?;
        let zip_path = payload_path(working.path(), target);
        zip_bundle(&target.path, &zip_path)?;
        Ok(Payload {
            path: zip_path,
            _working: Some(working),
        })
    } else {
        if !target.path.is_file() {
            return Err(unreadable());
        }
        Ok(Payload {
            path: target.path.clone(),
            _working: None,
        })
    }
}

/// Zip `bundle` into `zip_path`.
///
/// Entry names start with the bundle's own name (`MyApp.app/...`). Unix
/// permissions and symlinks are kept.
pub fn zip_bundle(bundle: &Path, zip_path: &Path) -> anyhow::Result<()> {
    let root = bundle
        .parent()
        .with_context(|| format!("Bundle has no parent directory: {}", bundle.display()))?;

    let file = File::create(zip_path)
        .with_context(|| format!("Failed to create {}", zip_path.display()))?;
    let mut writer = ZipWriter::new(file);

    add_entry(&mut writer, root, bundle)?;

    writer.finish().context("Failed to finalize zip archive")?;
    tracing::debug!("Zipped {} into {}", bundle.display(), zip_path.display());
    Ok(())
}

fn add_entry(writer: &mut ZipWriter<File>, root: &Path, path: &Path) -> anyhow::Result<()> {
    let name = entry_name(root, path)?;
    let metadata = fs::symlink_metadata(path)
        .with_context(|| format!("Failed to stat {}", path.display()))?;
    let options = SimpleFileOptions::default().unix_permissions(unix_mode(&metadata));

    if metadata.file_type().is_symlink() {
        let target = fs::read_link(path)
            .with_context(|| format!("Failed to read link {}", path.display()))?;
        writer.add_symlink(name, target.to_string_lossy().into_owned(), options)?;
    } else if metadata.is_dir() {
        writer.add_directory(format!("{}/", name), options)?;

        let mut children = fs::read_dir(path)
            .with_context(|| format!("Failed to read directory {}", path.display()))?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<io::Result<Vec<_>>>()?;
        children.sort();

        for child in children {
            add_entry(writer, root, &child)?;
        }
    } else {
        writer.start_file(name, options)?;
        let mut source =
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        io::copy(&mut source, writer)?;
    }

    Ok(())
}

fn entry_name(root: &Path, path: &Path) -> anyhow::Result<String> {
    let relative = path
        .strip_prefix(root)
        .with_context(|| format!("{} is outside {}", path.display(), root.display()))?;

    Ok(relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/"))
}

#[cfg(unix)]
fn unix_mode(metadata: &fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn unix_mode(metadata: &fs::Metadata) -> u32 {
    if metadata.is_dir() {
        0o755
    } else {
        0o644
    }
}
