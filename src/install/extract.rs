//! Archive extraction and `bin/` layout
//!
//! Unpacks `.zip` and `.tar.gz` release archives with path traversal
//! protection, then relocates the executable into `<root>/bin/`. Tar link
//! entries are refused.

use std::fs::{self, File};
use std::path::{Component, Path, PathBuf};

use flate2::read::GzDecoder;
use tracing::debug;

use crate::install::platform::ArchiveFormat;

/// Errors arising from archive extraction.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// I/O error during extraction.
    #[error("extraction I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The zip container could not be read.
    #[error("invalid zip archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// A path in the archive attempts to traverse outside the destination.
    #[error("path traversal detected: {path}")]
    PathTraversal { path: String },

    /// The archive contains a symlink or hard link entry.
    #[error("link entries are not allowed: {path}")]
    LinkEntry { path: String },

    /// The archive contains no files.
    #[error("archive contains no files")]
    EmptyArchive,

    /// The expected executable was not present after extraction.
    #[error("executable not found at {}", path.display())]
    MissingExecutable { path: PathBuf },

    /// The blocking extraction task panicked or was cancelled.
    #[error("extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Extract `archive_path` into `dest_dir` on the blocking thread pool.
///
/// Returns the names of the extracted files.
pub async fn extract_archive(
    archive_path: &Path,
    format: ArchiveFormat,
    dest_dir: &Path,
) -> Result<Vec<String>, ExtractionError> {
    let archive_path = archive_path.to_path_buf();
    let dest_dir = dest_dir.to_path_buf();

    tokio::task::spawn_blocking(move || match format {
        ArchiveFormat::Zip => extract_zip(&archive_path, &dest_dir),
        ArchiveFormat::TarGz => extract_tar_gz(&archive_path, &dest_dir),
    })
    .await?
}

fn extract_tar_gz(archive_path: &Path, dest_dir: &Path) -> Result<Vec<String>, ExtractionError> {
    let file = File::open(archive_path)?;
    let mut archive = tar::Archive::new(GzDecoder::new(file));
    let mut extracted = Vec::new();
    fs::create_dir_all(dest_dir)?;

    for entry_result in archive.entries()? {
        let mut entry = entry_result?;
        let entry_path = entry.path()?.into_owned();

        validate_entry_path(&entry_path)?;

        let entry_type = entry.header().entry_type();
        if entry_type.is_symlink() || entry_type.is_hard_link() {
            return Err(ExtractionError::LinkEntry {
                path: entry_path.display().to_string(),
            });
        }

        if !entry.unpack_in(dest_dir)? {
            debug!("Skipped archive entry {:?}", entry_path);
            continue;
        }

        if entry_type.is_file() {
            if let Some(name) = entry_path.file_name() {
                extracted.push(name.to_string_lossy().into_owned());
            }
        }
    }

    finish(extracted)
}

fn extract_zip(archive_path: &Path, dest_dir: &Path) -> Result<Vec<String>, ExtractionError> {
    let file = File::open(archive_path)?;
    let mut archive = zip::ZipArchive::new(file)?;
    let mut extracted = Vec::new();

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        let Some(entry_path) = entry.enclosed_name() else {
            return Err(ExtractionError::PathTraversal {
                path: entry.name().to_string(),
            });
        };

        let dest_path = dest_dir.join(&entry_path);
        if entry.is_dir() {
            fs::create_dir_all(&dest_path)?;
            continue;
        }
        if let Some(parent) = dest_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut out = File::create(&dest_path)?;
        std::io::copy(&mut entry, &mut out)?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&dest_path, fs::Permissions::from_mode(mode))?;
        }

        if let Some(name) = entry_path.file_name() {
            extracted.push(name.to_string_lossy().into_owned());
        }
    }

    finish(extracted)
}

fn finish(extracted: Vec<String>) -> Result<Vec<String>, ExtractionError> {
    if extracted.is_empty() {
        return Err(ExtractionError::EmptyArchive);
    }
    debug!("Extracted {} files", extracted.len());
    Ok(extracted)
}

/// Validate that a tar entry path does not escape the destination
/// directory via `..` components or absolute paths.
fn validate_entry_path(path: &Path) -> Result<(), ExtractionError> {
    if path.is_absolute() {
        return Err(ExtractionError::PathTraversal {
            path: path.display().to_string(),
        });
    }
    for component in path.components() {
        if matches!(component, Component::ParentDir) {
            return Err(ExtractionError::PathTraversal {
                path: path.display().to_string(),
            });
        }
    }
    Ok(())
}

/// Move `<root>/<executable>` to `<root>/bin/<executable>`.
///
/// Returns the new `bin/` directory.
pub fn move_into_bin(root: &Path, executable: &str) -> Result<PathBuf, ExtractionError> {
    let source = root.join(executable);
    if !source.is_file() {
        return Err(ExtractionError::MissingExecutable { path: source });
    }

    let bin_dir = root.join("bin");
    fs::create_dir_all(&bin_dir)?;
    fs::rename(&source, bin_dir.join(executable))?;

    Ok(bin_dir)
}
