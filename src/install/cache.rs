//! On-disk tool cache
//!
//! Layout mirrors the hosted runner tool cache so entries written by other
//! setup steps are reusable:
//!
//! ```text
//! <root>/<tool>/<version>/<arch>/           installation directory
//! <root>/<tool>/<version>/<arch>.complete   marker written after the copy
//! ```
//!
//! An entry without its marker is treated as absent and overwritten on store.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

/// Errors arising from tool cache access.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("invalid cache version '{0}'")]
    InvalidVersion(String),

    #[error("cache I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cache task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Keyed store of extracted tool installations
#[derive(Debug, Clone)]
pub struct ToolCache {
    root: PathBuf,
}

impl ToolCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Look up a completed entry for `(tool, version, arch)`
    pub fn find(&self, tool: &str, version: &str, arch: &str) -> Option<PathBuf> {
        let version = clean_version(version).ok()?;
        let dir = self.entry_dir(tool, &version, arch);
        let marker = marker_path(&dir);

        if dir.is_dir() && marker.is_file() {
            debug!("Found {} {} ({}) in tool cache at {:?}", tool, version, arch, dir);
            Some(dir)
        } else {
            debug!("{} {} ({}) not found in tool cache", tool, version, arch);
            None
        }
    }

    /// Copy `source_dir` into the cache under `(tool, version, arch)`
    ///
    /// Any partial entry left by an interrupted store is replaced. Returns the
    /// cached installation directory.
    pub fn store(
        &self,
        source_dir: &Path,
        tool: &str,
        version: &str,
        arch: &str,
    ) -> Result<PathBuf, CacheError> {
        let version = clean_version(version)?;
        let dest = self.entry_dir(tool, &version, arch);
        let marker = marker_path(&dest);

        info!("Caching {} {} ({}) at {:?}", tool, version, arch, dest);

        remove_if_exists(&marker)?;
        if dest.exists() {
            fs::remove_dir_all(&dest).map_err(|source| io_error(&dest, source))?;
        }
        fs::create_dir_all(&dest).map_err(|source| io_error(&dest, source))?;

        copy_dir_all(source_dir, &dest)?;
        fs::write(&marker, b"").map_err(|source| io_error(&marker, source))?;

        Ok(dest)
    }

    /// [`ToolCache::store`] on the blocking thread pool
    pub async fn store_blocking(
        &self,
        source_dir: &Path,
        tool: &str,
        version: &str,
        arch: &str,
    ) -> Result<PathBuf, CacheError> {
        let cache = self.clone();
        let source_dir = source_dir.to_path_buf();
        let (tool, version, arch) = (tool.to_string(), version.to_string(), arch.to_string());

        tokio::task::spawn_blocking(move || cache.store(&source_dir, &tool, &version, &arch))
            .await?
    }

    fn entry_dir(&self, tool: &str, version: &str, arch: &str) -> PathBuf {
        self.root.join(tool).join(version).join(arch)
    }
}

/// Strip a leading `v`, canonicalizing valid semantic versions
///
/// Non-semver tags are kept verbatim but may not escape the tool directory.
fn clean_version(version: &str) -> Result<String, CacheError> {
    let trimmed = version.trim();
    let bare = trimmed.strip_prefix('v').unwrap_or(trimmed);

    if let Ok(parsed) = semver::Version::parse(bare) {
        return Ok(parsed.to_string());
    }
    if bare.is_empty() || bare.contains(['/', '\\']) || bare == "." || bare == ".." {
        return Err(CacheError::InvalidVersion(version.to_string()));
    }
    Ok(bare.to_string())
}

fn marker_path(entry_dir: &Path) -> PathBuf {
    let mut marker = entry_dir.as_os_str().to_owned();
    marker.push(".complete");
    PathBuf::from(marker)
}

fn remove_if_exists(path: &Path) -> Result<(), CacheError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(io_error(path, source)),
    }
}

fn copy_dir_all(source: &Path, dest: &Path) -> Result<(), CacheError> {
    let entries = fs::read_dir(source).map_err(|e| io_error(source, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| io_error(source, e))?;
        let from = entry.path();
        let to = dest.join(entry.file_name());
        let file_type = entry.file_type().map_err(|e| io_error(&from, e))?;

        if file_type.is_dir() {
            fs::create_dir_all(&to).map_err(|e| io_error(&to, e))?;
            copy_dir_all(&from, &to)?;
        } else {
            fs::copy(&from, &to).map_err(|e| io_error(&to, e))?;
        }
    }
    Ok(())
}

fn io_error(path: &Path, source: std::io::Error) -> CacheError {
    CacheError::Io {
        path: path.to_path_buf(),
        source,
    }
}
