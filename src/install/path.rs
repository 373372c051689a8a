//! Search path export
//!
//! Under GitHub Actions a directory becomes visible to later steps by
//! appending it as a line to the file named by `$GITHUB_PATH`. Outside a
//! runner the directory is printed so a shell can add it itself.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::SetupError;

/// Environment variable naming the runner's path file
pub const GITHUB_PATH_ENV: &str = "GITHUB_PATH";

/// Trait for making a directory discoverable on the host search path
#[cfg_attr(test, mockall::automock)]
pub trait PathExporter: Send + Sync {
    /// Append `dir` to the search path. Duplicates are left to the host.
    fn export(&self, dir: &Path) -> Result<(), SetupError>;
}

/// Appends directories to the GitHub Actions path file
pub struct GitHubPathExporter {
    path_file: PathBuf,
}

impl GitHubPathExporter {
    pub fn new(path_file: impl Into<PathBuf>) -> Self {
        Self {
            path_file: path_file.into(),
        }
    }
}

impl PathExporter for GitHubPathExporter {
    fn export(&self, dir: &Path) -> Result<(), SetupError> {
        let to_error = |source| SetupError::PathExport {
            path: dir.display().to_string(),
            source,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path_file)
            .map_err(to_error)?;
        writeln!(file, "{}", dir.display()).map_err(to_error)?;

        debug!("Added {:?} to {:?}", dir, self.path_file);
        Ok(())
    }
}

/// Prints the directory on stdout for the calling shell
pub struct StdoutPathExporter;

impl PathExporter for StdoutPathExporter {
    fn export(&self, dir: &Path) -> Result<(), SetupError> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", dir.display()).map_err(|source| SetupError::PathExport {
            path: dir.display().to_string(),
            source,
        })
    }
}

/// Pick the exporter matching the current host
pub fn host_exporter() -> Box<dyn PathExporter> {
    exporter_for(std::env::var(GITHUB_PATH_ENV).ok())
}

fn exporter_for(github_path: Option<String>) -> Box<dyn PathExporter> {
    match github_path.filter(|path| !path.is_empty()) {
        Some(path_file) => Box::new(GitHubPathExporter::new(path_file)),
        None => Box::new(StdoutPathExporter),
    }
}
