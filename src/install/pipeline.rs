//! Acquire-or-reuse pipeline
//!
//! A resolved version is either served from the tool cache (`Cached`) or
//! downloaded, extracted, laid out under `bin/` and committed to the cache
//! (`Fetched`). Nothing is persisted between those two outcomes: the scratch
//! directory holding the archive is removed when acquisition finishes.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::TOOL_NAME;
use crate::error::SetupError;
use crate::install::cache::ToolCache;
use crate::install::download::{DownloadError, Downloader};
use crate::install::extract::{ExtractionError, extract_archive, move_into_bin};
use crate::install::platform::HostTarget;
use crate::version::resolver::ResolvedVersion;

/// How an installation was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquisitionState {
    /// Reused from the tool cache without network access
    Cached,
    /// Downloaded and committed to the tool cache during this run
    Fetched,
}

/// A usable installation of the tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acquisition {
    pub version: ResolvedVersion,
    /// Installation root; its `bin/` child holds the executable
    pub tool_dir: PathBuf,
    pub state: AcquisitionState,
}

impl Acquisition {
    pub fn bin_dir(&self) -> PathBuf {
        self.tool_dir.join("bin")
    }
}

/// Fetches release archives into the tool cache
pub struct Installer {
    downloader: Arc<dyn Downloader>,
    cache: ToolCache,
    target: HostTarget,
    /// Base URL such as `https://github.com/go-task/task/releases/download`
    download_base: String,
    temp_dir: PathBuf,
}

impl Installer {
    pub fn new(
        downloader: Arc<dyn Downloader>,
        cache: ToolCache,
        target: HostTarget,
        download_base: &str,
        temp_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            downloader,
            cache,
            target,
            download_base: download_base.trim_end_matches('/').to_string(),
            temp_dir: temp_dir.into(),
        }
    }

    /// Download URL of the archive for `version` on this host
    pub fn download_url(&self, version: &ResolvedVersion) -> String {
        format!(
            "{}/{}/{}",
            self.download_base,
            version,
            self.target.archive_filename()
        )
    }

    /// Return an installation of `version`, downloading it on a cache miss
    pub async fn acquire(&self, version: &ResolvedVersion) -> Result<Acquisition, SetupError> {
        if let Some(tool_dir) = self
            .cache
            .find(TOOL_NAME, version.as_str(), &self.target.arch)
        {
            info!("Using cached Task {} from {:?}", version, tool_dir);
            return Ok(Acquisition {
                version: version.clone(),
                tool_dir,
                state: AcquisitionState::Cached,
            });
        }

        let tool_dir = self.fetch(version).await?;
        debug!("Task cached under {:?}", tool_dir);

        Ok(Acquisition {
            version: version.clone(),
            tool_dir,
            state: AcquisitionState::Fetched,
        })
    }

    async fn fetch(&self, version: &ResolvedVersion) -> Result<PathBuf, SetupError> {
        let download_failed = |source: DownloadError| SetupError::Download {
            version: version.to_string(),
            source,
        };

        std::fs::create_dir_all(&self.temp_dir)
            .map_err(|e| download_failed(DownloadError::Io(e)))?;
        let scratch = tempfile::Builder::new()
            .prefix("setup-task-")
            .tempdir_in(&self.temp_dir)
            .map_err(|e| download_failed(DownloadError::Io(e)))?;

        let url = self.download_url(version);
        let archive = scratch.path().join(self.target.archive_filename());
        info!("Downloading Task {} from {}", version, url);
        self.downloader
            .download(&url, &archive)
            .await
            .map_err(download_failed)?;

        let root = scratch.path().join("extracted");
        std::fs::create_dir_all(&root).map_err(ExtractionError::from)?;
        extract_archive(&archive, self.target.archive_format(), &root).await?;
        move_into_bin(&root, &self.target.executable_name())?;

        let tool_dir = self
            .cache
            .store_blocking(&root, TOOL_NAME, version.as_str(), &self.target.arch)
            .await?;

        Ok(tool_dir)
    }
}
