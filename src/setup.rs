//! End-to-end setup: resolve, acquire, export

use std::sync::Arc;

use tracing::info;

use crate::config::Settings;
use crate::error::SetupError;
use crate::install::cache::ToolCache;
use crate::install::download::HttpDownloader;
use crate::install::path::PathExporter;
use crate::install::pipeline::{Acquisition, Installer};
use crate::install::platform::HostTarget;
use crate::version::registries::GitHubRegistry;
use crate::version::resolver::VersionResolver;

/// Wires the resolver, installer and path exporter for one run
pub struct TaskSetup {
    resolver: VersionResolver,
    installer: Installer,
    exporter: Box<dyn PathExporter>,
}

impl TaskSetup {
    pub fn new(
        resolver: VersionResolver,
        installer: Installer,
        exporter: Box<dyn PathExporter>,
    ) -> Self {
        Self {
            resolver,
            installer,
            exporter,
        }
    }

    /// Build the production collaborators described by `settings`
    pub fn from_settings(
        settings: &Settings,
        target: HostTarget,
        exporter: Box<dyn PathExporter>,
    ) -> Self {
        let registry = GitHubRegistry::new(
            &settings.registry_url,
            &settings.repository,
            settings.listing,
        );
        let installer = Installer::new(
            Arc::new(HttpDownloader::new()),
            ToolCache::new(&settings.cache_dir),
            target,
            &settings.release_download_base(),
            &settings.temp_dir,
        );

        Self::new(
            VersionResolver::new(Arc::new(registry)),
            installer,
            exporter,
        )
    }

    /// Install the release matching `specifier` and export its `bin/` directory
    ///
    /// Nothing is exported unless every step succeeds.
    pub async fn run(&self, specifier: &str, token: &str) -> Result<Acquisition, SetupError> {
        let version = self.resolver.resolve(specifier, token).await?;
        let acquisition = self.installer.acquire(&version).await?;

        self.exporter.export(&acquisition.bin_dir())?;
        info!("Successfully setup Task version {}", version);

        Ok(acquisition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::install::download::{DownloadError, MockDownloader};
    use crate::install::path::MockPathExporter;
    use crate::version::registry::MockRegistry;
    use tempfile::TempDir;

    #[tokio::test]
    async fn run_exports_nothing_when_acquisition_fails() {
        let dirs = TempDir::new().unwrap();
        let mut registry = MockRegistry::new();
        registry
            .expect_list_releases()
            .returning(|_| Ok(vec!["v3.43.2".to_string()]));
        let mut downloader = MockDownloader::new();
        downloader.expect_download().returning(|url, _| {
            Err(DownloadError::Status {
                url: url.to_string(),
                status: reqwest::StatusCode::BAD_GATEWAY,
            })
        });
        let mut exporter = MockPathExporter::new();
        exporter.expect_export().times(0);

        let setup = TaskSetup::new(
            VersionResolver::new(Arc::new(registry)),
            Installer::new(
                Arc::new(downloader),
                ToolCache::new(dirs.path().join("cache")),
                HostTarget::new("linux", "x86_64"),
                "https://example.invalid/releases/download",
                dirs.path().join("tmp"),
            ),
            Box::new(exporter),
        );

        let result = setup.run("3.x", "").await;

        assert!(matches!(result, Err(SetupError::Download { .. })));
    }

    #[tokio::test]
    async fn run_exports_nothing_when_resolution_fails() {
        let dirs = TempDir::new().unwrap();
        let mut registry = MockRegistry::new();
        registry
            .expect_list_releases()
            .returning(|_| Ok(vec!["v3.43.2".to_string()]));
        let mut downloader = MockDownloader::new();
        downloader.expect_download().times(0);
        let mut exporter = MockPathExporter::new();
        exporter.expect_export().times(0);

        let setup = TaskSetup::new(
            VersionResolver::new(Arc::new(registry)),
            Installer::new(
                Arc::new(downloader),
                ToolCache::new(dirs.path().join("cache")),
                HostTarget::new("linux", "x86_64"),
                "https://example.invalid/releases/download",
                dirs.path().join("tmp"),
            ),
            Box::new(exporter),
        );

        let result = setup.run("9", "").await;

        assert_eq!(
            result.unwrap_err().to_string(),
            "unable to find a matching version for '9'"
        );
    }
}
