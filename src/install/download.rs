//! Release archive download
//!
//! A single GET per archive, streamed to disk. Failures are reported once
//! and never retried.

use std::path::Path;

use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::config::USER_AGENT;

/// Trait for downloading a release asset to a local file
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Downloader: Send + Sync {
    /// Download `url` into the file at `dest`, creating or truncating it.
    async fn download(&self, url: &str, dest: &Path) -> Result<(), DownloadError>;
}

/// Errors arising from archive downloads.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected status {status} from {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("I/O error writing download: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP downloader using `reqwest`
pub struct HttpDownloader {
    client: reqwest::Client,
}

impl HttpDownloader {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .build()
                .expect("Failed to create HTTP client"),
        }
    }
}

impl Default for HttpDownloader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Downloader for HttpDownloader {
    async fn download(&self, url: &str, dest: &Path) -> Result<(), DownloadError> {
        let network = |source| DownloadError::Network {
            url: url.to_string(),
            source,
        };

        debug!("Downloading {} to {:?}", url, dest);
        let mut response = self.client.get(url).send().await.map_err(network)?;

        let status = response.status();
        if !status.is_success() {
            warn!("Download returned status {}: {}", status, url);
            return Err(DownloadError::Status {
                url: url.to_string(),
                status,
            });
        }

        let mut file = tokio::fs::File::create(dest).await?;
        let mut written = 0usize;
        while let Some(chunk) = response.chunk().await.map_err(network)? {
            file.write_all(&chunk).await?;
            written += chunk.len();
        }
        file.flush().await?;

        debug!("Downloaded {} bytes from {}", written, url);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[tokio::test]
    async fn download_writes_body_to_destination() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/v3.43.2/task_linux_amd64.tar.gz")
            .with_status(200)
            .with_body(b"archive-bytes")
            .create_async()
            .await;
        let temp_dir = tempfile::tempdir().unwrap();
        let dest = temp_dir.path().join("task.tar.gz");

        let url = format!("{}/v3.43.2/task_linux_amd64.tar.gz", server.url());
        HttpDownloader::new().download(&url, &dest).await.unwrap();

        mock.assert_async().await;
        assert_eq!(std::fs::read(&dest).unwrap(), b"archive-bytes");
    }

    #[tokio::test]
    async fn download_reports_http_status_failures() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/v9.9.9/task_linux_amd64.tar.gz")
            .with_status(404)
            .create_async()
            .await;
        let temp_dir = tempfile::tempdir().unwrap();
        let dest = temp_dir.path().join("task.tar.gz");

        let url = format!("{}/v9.9.9/task_linux_amd64.tar.gz", server.url());
        let result = HttpDownloader::new().download(&url, &dest).await;

        mock.assert_async().await;
        assert!(matches!(
            result,
            Err(DownloadError::Status { status, .. }) if status == reqwest::StatusCode::NOT_FOUND
        ));
        assert!(!dest.exists());
    }
}
