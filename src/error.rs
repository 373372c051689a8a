//! Top-level error type surfaced to the host

use thiserror::Error;

use crate::install::cache::CacheError;
use crate::install::download::DownloadError;
use crate::install::extract::ExtractionError;
use crate::version::error::RegistryError;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("failed to list releases: {0}")]
    Registry(#[from] RegistryError),

    #[error("unable to find a matching version for '{specifier}'")]
    Resolution { specifier: String },

    #[error("failed to download version {version}: {source}")]
    Download {
        version: String,
        #[source]
        source: DownloadError,
    },

    #[error("failed to extract archive: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("tool cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("failed to export {path} to PATH: {source}")]
    PathExport {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
