//! Registry trait for listing published release tags

#[cfg(test)]
use mockall::automock;

use crate::version::error::RegistryError;

/// Trait for listing the release tags of the tool
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Registry: Send + Sync {
    /// Fetches every published release tag
    ///
    /// # Arguments
    /// * `token` - Access token sent as a bearer credential; empty means anonymous
    ///
    /// # Returns
    /// * `Ok(Vec<String>)` - Raw tags (e.g. "v3.37.1") in the order the registry returned them
    /// * `Err(RegistryError)` - If the request fails or the body cannot be decoded
    async fn list_releases(&self, token: &str) -> Result<Vec<String>, RegistryError>;
}
