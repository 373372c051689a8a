//! GitHub API registry implementation
//!
//! Two response shapes are supported: the Releases API (`tag_name` objects)
//! and the older git refs API (`ref: "refs/tags/v..."` objects).

use regex::Regex;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::{DEFAULT_REGISTRY_URL, DEFAULT_REPOSITORY, USER_AGENT};
use crate::version::error::RegistryError;
use crate::version::registry::Registry;

/// Number of entries requested per page from the GitHub API
const PER_PAGE: u32 = 100;

/// Response element from the Releases API
#[derive(Debug, Deserialize)]
struct Release {
    tag_name: String,
}

/// Response element from the git refs API
#[derive(Debug, Deserialize)]
struct TagRef {
    #[serde(rename = "ref")]
    reference: String,
}

/// Shape of the listing endpoint and how its body is decoded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReleaseListing {
    /// `GET /repos/{repo}/releases`, one object per release with `tag_name`
    #[default]
    Releases,
    /// `GET /repos/{repo}/git/refs/tags`, one object per tag with `ref`
    TagRefs,
}

impl ReleaseListing {
    fn endpoint(&self) -> &'static str {
        match self {
            ReleaseListing::Releases => "releases",
            ReleaseListing::TagRefs => "git/refs/tags",
        }
    }
}

/// Registry implementation backed by the GitHub REST API
pub struct GitHubRegistry {
    client: reqwest::Client,
    base_url: String,
    repository: String,
    listing: ReleaseListing,
    /// Matches version-like tag references such as `refs/tags/v3.37.1`
    tag_ref_re: Regex,
}

impl GitHubRegistry {
    /// Creates a new GitHubRegistry against a custom base URL and repository
    pub fn new(base_url: &str, repository: &str, listing: ReleaseListing) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            repository: repository.to_string(),
            listing,
            tag_ref_re: Regex::new(r"v\d+\.[\w.]+").unwrap(),
        }
    }

    fn listing_url(&self) -> String {
        format!(
            "{}/repos/{}/{}?per_page={}",
            self.base_url,
            self.repository,
            self.listing.endpoint(),
            PER_PAGE
        )
    }

    fn decode(&self, body: &[u8]) -> Result<Vec<String>, RegistryError> {
        let invalid = |e: serde_json::Error| {
            warn!("Failed to parse GitHub listing response: {}", e);
            RegistryError::InvalidResponse(e.to_string())
        };

        match self.listing {
            ReleaseListing::Releases => {
                let releases: Vec<Release> = serde_json::from_slice(body).map_err(invalid)?;
                Ok(releases.into_iter().map(|r| r.tag_name).collect())
            }
            ReleaseListing::TagRefs => {
                let refs: Vec<TagRef> = serde_json::from_slice(body).map_err(invalid)?;
                Ok(refs
                    .into_iter()
                    .filter(|r| self.tag_ref_re.is_match(&r.reference))
                    .map(|r| {
                        r.reference
                            .strip_prefix("refs/tags/")
                            .unwrap_or(&r.reference)
                            .to_string()
                    })
                    .collect())
            }
        }
    }
}

impl Default for GitHubRegistry {
    fn default() -> Self {
        Self::new(
            DEFAULT_REGISTRY_URL,
            DEFAULT_REPOSITORY,
            ReleaseListing::default(),
        )
    }
}

#[async_trait::async_trait]
impl Registry for GitHubRegistry {
    async fn list_releases(&self, token: &str) -> Result<Vec<String>, RegistryError> {
        let url = self.listing_url();
        debug!("Listing releases from {}", url);

        let mut request = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json");
        if !token.is_empty() {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(RegistryError::NotFound(self.repository.clone()));
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(RegistryError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if !status.is_success() {
            warn!("GitHub API returned status {}: {}", status, url);
            return Err(RegistryError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        let body = response.bytes().await?;
        let tags = self.decode(&body)?;
        debug!("Registry returned {} tags", tags.len());

        Ok(tags)
    }
}
