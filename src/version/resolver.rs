//! Version specifier resolver
//!
//! Resolves specifiers such as "3", "3.37", "3.x" or "v2.6" to the highest
//! published release whose tag starts with the given prefix. Exact semantic
//! versions are accepted as-is without asking the registry.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use semver::Version;
use tracing::debug;

use crate::error::SetupError;
use crate::version::normalize::{compare_desc, is_exact_semver, normalize_version};
use crate::version::registry::Registry;

/// A concrete, `v`-prefixed release tag such as `v3.43.2`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedVersion(String);

impl ResolvedVersion {
    /// Builds a resolved version from a tag without its `v` prefix
    pub fn from_bare(version: &str) -> Self {
        Self(format!("v{version}"))
    }

    /// The release tag, e.g. `v3.43.2`
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The tag without its `v` prefix, used for cache keys
    pub fn bare(&self) -> &str {
        self.0.strip_prefix('v').unwrap_or(&self.0)
    }
}

impl fmt::Display for ResolvedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolves user specifiers against the releases listed by a registry
pub struct VersionResolver {
    registry: Arc<dyn Registry>,
}

impl VersionResolver {
    pub fn new(registry: Arc<dyn Registry>) -> Self {
        Self { registry }
    }

    /// Resolve `specifier` to a single release
    ///
    /// # Arguments
    /// * `specifier` - Exact version, prefix ("3", "3.37") or wildcard ("3.x"), optionally `v`-prefixed
    /// * `token` - Registry access token, empty for anonymous access
    ///
    /// # Returns
    /// * `Ok(ResolvedVersion)` - The highest-precedence matching release
    /// * `Err(SetupError::Registry)` - If the release list could not be fetched
    /// * `Err(SetupError::Resolution)` - If no release matched
    pub async fn resolve(
        &self,
        specifier: &str,
        token: &str,
    ) -> Result<ResolvedVersion, SetupError> {
        let bare = specifier.strip_prefix('v').unwrap_or(specifier);
        if is_exact_semver(bare) {
            debug!("valid semver provided, skipping computing actual version");
            return Ok(ResolvedVersion::from_bare(bare));
        }

        let prefix = version_prefix(specifier);
        let tags = self.registry.list_releases(token).await?;

        let candidates: Vec<&str> = tags
            .iter()
            .map(|tag| tag.strip_prefix('v').unwrap_or(tag))
            .filter(|tag| tag.starts_with(prefix))
            .collect();

        select_highest(&candidates)
            .map(ResolvedVersion::from_bare)
            .ok_or_else(|| SetupError::Resolution {
                specifier: specifier.to_string(),
            })
    }
}

/// Strip an optional leading `v` and a trailing `.x` wildcard
fn version_prefix(specifier: &str) -> &str {
    let prefix = specifier.strip_prefix('v').unwrap_or(specifier);
    prefix.strip_suffix(".x").unwrap_or(prefix)
}

/// Pick the raw tag whose normalized form has the highest precedence
///
/// Tags normalizing to the same version collapse to the last one seen.
/// Tags that still fail to parse after normalization are skipped.
fn select_highest<'a>(candidates: &[&'a str]) -> Option<&'a str> {
    let by_normalized: HashMap<String, &str> = candidates
        .iter()
        .map(|raw| (normalize_version(raw), *raw))
        .collect();

    let mut ordered: Vec<(Version, &str)> = by_normalized
        .into_iter()
        .filter_map(|(normalized, raw)| match Version::parse(&normalized) {
            Ok(parsed) => Some((parsed, raw)),
            Err(e) => {
                debug!("skipping unparseable tag {}: {}", raw, e);
                None
            }
        })
        .collect();
    ordered.sort_by(|(a, _), (b, _)| compare_desc(a, b));

    debug!("evaluating {} versions", ordered.len());

    let (_, best) = ordered.first()?;
    debug!("matched: {}", best);

    Some(*best)
}
