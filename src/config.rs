use serde::Deserialize;
use std::path::PathBuf;

use crate::version::registries::ReleaseListing;

/// Name of the installed tool, used for cache keys and the executable name
pub const TOOL_NAME: &str = "task";

/// User agent sent with every HTTP request
pub const USER_AGENT: &str = "setup-task";

/// Default base URL for the GitHub API
pub const DEFAULT_REGISTRY_URL: &str = "https://api.github.com";

/// Default base URL for release asset downloads
pub const DEFAULT_DOWNLOAD_URL: &str = "https://github.com";

/// Repository publishing the tool releases
pub const DEFAULT_REPOSITORY: &str = "go-task/task";

/// Installer configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Base URL of the release registry API
    pub registry_url: String,
    /// Base URL that release archives are downloaded from
    pub download_url: String,
    /// `owner/name` of the repository publishing releases
    pub repository: String,
    /// Shape of the registry listing endpoint
    pub listing: ReleaseListing,
    /// Root directory of the tool cache
    pub cache_dir: PathBuf,
    /// Scratch directory for downloads and extraction
    pub temp_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            download_url: DEFAULT_DOWNLOAD_URL.to_string(),
            repository: DEFAULT_REPOSITORY.to_string(),
            listing: ReleaseListing::default(),
            cache_dir: cache_dir(),
            temp_dir: temp_dir(),
        }
    }
}

impl Settings {
    /// Base URL for the release assets of the configured repository
    pub fn release_download_base(&self) -> String {
        format!(
            "{}/{}/releases/download",
            self.download_url.trim_end_matches('/'),
            self.repository
        )
    }
}

/// Returns the root of the tool cache.
/// Uses $RUNNER_TOOL_CACHE when running under GitHub Actions,
/// otherwise $XDG_CACHE_HOME/setup-task/tools, then ~/.cache/setup-task/tools,
/// or ./setup-task/tools if none are available.
pub fn cache_dir() -> PathBuf {
    cache_dir_with_env(
        std::env::var("RUNNER_TOOL_CACHE").ok(),
        std::env::var("XDG_CACHE_HOME").ok(),
        dirs::home_dir(),
    )
}

/// Returns the scratch directory for downloads.
/// Uses $RUNNER_TEMP when set, otherwise the system temp directory.
pub fn temp_dir() -> PathBuf {
    std::env::var("RUNNER_TEMP")
        .ok()
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir)
}

fn cache_dir_with_env(
    runner_tool_cache: Option<String>,
    xdg_cache_home: Option<String>,
    home_dir: Option<PathBuf>,
) -> PathBuf {
    if let Some(dir) = runner_tool_cache.filter(|dir| !dir.is_empty()) {
        return PathBuf::from(dir);
    }

    let cache_home = xdg_cache_home
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".cache")))
        .unwrap_or_else(|| PathBuf::from("."));

    cache_home.join("setup-task").join("tools")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn settings_from_partial_object_uses_defaults_for_missing_fields() {
        let result = serde_json::from_value::<Settings>(json!({
            "registryUrl": "http://localhost:8080",
            "listing": "tagRefs"
        }))
        .unwrap();

        assert_eq!(result.registry_url, "http://localhost:8080");
        assert_eq!(result.listing, ReleaseListing::TagRefs);
        assert_eq!(result.download_url, DEFAULT_DOWNLOAD_URL);
        assert_eq!(result.repository, DEFAULT_REPOSITORY);
    }

    #[test]
    fn release_download_base_joins_repository() {
        let settings = Settings {
            download_url: "https://github.com/".to_string(),
            ..Settings::default()
        };

        assert_eq!(
            settings.release_download_base(),
            "https://github.com/go-task/task/releases/download"
        );
    }

    #[test]
    fn cache_dir_with_env_prefers_runner_tool_cache() {
        let path = cache_dir_with_env(
            Some("/opt/hostedtoolcache".to_string()),
            Some("/tmp/xdg".to_string()),
            Some(PathBuf::from("/home/user")),
        );

        assert_eq!(path, PathBuf::from("/opt/hostedtoolcache"));
    }

    #[test]
    fn cache_dir_with_env_uses_xdg_cache_home_when_set() {
        let path = cache_dir_with_env(
            None,
            Some("/tmp/xdg".to_string()),
            Some(PathBuf::from("/home/user")),
        );

        assert_eq!(path, PathBuf::from("/tmp/xdg/setup-task/tools"));
    }

    #[test]
    fn cache_dir_with_env_falls_back_to_home_cache() {
        let path = cache_dir_with_env(None, None, Some(PathBuf::from("/home/user")));

        assert_eq!(path, PathBuf::from("/home/user/.cache/setup-task/tools"));
    }

    #[test]
    fn cache_dir_with_env_ignores_empty_values() {
        let path = cache_dir_with_env(Some(String::new()), Some(String::new()), None);

        assert_eq!(path, PathBuf::from("./setup-task/tools"));
    }
}
