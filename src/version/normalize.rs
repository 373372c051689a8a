use std::cmp::Ordering;

use semver::Version;

/// Informal pre-release markers that Task tags have used over time
const PRERELEASE_KEYWORDS: [&str; 3] = ["beta", "rc", "preview"];

/// Normalize a loose version (without the leading `v`) into strict semver text.
///
/// Missing components are padded with zeros and informal pre-release suffixes
/// are rewritten into semver pre-release notation.
///
/// Examples:
/// - "3" -> "3.0.0"
/// - "3.37" -> "3.37.0"
/// - "1.10beta1" -> "1.10.0-beta1"
/// - "1.8.5rc1" -> "1.8.5-rc1"
/// - "3.37.1" -> "3.37.1"
pub fn normalize_version(version: &str) -> String {
    let mut parts: Vec<String> = version.split('.').map(str::to_string).collect();

    let Some(minor) = parts.get(1) else {
        return format!("{version}.0.0");
    };
    if has_prerelease_keyword(minor) {
        let rewritten = insert_before_keywords(minor, ".0-");
        parts[1] = rewritten;
        return parts.join(".");
    }

    let Some(patch) = parts.get(2) else {
        return format!("{version}.0");
    };
    if has_prerelease_keyword(patch) {
        let rewritten = insert_before_keywords(patch, "-");
        parts[2] = rewritten;
        return parts.join(".");
    }

    version.to_string()
}

/// Returns true when `version` is already a complete, valid semantic version
pub fn is_exact_semver(version: &str) -> bool {
    Version::parse(version).is_ok()
}

/// Descending semver precedence, for use with `sort_by`
pub fn compare_desc(a: &Version, b: &Version) -> Ordering {
    b.cmp(a)
}

fn has_prerelease_keyword(part: &str) -> bool {
    PRERELEASE_KEYWORDS.iter().any(|kw| part.contains(kw))
}

fn insert_before_keywords(part: &str, marker: &str) -> String {
    PRERELEASE_KEYWORDS
        .iter()
        .fold(part.to_string(), |acc, kw| {
            acc.replacen(kw, &format!("{marker}{kw}"), 1)
        })
}
