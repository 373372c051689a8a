//! Host platform detection and release asset naming
//!
//! Task publishes one archive per platform, named
//! `task_<platform>_<arch>.<ext>` with Go-style platform and architecture
//! identifiers.

use crate::config::TOOL_NAME;

/// Archive formats used by Task releases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    TarGz,
}

impl ArchiveFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ArchiveFormat::Zip => "zip",
            ArchiveFormat::TarGz => "tar.gz",
        }
    }
}

/// Operating system and processor architecture of the running host
///
/// Detected once at startup and passed explicitly to everything that needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostTarget {
    /// Rust OS identifier (`linux`, `macos`, `windows`, ...)
    pub os: String,
    /// Rust architecture identifier (`x86_64`, `aarch64`, ...)
    pub arch: String,
}

impl HostTarget {
    pub fn new(os: &str, arch: &str) -> Self {
        Self {
            os: os.to_string(),
            arch: arch.to_string(),
        }
    }

    /// The target this binary was compiled for
    pub fn detect() -> Self {
        Self::new(std::env::consts::OS, std::env::consts::ARCH)
    }

    pub fn is_windows(&self) -> bool {
        self.os == "windows"
    }

    pub fn archive_format(&self) -> ArchiveFormat {
        if self.is_windows() {
            ArchiveFormat::Zip
        } else {
            ArchiveFormat::TarGz
        }
    }

    /// Release asset name for this host, e.g. `task_linux_amd64.tar.gz`
    pub fn archive_filename(&self) -> String {
        build_filename(&self.os, &self.arch)
    }

    /// Name of the executable inside the archive
    pub fn executable_name(&self) -> String {
        if self.is_windows() {
            format!("{TOOL_NAME}.exe")
        } else {
            TOOL_NAME.to_string()
        }
    }
}

/// Build the release asset name for an OS / architecture pair.
///
/// Unknown identifiers pass through unchanged.
pub fn build_filename(os: &str, arch: &str) -> String {
    let platform = release_platform(os);
    let arch = release_arch(arch);
    let ext = if os == "windows" {
        ArchiveFormat::Zip
    } else {
        ArchiveFormat::TarGz
    }
    .extension();

    format!("{TOOL_NAME}_{platform}_{arch}.{ext}")
}

fn release_platform(os: &str) -> &str {
    match os {
        "windows" => "windows",
        "macos" => "darwin",
        other => other,
    }
}

fn release_arch(arch: &str) -> &str {
    match arch {
        "arm" => "arm",
        "aarch64" => "arm64",
        "x86_64" => "amd64",
        "x86" => "386",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("windows", "x86_64", "task_windows_amd64.zip")]
    #[case("windows", "x86", "task_windows_386.zip")]
    #[case("linux", "x86_64", "task_linux_amd64.tar.gz")]
    #[case("linux", "arm", "task_linux_arm.tar.gz")]
    #[case("linux", "aarch64", "task_linux_arm64.tar.gz")]
    #[case("macos", "aarch64", "task_darwin_arm64.tar.gz")]
    #[case("macos", "x86_64", "task_darwin_amd64.tar.gz")]
    #[case("freebsd", "riscv64", "task_freebsd_riscv64.tar.gz")] // unknown values pass through
    fn build_filename_follows_release_convention(
        #[case] os: &str,
        #[case] arch: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(build_filename(os, arch), expected);
    }

    #[test]
    fn windows_host_uses_zip_and_exe() {
        let target = HostTarget::new("windows", "x86_64");

        assert_eq!(target.archive_format(), ArchiveFormat::Zip);
        assert_eq!(target.executable_name(), "task.exe");
        assert_eq!(target.archive_filename(), "task_windows_amd64.zip");
    }

    #[test]
    fn unix_host_uses_tarball_and_bare_executable() {
        let target = HostTarget::new("linux", "aarch64");

        assert_eq!(target.archive_format(), ArchiveFormat::TarGz);
        assert_eq!(target.executable_name(), "task");
    }

    #[test]
    fn detect_matches_compile_target() {
        let target = HostTarget::detect();

        assert_eq!(target.os, std::env::consts::OS);
        assert_eq!(target.arch, std::env::consts::ARCH);
    }
}
