//! Install a released build of [Task](https://taskfile.dev) for the current run.
//!
//! The crate resolves a loose version specifier ("3.x", "3.37", "v3.37.1")
//! against the published releases, reuses or fills an on-disk tool cache,
//! and exposes the cached `bin/` directory on the host search path.

pub mod config;
pub mod error;
pub mod install;
pub mod logging;
pub mod setup;
pub mod version;
