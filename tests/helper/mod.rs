//! Shared fixtures for end-to-end setup tests

pub mod release;

#[allow(unused_imports)]
pub use release::{
    RELEASES_JSON, ReleaseServer, TAG_REFS_JSON, build_settings, tar_gz_with, zip_with,
};
