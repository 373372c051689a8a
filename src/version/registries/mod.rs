//! Registry implementations for listing release tags

pub mod github;

pub use github::{GitHubRegistry, ReleaseListing};
