//! Installation layer
//!
//! Fetches a resolved release and makes its executable reachable.
//!
//! # Modules
//!
//! - [`platform`]: Host detection and release asset naming
//! - [`download`]: Archive download over HTTP
//! - [`extract`]: Zip / tar.gz extraction and `bin/` layout
//! - [`cache`]: On-disk tool cache keyed by tool, version and architecture
//! - [`pipeline`]: Cache-or-fetch acquisition
//! - [`path`]: Search path export

pub mod cache;
pub mod download;
pub mod extract;
pub mod path;
pub mod pipeline;
pub mod platform;
