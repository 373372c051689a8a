//! Version resolution layer
//!
//! Turns a user supplied version specifier into a single released version.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Registry   │────▶│  Resolver   │────▶│  Resolved   │
//! │ (list tags) │     │(filter/sort)│     │  Version    │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │                   │
//!        ▼                   ▼
//! ┌─────────────┐     ┌─────────────┐
//! │ Registries  │     │  Normalize  │
//! │  (GitHub)   │     │  (semver)   │
//! └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`error`]: Error types for registry access
//! - [`normalize`]: Loose version normalization and semver ordering
//! - [`registry`]: Registry trait for listing release tags
//! - [`registries`]: Concrete registry implementations
//! - [`resolver`]: Specifier to release resolution

pub mod error;
pub mod normalize;
pub mod registries;
pub mod registry;
pub mod resolver;
