//! Theme requests and artifact resolution.
//!
//! An application's artifacts are named `<palette>-<scheme>.<logical_name>`
//! and live in the `generated` and `user` tiers of its app directory. The
//! [`catalog`] lists them, the [`matcher`] picks the most specific file per
//! logical name for a [`ResolvedTheme`].

pub mod catalog;
pub mod matcher;
pub mod request;

pub use catalog::ArtifactCatalog;
pub use matcher::{Resolution, ResolvedMap, resolve};
pub use request::{ResolvedTheme, SchemeDetector, Selector, ThemeRequest, WildcardDetector};
