//! Domain-specific error types for the theme engine.
//!
//! Internal modules return typed errors (e.g., [`ConfigError`], [`LinkError`])
//! while command handlers at the CLI boundary convert them to
//! [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! AutoconfError
//! ├── Config(ConfigError)    : config dir layout, registry parsing, target form
//! ├── Resolve(ResolveError)  : artifact filename parsing
//! ├── Link(LinkError)        : per-operation link failures
//! └── Render(RenderError)    : template rendering
//! ```
//!
//! Only [`ConfigError::NotFound`] at setup time aborts a run. Everything else
//! is collected per application and operation and shown in the final report.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the theme engine.
#[derive(Error, Debug)]
pub enum AutoconfError {
    /// Configuration-related error (layout, registry, target form).
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Artifact name resolution error.
    #[error("Resolution error: {0}")]
    Resolve(#[from] ResolveError),

    /// Link operation error.
    #[error("Link error: {0}")]
    Link(#[from] LinkError),

    /// Template rendering error.
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

/// Errors that arise from loading the config directory and registry.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required directory or file is absent.
    #[error("{what} not found: {}", path.display())]
    NotFound {
        /// Short description of the missing item (e.g. `"app directory"`).
        what: String,
        /// Path that was expected to exist.
        path: PathBuf,
    },

    /// The registry file is not valid TOML or has the wrong shape.
    #[error("Invalid TOML syntax in {file}: {message}")]
    InvalidSyntax {
        /// File that failed to parse.
        file: String,
        /// Parser message.
        message: String,
    },

    /// An I/O error occurred while reading configuration.
    #[error("IO error reading {}: {source}", path.display())]
    Io {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// An application's link target form is ambiguous or absent.
    #[error("App '{app}' incorrectly configured: {reason}")]
    ConfigConflict {
        /// Application name.
        app: String,
        /// Which rule was violated.
        reason: String,
    },
}

/// Errors that arise while interpreting artifact filenames.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The filename does not split into `<theme_prefix>.<logical_name>`.
    #[error("Filename '{name}' incorrectly formatted, ignoring")]
    MalformedName {
        /// Offending filename.
        name: String,
    },
}

/// Per-operation link failures.
///
/// These never abort a run; the executor records them next to the operation
/// that produced them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    /// The resolved artifact does not exist on disk.
    #[error("artifact '{}' doesn't exist", path.display())]
    MissingArtifact {
        /// Artifact path.
        path: PathBuf,
    },

    /// The directory that should hold the link does not exist.
    #[error("parent directory of '{}' doesn't exist", path.display())]
    MissingTargetParent {
        /// Link path whose parent is missing.
        path: PathBuf,
    },

    /// A real file or directory occupies the link location.
    #[error("'{}' exists and isn't a symlink, NOT overwriting; remove it manually", path.display())]
    ForeignFileConflict {
        /// Occupied link path.
        path: PathBuf,
    },

    /// Removing or creating the link failed at the OS level.
    #[error("failed to link '{}': {message}", path.display())]
    Io {
        /// Link path.
        path: PathBuf,
        /// Formatted underlying error chain.
        message: String,
    },
}

/// Errors that arise while rendering templates into artifacts.
#[derive(Error, Debug)]
pub enum RenderError {
    /// A template entry references a colour path absent from the palette.
    #[error("color '{color}' for key '{key}' not found in palette")]
    MissingColor {
        /// Config key from the template.
        key: String,
        /// Dotted colour path that did not resolve.
        color: String,
    },

    /// A template is not a flat table of string values.
    #[error("invalid template {}: {message}", path.display())]
    InvalidTemplate {
        /// Template path.
        path: PathBuf,
        /// What was wrong with it.
        message: String,
    },
}
