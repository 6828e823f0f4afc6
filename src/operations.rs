//! Filesystem query abstractions for dependency injection.
//!
//! Provides the [`FileSystemOps`] trait so that artifact and script discovery
//! can be unit-tested without touching the real filesystem.  Production code
//! uses [`SystemFileSystemOps`]; tests use `MockFileSystemOps`.

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Read-only filesystem queries used while enumerating artifacts and scripts.
pub trait FileSystemOps: std::fmt::Debug {
    /// Returns `true` if `path` is a directory (following symlinks).
    fn is_dir(&self, path: &Path) -> bool;

    /// Returns the immediate child paths inside `path`, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` cannot be opened or read as a directory.
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;
}

/// Production [`FileSystemOps`] implementation that delegates to [`std::fs`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemFileSystemOps;

impl FileSystemOps for SystemFileSystemOps {
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let mut entries = std::fs::read_dir(path)?
            .map(|e| e.map(|entry| entry.path()).map_err(Into::into))
            .collect::<Result<Vec<_>>>()?;
        entries.sort();
        Ok(entries)
    }
}

/// Mock [`FileSystemOps`] for unit tests.
///
/// ```ignore
/// let fs = MockFileSystemOps::new().with_dir_entries(
///     "/cfg/apps/kitty/generated",
///     vec![PathBuf::from("/cfg/apps/kitty/generated/any-any.theme.conf")],
/// );
/// ```
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockFileSystemOps {
    dirs: std::collections::HashMap<PathBuf, Vec<PathBuf>>,
}

#[cfg(test)]
impl MockFileSystemOps {
    /// Create an empty mock with nothing configured.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `dir` as a directory listing `entries`.
    #[must_use]
    pub fn with_dir_entries(mut self, dir: impl Into<PathBuf>, entries: Vec<PathBuf>) -> Self {
        self.dirs.insert(dir.into(), entries);
        self
    }
}

#[cfg(test)]
impl FileSystemOps for MockFileSystemOps {
    fn is_dir(&self, path: &Path) -> bool {
        self.dirs.contains_key(path)
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        self.dirs
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("mock: no entries configured for {}", path.display()))
    }
}
