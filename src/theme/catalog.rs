//! Candidate artifact enumeration across the `generated` and `user` tiers.
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::operations::FileSystemOps;

/// Artifact tiers in scan order; later tiers replace earlier entries.
pub const TIERS: [&str; 2] = ["generated", "user"];

/// Filename to absolute artifact path for one application.
///
/// Holds at most one path per filename. Iteration is in filename order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactCatalog {
    entries: BTreeMap<String, PathBuf>,
}

impl ArtifactCatalog {
    /// Scan `app_dir/generated` then `app_dir/user`.
    ///
    /// Missing tier directories are skipped. Subdirectories and names that
    /// are not valid UTF-8 are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if `app_dir` is not a directory and
    /// [`ConfigError::Io`] if a tier directory cannot be listed.
    pub fn build(fs: &dyn FileSystemOps, app_dir: &Path) -> Result<Self, ConfigError> {
        if !fs.is_dir(app_dir) {
            return Err(ConfigError::NotFound {
                what: "app directory".to_string(),
                path: app_dir.to_path_buf(),
            });
        }

        let mut entries = BTreeMap::new();
        for tier in TIERS {
            let tier_dir = app_dir.join(tier);
            if !fs.is_dir(&tier_dir) {
                continue;
            }
            let children = fs.read_dir(&tier_dir).map_err(|e| ConfigError::Io {
                path: tier_dir.clone(),
                source: std::io::Error::other(format!("{e:#}")),
            })?;
            for path in children {
                if fs.is_dir(&path) {
                    continue;
                }
                let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                    tracing::debug!("skipping non UTF-8 artifact name: {}", path.display());
                    continue;
                };
                entries.insert(name.to_string(), path.clone());
            }
        }

        Ok(Self { entries })
    }

    /// Build a catalog from explicit entries.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = (String, PathBuf)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Path recorded for `filename`.
    #[must_use]
    pub fn get(&self, filename: &str) -> Option<&Path> {
        self.entries.get(filename).map(PathBuf::as_path)
    }

    /// `(filename, path)` pairs in filename order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.entries
            .iter()
            .map(|(name, path)| (name.as_str(), path.as_path()))
    }

    /// Number of artifacts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the app has no artifacts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
