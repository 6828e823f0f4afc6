//! Specificity-ranked selection of one artifact per logical config name.
use std::path::{Path, PathBuf};

use super::catalog::ArtifactCatalog;
use super::request::ResolvedTheme;
use crate::error::ResolveError;

/// Logical name to artifact path, in first-insertion order.
///
/// Overwriting an existing name keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedMap {
    entries: Vec<(String, PathBuf)>,
}

impl ResolvedMap {
    /// Insert or overwrite `logical`.
    pub fn insert(&mut self, logical: &str, path: &Path) {
        if let Some(entry) = self.entries.iter_mut().find(|(name, _)| name == logical) {
            entry.1 = path.to_path_buf();
        } else {
            self.entries.push((logical.to_string(), path.to_path_buf()));
        }
    }

    /// Artifact chosen for `logical`.
    #[must_use]
    pub fn get(&self, logical: &str) -> Option<&Path> {
        self.entries
            .iter()
            .find(|(name, _)| name == logical)
            .map(|(_, path)| path.as_path())
    }

    /// Logical names and artifacts in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.entries
            .iter()
            .map(|(name, path)| (name.as_str(), path.as_path()))
    }

    /// Number of resolved logical names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Outcome of matching a catalog against a theme.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Winning artifact per logical name.
    pub resolved: ResolvedMap,
    /// Filenames skipped because they have no `<prefix>.<logical>` shape.
    pub malformed: Vec<ResolveError>,
}

/// Split an artifact filename into `(theme_prefix, logical_name)` at the
/// first dot.
///
/// # Errors
///
/// Returns [`ResolveError::MalformedName`] if there is no dot or either
/// side of it is empty.
pub fn parse_candidate(filename: &str) -> Result<(&str, &str), ResolveError> {
    match filename.split_once('.') {
        Some((prefix, logical)) if !prefix.is_empty() && !logical.is_empty() => {
            Ok((prefix, logical))
        }
        _ => Err(ResolveError::MalformedName {
            name: filename.to_string(),
        }),
    }
}

/// Pick the most specific artifact for every logical name in `catalog`.
///
/// Rungs of [`ResolvedTheme::ladder`] are visited from least to most
/// specific and each matching candidate overwrites the previous choice, so
/// the last rung with a match wins. Logical names without any match are
/// absent from the result.
#[must_use]
pub fn resolve(catalog: &ArtifactCatalog, theme: &ResolvedTheme) -> Resolution {
    let mut malformed = Vec::new();
    let candidates: Vec<(&str, &str, &Path)> = catalog
        .iter()
        .filter_map(|(filename, path)| match parse_candidate(filename) {
            Ok((prefix, logical)) => Some((prefix, logical, path)),
            Err(e) => {
                tracing::debug!("{e}");
                malformed.push(e);
                None
            }
        })
        .collect();

    let mut resolved = ResolvedMap::default();
    for rung in theme.ladder() {
        for &(prefix, logical, path) in &candidates {
            if prefix == rung {
                resolved.insert(logical, path);
            }
        }
    }

    tracing::debug!(
        "resolved {} of {} candidate(s) for {theme}",
        resolved.len(),
        candidates.len()
    );

    Resolution {
        resolved,
        malformed,
    }
}
