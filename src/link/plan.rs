//! Turning a resolved map into link operations.
use std::fmt;
use std::path::PathBuf;

use crate::config::registry::{AppSettings, LinkTarget};
use crate::error::ConfigError;
use crate::theme::ResolvedMap;

/// Prefix used for link names of apps with `external_theme`.
pub const EXTERNAL_THEME_PREFIX: &str = "current-";

/// One link to reconcile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkOperation {
    /// Real config location; this is where the symlink lives.
    pub from_path: PathBuf,
    /// Artifact the symlink must point at.
    pub to_path: PathBuf,
}

impl LinkOperation {
    /// Link `from_path` to the artifact at `to_path`.
    #[must_use]
    pub fn new(from_path: impl Into<PathBuf>, to_path: impl Into<PathBuf>) -> Self {
        Self {
            from_path: from_path.into(),
            to_path: to_path.into(),
        }
    }
}

impl fmt::Display for LinkOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}",
            self.from_path.display(),
            self.to_path.display()
        )
    }
}

/// Plan the links for `app` from its registry settings.
///
/// # Errors
///
/// Returns [`ConfigError::ConfigConflict`] when the settings do not name
/// exactly one of `config_dir` and `config_map`; no operations are produced.
pub fn plan(
    app: &str,
    resolved: &ResolvedMap,
    settings: &AppSettings,
) -> Result<Vec<LinkOperation>, ConfigError> {
    let target = settings.link_target(app)?;
    Ok(plan_for_target(resolved, &target))
}

/// Plan the links for an already validated target form.
///
/// Operations follow the order of `resolved`. With a map target only
/// logical names present in the map produce an operation.
#[must_use]
pub fn plan_for_target(resolved: &ResolvedMap, target: &LinkTarget) -> Vec<LinkOperation> {
    resolved
        .iter()
        .filter_map(|(logical, artifact)| {
            let from = match target {
                LinkTarget::Directory {
                    dir,
                    external_theme: false,
                } => dir.join(logical),
                LinkTarget::Directory {
                    dir,
                    external_theme: true,
                } => dir.join(format!("{EXTERNAL_THEME_PREFIX}{logical}")),
                LinkTarget::Map(map) => map.get(logical)?.clone(),
            };
            Some(LinkOperation::new(from, artifact))
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::path::Path;

    fn resolved() -> ResolvedMap {
        let mut map = ResolvedMap::default();
        map.insert("kitty.conf", Path::new("/cfg/apps/kitty/user/nord-dark.kitty.conf"));
        map.insert("theme.conf", Path::new("/cfg/apps/kitty/generated/nord-dark.theme.conf"));
        map
    }

    #[test]
    fn directory_form_links_every_logical_name() {
        let target = LinkTarget::Directory {
            dir: PathBuf::from("/home/u/.config/kitty"),
            external_theme: false,
        };
        let ops = plan_for_target(&resolved(), &target);
        assert_eq!(
            ops,
            vec![
                LinkOperation::new(
                    "/home/u/.config/kitty/kitty.conf",
                    "/cfg/apps/kitty/user/nord-dark.kitty.conf"
                ),
                LinkOperation::new(
                    "/home/u/.config/kitty/theme.conf",
                    "/cfg/apps/kitty/generated/nord-dark.theme.conf"
                ),
            ]
        );
    }

    #[test]
    fn external_theme_uses_current_prefix() {
        let target = LinkTarget::Directory {
            dir: PathBuf::from("/k"),
            external_theme: true,
        };
        let ops = plan_for_target(&resolved(), &target);
        assert_eq!(ops[0].from_path, PathBuf::from("/k/current-kitty.conf"));
        assert_eq!(ops[1].from_path, PathBuf::from("/k/current-theme.conf"));
    }

    #[test]
    fn map_form_only_links_listed_names() {
        let target = LinkTarget::Map(BTreeMap::from([(
            "theme.conf".to_string(),
            PathBuf::from("/etc/theme.conf"),
        )]));
        let ops = plan_for_target(&resolved(), &target);
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].from_path, PathBuf::from("/etc/theme.conf"));
    }

    #[test]
    fn conflicting_settings_produce_no_operations() {
        let settings = AppSettings {
            config_dir: Some("/a".to_string()),
            config_map: Some(BTreeMap::new()),
            ..AppSettings::default()
        };
        let err = plan("kitty", &resolved(), &settings).unwrap_err();
        assert!(matches!(err, ConfigError::ConfigConflict { .. }));
    }

    #[test]
    fn empty_resolution_plans_nothing() {
        let settings = AppSettings {
            config_dir: Some("/a".to_string()),
            ..AppSettings::default()
        };
        assert!(plan("kitty", &ResolvedMap::default(), &settings).unwrap().is_empty());
    }
}
