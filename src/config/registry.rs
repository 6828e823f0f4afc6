//! Application registry (`app_registry.toml`) loading.
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::{expand_path, toml_loader};
use crate::error::ConfigError;

/// Registry file name inside the config directory.
pub const REGISTRY_FILE: &str = "app_registry.toml";

/// Settings for one `[app.<name>]` table.
///
/// Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Directory whose entries are named after logical config names.
    pub config_dir: Option<String>,
    /// Explicit logical-name to link-path map.
    pub config_map: Option<BTreeMap<String, String>>,
    /// Link `current-<logical>` inside `config_dir` instead of `<logical>`.
    pub external_theme: bool,
    /// OS identifiers the app runs on; empty means all.
    pub supported_oses: Vec<String>,
    /// Shell command run once after the app's links are updated.
    pub refresh_cmd: Option<String>,
    /// Separator between key and value in rendered templates.
    pub separator: Option<String>,
}

/// Where an application's links live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    /// Links are `<dir>/<logical>` (or `<dir>/current-<logical>`).
    Directory {
        /// Absolute directory path.
        dir: PathBuf,
        /// Prefix link names with `current-`.
        external_theme: bool,
    },
    /// Links are the absolute paths listed per logical name.
    Map(BTreeMap<String, PathBuf>),
}

impl AppSettings {
    /// Resolve the link target form for `app`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ConfigConflict`] when both or neither of
    /// `config_dir` and `config_map` are set.
    pub fn link_target(&self, app: &str) -> Result<LinkTarget, ConfigError> {
        match (&self.config_dir, &self.config_map) {
            (Some(_), Some(_)) => Err(ConfigError::ConfigConflict {
                app: app.to_string(),
                reason: "both config_dir and config_map are set".to_string(),
            }),
            (None, None) => Err(ConfigError::ConfigConflict {
                app: app.to_string(),
                reason: "neither config_dir nor config_map is set".to_string(),
            }),
            (Some(dir), None) => Ok(LinkTarget::Directory {
                dir: expand_path(dir),
                external_theme: self.external_theme,
            }),
            (None, Some(map)) => Ok(LinkTarget::Map(
                map.iter()
                    .map(|(logical, path)| (logical.clone(), expand_path(path)))
                    .collect(),
            )),
        }
    }

    /// Separator used when rendering templates for this app.
    #[must_use]
    pub fn separator(&self) -> &str {
        self.separator.as_deref().unwrap_or(" ")
    }
}

/// Every registered application, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    apps: BTreeMap<String, AppSettings>,
}

#[derive(Debug, Deserialize)]
struct RegistryFile {
    app: Option<BTreeMap<String, AppSettings>>,
}

impl Registry {
    /// Build a registry from already-parsed settings.
    #[must_use]
    pub const fn new(apps: BTreeMap<String, AppSettings>) -> Self {
        Self { apps }
    }

    /// Settings for `name`, if registered.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AppSettings> {
        self.apps.get(name)
    }

    /// Whether `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.apps.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.apps.keys().map(String::as_str)
    }

    /// Registered `(name, settings)` pairs in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AppSettings)> {
        self.apps.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of registered apps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.apps.len()
    }

    /// Whether no app is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }
}

/// Load the registry from `path`.
///
/// A missing file or a file without an `app` table yields an empty registry
/// and a warning.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load(path: &Path) -> Result<Registry, ConfigError> {
    let Some(file) = toml_loader::load_config::<RegistryFile>(path)? else {
        tracing::warn!(
            "No registry file found at expected location \"{}\"",
            path.display()
        );
        return Ok(Registry::default());
    };

    let Some(apps) = file.app else {
        tracing::warn!(
            "Registry file found but is either empty or incorrectly formatted (no \"app\" key)"
        );
        return Ok(Registry::default());
    };

    Ok(Registry::new(apps))
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn write_registry(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(REGISTRY_FILE);
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn load_registry_from_file() {
        let (_dir, path) = write_registry(
            r#"
[app.kitty]
config_dir = "/home/u/.config/kitty"
supported_oses = ["Linux", "Darwin"]
refresh_cmd = "kill -SIGUSR1 $(pgrep kitty)"
external_theme = true

[app.git]
config_map = { "gitconfig" = "/home/u/.gitconfig" }
"#,
        );

        let registry = load(&path).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["git", "kitty"]);

        let kitty = registry.get("kitty").expect("kitty entry");
        assert!(kitty.external_theme);
        assert_eq!(kitty.supported_oses, vec!["Linux", "Darwin"]);
        assert_eq!(
            kitty.refresh_cmd.as_deref(),
            Some("kill -SIGUSR1 $(pgrep kitty)")
        );

        let git = registry.get("git").expect("git entry");
        assert!(!git.external_theme);
        assert!(git.supported_oses.is_empty());
        assert_eq!(git.separator(), " ");
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let (_dir, path) =
            write_registry("[app.kitty]\nconfig_dir = \"/x\"\nconfig_file = \"kitty.conf\"\n");
        assert!(load(&path).unwrap().contains("kitty"));
    }

    #[test]
    fn load_missing_file_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        let registry = load(&dir.path().join(REGISTRY_FILE)).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn load_file_without_app_key_returns_empty() {
        let (_dir, path) = write_registry("[other]\nvalue = 1\n");
        assert!(load(&path).unwrap().is_empty());
    }

    #[test]
    fn load_invalid_toml_errors() {
        let (_dir, path) = write_registry("[app.kitty\n");
        assert!(matches!(
            load(&path),
            Err(ConfigError::InvalidSyntax { .. })
        ));
    }

    #[test]
    fn link_target_directory_form() {
        let settings = AppSettings {
            config_dir: Some("/etc/kitty".to_string()),
            external_theme: true,
            ..AppSettings::default()
        };
        assert_eq!(
            settings.link_target("kitty").unwrap(),
            LinkTarget::Directory {
                dir: PathBuf::from("/etc/kitty"),
                external_theme: true,
            }
        );
    }

    #[test]
    fn link_target_map_form() {
        let settings = AppSettings {
            config_map: Some(BTreeMap::from([(
                "gitconfig".to_string(),
                "/home/u/.gitconfig".to_string(),
            )])),
            ..AppSettings::default()
        };
        assert_eq!(
            settings.link_target("git").unwrap(),
            LinkTarget::Map(BTreeMap::from([(
                "gitconfig".to_string(),
                PathBuf::from("/home/u/.gitconfig"),
            )]))
        );
    }

    #[test]
    fn link_target_both_forms_conflict() {
        let settings = AppSettings {
            config_dir: Some("/a".to_string()),
            config_map: Some(BTreeMap::new()),
            ..AppSettings::default()
        };
        let err = settings.link_target("broken").unwrap_err();
        assert!(matches!(err, ConfigError::ConfigConflict { .. }));
        assert!(err.to_string().contains("App 'broken' incorrectly configured"));
    }

    #[test]
    fn link_target_neither_form_conflicts() {
        let err = AppSettings::default().link_target("empty").unwrap_err();
        assert!(err.to_string().contains("neither config_dir nor config_map"));
    }

    #[test]
    fn custom_separator() {
        let settings = AppSettings {
            separator: Some(" = ".to_string()),
            ..AppSettings::default()
        };
        assert_eq!(settings.separator(), " = ");
    }
}
