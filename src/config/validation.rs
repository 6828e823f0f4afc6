//! Non-fatal checks of the loaded registry.
use std::path::Path;

use super::registry::{REGISTRY_FILE, Registry};
use crate::platform::KNOWN_OS_IDENTIFIERS;

/// A validation warning detected during configuration loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The configuration source (e.g., "app_registry.toml").
    pub source: String,
    /// The specific item or section that triggered the warning.
    pub item: String,
    /// Human-readable warning message.
    pub message: String,
}

impl ValidationWarning {
    /// Build a warning from anything string-like.
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        item: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            item: item.into(),
            message: message.into(),
        }
    }
}

/// Check every registered app for common mistakes.
///
/// Looks for:
/// - both or neither of `config_dir` / `config_map`
/// - an empty `config_map`
/// - unrecognised `supported_oses` identifiers
/// - no `apps/<name>` directory holding artifacts
///
/// Warnings never stop a run; apps with a conflicting target form are
/// skipped later when they are planned.
#[must_use]
pub fn validate_registry(registry: &Registry, apps_dir: &Path) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    for (name, settings) in registry.iter() {
        if let Err(e) = settings.link_target(name) {
            warnings.push(ValidationWarning::new(REGISTRY_FILE, name, e.to_string()));
        }

        if settings.config_map.as_ref().is_some_and(|m| m.is_empty()) {
            warnings.push(ValidationWarning::new(
                REGISTRY_FILE,
                name,
                "config_map is empty; nothing will be linked",
            ));
        }

        for os in &settings.supported_oses {
            let normalized = os.trim().to_ascii_lowercase();
            if !KNOWN_OS_IDENTIFIERS.contains(&normalized.as_str()) {
                warnings.push(ValidationWarning::new(
                    REGISTRY_FILE,
                    name,
                    format!("unknown OS identifier '{os}' in supported_oses"),
                ));
            }
        }

        let app_dir = apps_dir.join(name);
        if !app_dir.is_dir() {
            warnings.push(ValidationWarning::new(
                REGISTRY_FILE,
                name,
                format!("app directory does not exist: {}", app_dir.display()),
            ));
        }
    }

    warnings
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::registry::AppSettings;
    use std::collections::BTreeMap;

    fn registry_of(apps: Vec<(&str, AppSettings)>) -> Registry {
        Registry::new(
            apps.into_iter()
                .map(|(n, s)| (n.to_string(), s))
                .collect(),
        )
    }

    fn dir_settings() -> AppSettings {
        AppSettings {
            config_dir: Some("/tmp/kitty".to_string()),
            ..AppSettings::default()
        }
    }

    #[test]
    fn clean_registry_has_no_warnings() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("kitty")).unwrap();
        let registry = registry_of(vec![(
            "kitty",
            AppSettings {
                supported_oses: vec!["Linux".to_string(), "Darwin".to_string()],
                ..dir_settings()
            },
        )]);
        assert!(validate_registry(&registry, dir.path()).is_empty());
    }

    #[test]
    fn detects_conflicting_target_form() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("broken")).unwrap();
        let registry = registry_of(vec![(
            "broken",
            AppSettings {
                config_map: Some(BTreeMap::from([("a".to_string(), "/a".to_string())])),
                ..dir_settings()
            },
        )]);
        let warnings = validate_registry(&registry, dir.path());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].item, "broken");
        assert!(warnings[0].message.contains("incorrectly configured"));
    }

    #[test]
    fn detects_empty_config_map() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("git")).unwrap();
        let registry = registry_of(vec![(
            "git",
            AppSettings {
                config_map: Some(BTreeMap::new()),
                ..AppSettings::default()
            },
        )]);
        let warnings = validate_registry(&registry, dir.path());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("config_map is empty"));
    }

    #[test]
    fn detects_unknown_os() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("kitty")).unwrap();
        let registry = registry_of(vec![(
            "kitty",
            AppSettings {
                supported_oses: vec!["Plan9".to_string()],
                ..dir_settings()
            },
        )]);
        let warnings = validate_registry(&registry, dir.path());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("'Plan9'"));
    }

    #[test]
    fn detects_missing_app_directory() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry_of(vec![("kitty", dir_settings())]);
        let warnings = validate_registry(&registry, dir.path());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("app directory does not exist"));
        assert_eq!(warnings[0].source, REGISTRY_FILE);
    }
}
