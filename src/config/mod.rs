//! Config directory location and registry loading.
pub mod registry;
pub mod toml_loader;
pub mod validation;

use anyhow::{Result, bail};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use registry::Registry;
use validation::ValidationWarning;

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "AUTOCONF_CONFIG_DIR";

/// Loaded configuration directory and registry.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root configuration directory.
    pub config_dir: PathBuf,
    /// `<config_dir>/apps`, holding one directory per application.
    pub apps_dir: PathBuf,
    /// Registered applications.
    pub registry: Registry,
}

impl Config {
    /// Check the directory layout and load the registry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if `config_dir` does not exist or has
    /// no non-empty `apps/` subdirectory, and propagates registry read or
    /// parse errors.
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        if !config_dir.is_dir() {
            return Err(ConfigError::NotFound {
                what: "config directory".to_string(),
                path: config_dir.to_path_buf(),
            });
        }

        let apps_dir = config_dir.join("apps");
        let has_apps = std::fs::read_dir(&apps_dir)
            .map(|mut entries| entries.next().is_some())
            .unwrap_or(false);
        if !has_apps {
            return Err(ConfigError::NotFound {
                what: "non-empty \"apps/\" subdirectory".to_string(),
                path: apps_dir,
            });
        }

        let registry = registry::load(&config_dir.join(registry::REGISTRY_FILE))?;

        Ok(Self {
            config_dir: config_dir.to_path_buf(),
            apps_dir,
            registry,
        })
    }

    /// Directory holding `app`'s artifacts, scripts and templates.
    #[must_use]
    pub fn app_dir(&self, app: &str) -> PathBuf {
        self.apps_dir.join(app)
    }

    /// Check the registry against the directory layout.
    #[must_use]
    pub fn validate(&self) -> Vec<ValidationWarning> {
        validation::validate_registry(&self.registry, &self.apps_dir)
    }
}

/// Resolve the config directory from the CLI flag and the environment.
///
/// # Errors
///
/// Returns an error if no candidate can be determined.
pub fn resolve_config_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    resolve_config_dir_with(explicit, |key| std::env::var(key).ok())
}

/// Resolution order: `explicit`, `AUTOCONF_CONFIG_DIR`,
/// `$XDG_CONFIG_HOME/autoconf`, `$HOME/.config/autoconf`.
fn resolve_config_dir_with(
    explicit: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(absolute(&expand_with(&dir.to_string_lossy(), &env)));
    }
    if let Some(dir) = env(CONFIG_DIR_ENV).filter(|d| !d.is_empty()) {
        return Ok(absolute(&expand_with(&dir, &env)));
    }
    if let Some(xdg) = env("XDG_CONFIG_HOME").filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(xdg).join("autoconf"));
    }
    if let Some(home) = home_dir_with(&env) {
        return Ok(home.join(".config").join("autoconf"));
    }
    bail!("cannot determine config directory. Use --config-dir or set {CONFIG_DIR_ENV}");
}

/// Expand a leading `~` and make `raw` absolute without resolving symlinks.
#[must_use]
pub fn expand_path(raw: &str) -> PathBuf {
    absolute(&expand_with(raw, |key| std::env::var(key).ok()))
}

fn expand_with(raw: &str, env: impl Fn(&str) -> Option<String>) -> PathBuf {
    let rest = if raw == "~" {
        Some("")
    } else {
        raw.strip_prefix("~/")
            .or_else(|| raw.strip_prefix("~\\"))
    };
    match (rest, home_dir_with(&env)) {
        (Some(rest), Some(home)) if rest.is_empty() => home,
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(raw),
    }
}

fn home_dir_with(env: impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    env("HOME")
        .or_else(|| env("USERPROFILE"))
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
