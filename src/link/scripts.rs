//! Discovery of per-app reload scripts in `call/`.
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

use crate::operations::FileSystemOps;
use crate::theme::ResolvedTheme;

/// Directory inside an app directory holding reload scripts.
pub const CALL_DIR: &str = "call";

/// Scripts to run after an app's links change, in run order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptPlan {
    /// Working directory for every script.
    pub cwd: PathBuf,
    /// Script paths, without duplicates.
    pub scripts: Vec<PathBuf>,
}

impl ScriptPlan {
    /// Whether no script matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }
}

/// Find the scripts in `app_dir/call/` whose file stem is a rung of the
/// theme ladder.
///
/// Scripts are ordered by the first rung they match, least specific first,
/// and each path appears once even if the ladder repeats a prefix.
///
/// # Errors
///
/// Returns an error if the `call/` directory exists but cannot be listed.
pub fn discover(fs: &dyn FileSystemOps, app_dir: &Path, theme: &ResolvedTheme) -> Result<ScriptPlan> {
    let call_dir = app_dir.join(CALL_DIR);
    let mut plan = ScriptPlan {
        cwd: app_dir.to_path_buf(),
        scripts: Vec::new(),
    };
    if !fs.is_dir(&call_dir) {
        return Ok(plan);
    }

    let entries = fs
        .read_dir(&call_dir)
        .with_context(|| format!("listing scripts in {}", call_dir.display()))?;

    for rung in theme.ladder() {
        for entry in &entries {
            if fs.is_dir(entry) || plan.scripts.contains(entry) {
                continue;
            }
            let stem = entry.file_stem().and_then(|s| s.to_str());
            if stem == Some(rung.as_str()) {
                plan.scripts.push(entry.clone());
            }
        }
    }

    Ok(plan)
}
