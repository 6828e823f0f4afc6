//! Desktop-wide light/dark preference switching.
use std::path::Path;

use crate::exec::ProcessRunner;
use crate::link::CommandRun;
use crate::platform::Os;

/// Commands that make the desktop prefer `scheme` on `os`.
///
/// Only `light` and `dark` have a desktop counterpart; other schemes (and
/// OSes without a known command) yield nothing.
#[must_use]
pub fn commands(os: Os, scheme: &str) -> Vec<String> {
    if !matches!(scheme, "light" | "dark") {
        return Vec::new();
    }
    match os {
        Os::Linux => vec![format!(
            "gsettings set org.gnome.desktop.interface color-scheme 'prefer-{scheme}'"
        )],
        Os::MacOs | Os::Windows => Vec::new(),
    }
}

/// Run the appearance commands for `scheme` in `cwd`.
pub fn apply(runner: &dyn ProcessRunner, os: Os, scheme: &str, cwd: &Path) -> Vec<CommandRun> {
    commands(os, scheme)
        .into_iter()
        .map(|cmd| CommandRun::capture(runner, cmd.as_str(), &cmd, cwd))
        .collect()
}
