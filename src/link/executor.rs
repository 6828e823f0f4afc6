//! Applying link plans to the live filesystem.
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::plan::LinkOperation;
use super::scripts::ScriptPlan;
use super::symlink::{LinkState, link_state, paths_equal, replace_symlink};
use crate::error::LinkError;
use crate::exec::{ExecResult, ProcessRunner, shell_quote};

/// How a successful operation was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    /// A new link was created or an old one replaced.
    Linked,
    /// The link already pointed at the artifact.
    AlreadyLinked,
    /// Dry run: preconditions hold and the link would be written.
    WouldLink,
}

impl LinkStatus {
    /// Short label used in reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Linked => "linked",
            Self::AlreadyLinked => "already linked",
            Self::WouldLink => "would link",
        }
    }
}

/// A successful operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSuccess {
    /// The operation that was applied.
    pub operation: LinkOperation,
    /// How it was satisfied.
    pub status: LinkStatus,
}

/// A failed operation and the first precondition it violated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkFailure {
    /// The operation that failed.
    pub operation: LinkOperation,
    /// First precondition it violated.
    pub error: LinkError,
}

/// A shell command run on behalf of an app (reload script or refresh command).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRun {
    /// What ran: a script path or the command line.
    pub label: String,
    /// Captured output, or the reason the process could not start.
    pub result: Result<ExecResult, String>,
}

impl CommandRun {
    /// Run `command` in `cwd` and capture the outcome.
    pub fn capture(
        runner: &dyn ProcessRunner,
        label: impl Into<String>,
        command: &str,
        cwd: &Path,
    ) -> Self {
        Self {
            label: label.into(),
            result: runner.run_shell(command, cwd).map_err(|e| format!("{e:#}")),
        }
    }

    /// Whether the command started and exited successfully.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.result.as_ref().is_ok_and(|r| r.success)
    }
}

/// Everything [`LinkExecutor::apply`] did for one plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyOutcome {
    /// Successful operations, in plan order.
    pub succeeded: Vec<LinkSuccess>,
    /// Failed operations, in plan order.
    pub failed: Vec<LinkFailure>,
    /// Scripts that ran, in run order.
    pub scripts: Vec<CommandRun>,
}

/// Applies link operations and runs reload scripts.
///
/// Individual operations never abort a plan: each failure is recorded and
/// the next operation is attempted. Scripts run at most once per executor.
pub struct LinkExecutor<'a> {
    runner: &'a dyn ProcessRunner,
    dry_run: bool,
    scripts_run: HashSet<PathBuf>,
}

impl std::fmt::Debug for LinkExecutor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkExecutor")
            .field("dry_run", &self.dry_run)
            .field("scripts_run", &self.scripts_run)
            .finish_non_exhaustive()
    }
}

impl<'a> LinkExecutor<'a> {
    /// Executor running scripts through `runner`; with `dry_run` nothing is mutated.
    #[must_use]
    pub fn new(runner: &'a dyn ProcessRunner, dry_run: bool) -> Self {
        Self {
            runner,
            dry_run,
            scripts_run: HashSet::new(),
        }
    }

    /// Apply `operations` in order, running `scripts` after each success.
    pub fn apply(&mut self, operations: &[LinkOperation], scripts: &ScriptPlan) -> ApplyOutcome {
        let mut outcome = ApplyOutcome::default();

        for op in operations {
            match self.apply_one(op) {
                Ok(status) => {
                    tracing::debug!("{} ({})", op, status.label());
                    outcome.succeeded.push(LinkSuccess {
                        operation: op.clone(),
                        status,
                    });
                    if !self.dry_run {
                        self.run_scripts(scripts, &mut outcome.scripts);
                    }
                }
                Err(error) => {
                    tracing::debug!("{op}: {error}");
                    outcome.failed.push(LinkFailure {
                        operation: op.clone(),
                        error,
                    });
                }
            }
        }

        outcome
    }

    /// Check preconditions in order and stop at the first violation.
    fn apply_one(&self, op: &LinkOperation) -> Result<LinkStatus, LinkError> {
        if !op.to_path.exists() {
            return Err(LinkError::MissingArtifact {
                path: op.to_path.clone(),
            });
        }

        if op.from_path.parent().is_none_or(|p| !p.is_dir()) {
            return Err(LinkError::MissingTargetParent {
                path: op.from_path.clone(),
            });
        }

        let state = link_state(&op.from_path).map_err(|e| LinkError::Io {
            path: op.from_path.clone(),
            message: format!("{e:#}"),
        })?;
        match state {
            LinkState::Foreign => {
                return Err(LinkError::ForeignFileConflict {
                    path: op.from_path.clone(),
                });
            }
            LinkState::Symlink(dest) if paths_equal(&dest, &op.to_path) => {
                return Ok(LinkStatus::AlreadyLinked);
            }
            LinkState::Symlink(_) | LinkState::Missing => {}
        }

        if self.dry_run {
            return Ok(LinkStatus::WouldLink);
        }

        replace_symlink(&op.to_path, &op.from_path).map_err(|e| LinkError::Io {
            path: op.from_path.clone(),
            message: format!("{e:#}"),
        })?;
        Ok(LinkStatus::Linked)
    }

    fn run_scripts(&mut self, scripts: &ScriptPlan, runs: &mut Vec<CommandRun>) {
        for script in &scripts.scripts {
            if !self.scripts_run.insert(script.clone()) {
                continue;
            }
            tracing::debug!("running script {}", script.display());
            runs.push(CommandRun::capture(
                self.runner,
                script.display().to_string(),
                &shell_quote(script),
                &scripts.cwd,
            ));
        }
    }
}
