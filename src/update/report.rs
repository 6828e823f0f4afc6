//! Structured results of an update run.
use crate::link::{ApplyOutcome, CommandRun};
use crate::logging::AppStatus;
use crate::platform::Os;
use crate::theme::ResolvedTheme;

/// What happened to one selected application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppOutcome {
    /// The plan was applied (possibly with per-operation failures).
    Applied {
        /// Per-operation results and script runs.
        links: ApplyOutcome,
        /// Refresh command, when configured and at least one link succeeded.
        refresh: Option<CommandRun>,
    },
    /// The requested name is not in the registry.
    NotRegistered,
    /// The app does not list the running OS.
    Unsupported {
        /// The running OS.
        os: Os,
    },
    /// The registry entry has no usable link target form.
    Conflict {
        /// Why the entry conflicts.
        reason: String,
    },
    /// The app could not be processed at all (e.g. missing app directory).
    Failed {
        /// Why processing failed.
        reason: String,
    },
}

/// Result for one application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppReport {
    /// App name as selected.
    pub app: String,
    /// What happened.
    pub outcome: AppOutcome,
    /// Non-fatal problems found along the way (malformed artifact names, ...).
    pub warnings: Vec<String>,
}

impl AppReport {
    /// Report without warnings.
    #[must_use]
    pub fn new(app: impl Into<String>, outcome: AppOutcome) -> Self {
        Self {
            app: app.into(),
            outcome,
            warnings: Vec::new(),
        }
    }

    /// Number of failed link operations.
    #[must_use]
    pub fn failed_operations(&self) -> usize {
        match &self.outcome {
            AppOutcome::Applied { links, .. } => links.failed.len(),
            _ => 0,
        }
    }

    /// Summary status and optional detail for this app.
    #[must_use]
    pub fn status(&self, dry_run: bool) -> (AppStatus, Option<String>) {
        match &self.outcome {
            AppOutcome::Applied { links, .. } if !links.failed.is_empty() => (
                AppStatus::Failed,
                Some(format!(
                    "{} of {} link(s) failed",
                    links.failed.len(),
                    links.failed.len() + links.succeeded.len()
                )),
            ),
            AppOutcome::Applied { links, .. } if links.succeeded.is_empty() => {
                (AppStatus::Skipped, Some("nothing to link".to_string()))
            }
            AppOutcome::Applied { links, .. } => {
                let status = if dry_run {
                    AppStatus::DryRun
                } else {
                    AppStatus::Ok
                };
                (status, Some(format!("{} link(s)", links.succeeded.len())))
            }
            AppOutcome::NotRegistered => (AppStatus::Skipped, Some("not registered".to_string())),
            AppOutcome::Unsupported { os } => {
                (AppStatus::NotApplicable, Some(format!("not supported on {os}")))
            }
            AppOutcome::Conflict { reason } => (AppStatus::Skipped, Some(reason.clone())),
            AppOutcome::Failed { reason } => (AppStatus::Failed, Some(reason.clone())),
        }
    }
}

/// Everything one `set` invocation did, rendered once at the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Theme the run resolved to.
    pub theme: ResolvedTheme,
    /// Whether the run was a dry run.
    pub dry_run: bool,
    /// One report per selected app, in selection order.
    pub apps: Vec<AppReport>,
}

impl RunReport {
    /// Total failed link operations across all apps.
    #[must_use]
    pub fn failed_operations(&self) -> usize {
        self.apps.iter().map(AppReport::failed_operations).sum()
    }

    /// Report for `app`, if it was selected.
    #[must_use]
    pub fn app(&self, app: &str) -> Option<&AppReport> {
        self.apps.iter().find(|r| r.app == app)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::error::LinkError;
    use crate::link::{LinkFailure, LinkOperation, LinkStatus, LinkSuccess};
    use std::path::PathBuf;

    fn success() -> LinkSuccess {
        LinkSuccess {
            operation: LinkOperation::new("/h/a", "/c/a"),
            status: LinkStatus::Linked,
        }
    }

    fn failure() -> LinkFailure {
        LinkFailure {
            operation: LinkOperation::new("/h/b", "/c/b"),
            error: LinkError::MissingArtifact {
                path: PathBuf::from("/c/b"),
            },
        }
    }

    fn applied(succeeded: Vec<LinkSuccess>, failed: Vec<LinkFailure>) -> AppReport {
        AppReport::new(
            "kitty",
            AppOutcome::Applied {
                links: ApplyOutcome {
                    succeeded,
                    failed,
                    scripts: vec![],
                },
                refresh: None,
            },
        )
    }

    #[test]
    fn any_failed_operation_marks_app_failed() {
        let report = applied(vec![success()], vec![failure()]);
        assert_eq!(
            report.status(false),
            (AppStatus::Failed, Some("1 of 2 link(s) failed".to_string()))
        );
        assert_eq!(report.failed_operations(), 1);
    }

    #[test]
    fn all_succeeded_is_ok_or_dry_run() {
        let report = applied(vec![success()], vec![]);
        assert_eq!(report.status(false).0, AppStatus::Ok);
        assert_eq!(report.status(true).0, AppStatus::DryRun);
    }

    #[test]
    fn empty_plan_is_skipped() {
        assert_eq!(applied(vec![], vec![]).status(false).0, AppStatus::Skipped);
    }

    #[test]
    fn non_applied_outcomes_map_to_statuses() {
        assert_eq!(
            AppReport::new("x", AppOutcome::NotRegistered).status(false),
            (AppStatus::Skipped, Some("not registered".to_string()))
        );
        assert_eq!(
            AppReport::new("x", AppOutcome::Unsupported { os: Os::Windows })
                .status(false)
                .0,
            AppStatus::NotApplicable
        );
        assert_eq!(
            AppReport::new(
                "x",
                AppOutcome::Conflict {
                    reason: "both".to_string()
                }
            )
            .status(false)
            .0,
            AppStatus::Skipped
        );
    }

    #[test]
    fn run_report_sums_failures() {
        let report = RunReport {
            theme: ResolvedTheme::new("nord", "dark"),
            dry_run: false,
            apps: vec![
                applied(vec![], vec![failure(), failure()]),
                AppReport::new("git", AppOutcome::NotRegistered),
            ],
        };
        assert_eq!(report.failed_operations(), 2);
        assert!(report.app("git").is_some());
        assert!(report.app("rofi").is_none());
    }
}
