//! Core logging types: per-application entries, status, and the [`Log`] trait.

/// Per-application result for summary reporting.
#[derive(Debug, Clone)]
pub struct AppEntry {
    /// Application name from the registry.
    pub name: String,
    /// Final status of the application's update.
    pub status: AppStatus,
    /// Optional detail message (e.g., skip reason or failure count).
    pub message: Option<String>,
}

/// Status of an application after a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppStatus {
    /// Every planned link succeeded.
    Ok,
    /// The application does not support the current OS.
    NotApplicable,
    /// The application was skipped (not registered, misconfigured, nothing to link).
    Skipped,
    /// Dry run; nothing was changed.
    DryRun,
    /// At least one link operation failed.
    Failed,
}

/// Abstraction over logging backends.
///
/// Presentation code logs through this trait so tests can swap the
/// console-backed [`Logger`](super::logger::Logger) for a capturing one.
pub trait Log {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a dry-run action message.
    fn dry_run(&self, msg: &str);
    /// Record an application result for the summary.
    fn record_app(&self, name: &str, status: AppStatus, message: Option<&str>);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_status_equality() {
        assert_eq!(AppStatus::Ok, AppStatus::Ok);
        assert_ne!(AppStatus::Ok, AppStatus::Failed);
        assert_ne!(AppStatus::Skipped, AppStatus::DryRun);
        assert_ne!(AppStatus::NotApplicable, AppStatus::Ok);
    }
}
