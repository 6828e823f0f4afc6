//! Logging infrastructure for structured console and file output.

mod logger;
mod subscriber;
mod types;
mod utils;

pub use logger::Logger;
pub use subscriber::init_subscriber;
pub use types::{AppEntry, AppStatus, Log};

/// Create a Logger backed by an isolated per-thread tracing subscriber
/// with a [`FileLayer`](subscriber::FileLayer) writing into a temp dir, so
/// that tracing events emitted by logger methods reach a real log file.
///
/// Returns a [`tracing::dispatcher::DefaultGuard`] that must be kept alive
/// for the duration of the test; dropping it restores the previous
/// thread-local dispatcher.
#[cfg(test)]
#[allow(clippy::expect_used)]
pub(crate) fn isolated_logger() -> (Logger, tempfile::TempDir, tracing::dispatcher::DefaultGuard) {
    use tracing_subscriber::{Layer as _, filter::LevelFilter, layer::SubscriberExt as _};
    let tmp = tempfile::tempdir().expect("failed to create temp dir");
    let path = tmp.path().join("test.log");
    let file_layer = subscriber::FileLayer::at(&path).expect("failed to create file layer");
    let log = Logger::with_log_file(Some(path));
    let subscriber =
        tracing_subscriber::registry().with(file_layer.with_filter(LevelFilter::DEBUG));
    let guard = tracing::dispatcher::set_default(&tracing::Dispatch::new(subscriber));
    (log, tmp, guard)
}

/// A [`Log`] implementation that records every message in memory.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct CapturingLog {
    /// `(kind, message)` pairs in emission order.
    pub lines: std::cell::RefCell<Vec<(&'static str, String)>>,
    /// Recorded application entries.
    pub apps: std::cell::RefCell<Vec<AppEntry>>,
}

#[cfg(test)]
impl CapturingLog {
    /// Messages of the given kind, in order.
    pub fn of(&self, kind: &str) -> Vec<String> {
        self.lines
            .borrow()
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, m)| m.clone())
            .collect()
    }

    fn push(&self, kind: &'static str, msg: &str) {
        self.lines.borrow_mut().push((kind, msg.to_string()));
    }
}

#[cfg(test)]
impl Log for CapturingLog {
    fn stage(&self, msg: &str) {
        self.push("stage", msg);
    }
    fn info(&self, msg: &str) {
        self.push("info", msg);
    }
    fn debug(&self, msg: &str) {
        self.push("debug", msg);
    }
    fn warn(&self, msg: &str) {
        self.push("warn", msg);
    }
    fn error(&self, msg: &str) {
        self.push("error", msg);
    }
    fn dry_run(&self, msg: &str) {
        self.push("dry_run", msg);
    }
    fn record_app(&self, name: &str, status: AppStatus, message: Option<&str>) {
        self.apps.borrow_mut().push(AppEntry {
            name: name.to_string(),
            status,
            message: message.map(String::from),
        });
    }
}
