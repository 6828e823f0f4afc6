// Shared helpers for integration tests.
//
// Provides a temporary config directory with a separate fake home, and a
// fluent builder for writing the registry, artifacts and reload scripts.
#![allow(dead_code, clippy::expect_used)]

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use autoconf_cli::config::Config;
use autoconf_cli::exec::{ExecResult, ProcessRunner};
use autoconf_cli::platform::{Os, Platform};
use autoconf_cli::theme::{ThemeRequest, WildcardDetector};
use autoconf_cli::operations::SystemFileSystemOps;
use autoconf_cli::update::{self, AppSelector, RunContext, RunReport};

/// An isolated config directory and home backed by a [`tempfile::TempDir`].
pub struct IntegrationTestContext {
    pub root: tempfile::TempDir,
}

impl IntegrationTestContext {
    /// `<root>/config`, holding `app_registry.toml` and `apps/`.
    pub fn config_dir(&self) -> PathBuf {
        self.root.path().join("config")
    }

    /// `<root>/home`, where registry targets point.
    pub fn home(&self) -> PathBuf {
        self.root.path().join("home")
    }

    pub fn app_dir(&self, app: &str) -> PathBuf {
        self.config_dir().join("apps").join(app)
    }

    pub fn load_config(&self) -> Config {
        Config::load(&self.config_dir()).expect("load config")
    }

    /// Run `set` for `apps` on Linux and return the report.
    pub fn set(
        &self,
        palette: &str,
        scheme: &str,
        apps: &[&str],
        dry_run: bool,
        runner: &dyn ProcessRunner,
    ) -> RunReport {
        let config = self.load_config();
        let apps: Vec<String> = apps.iter().map(|a| (*a).to_string()).collect();
        let ctx = RunContext::new(
            &config,
            ThemeRequest::new(palette, scheme),
            &WildcardDetector,
            AppSelector::from_args(&apps),
            Platform::new(Os::Linux),
            dry_run,
        );
        update::update_apps(&ctx, &SystemFileSystemOps, runner)
    }
}

/// Fluent builder for [`IntegrationTestContext`].
pub struct TestContextBuilder {
    ctx: IntegrationTestContext,
    registry: String,
}

impl TestContextBuilder {
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        fs::create_dir_all(root.path().join("config/apps")).expect("create apps dir");
        fs::create_dir_all(root.path().join("home")).expect("create home dir");
        Self {
            ctx: IntegrationTestContext { root },
            registry: String::new(),
        }
    }

    /// Append a registry section. `{home}` is replaced with the fake home.
    pub fn with_app(mut self, name: &str, body: &str) -> Self {
        let body = body.replace("{home}", &self.ctx.home().to_string_lossy());
        self.registry.push_str(&format!("[app.{name}]\n{body}\n\n"));
        self
    }

    /// Write `apps/<app>/<tier>/<name>`.
    pub fn with_artifact(self, app: &str, tier: &str, name: &str, content: &str) -> Self {
        write(&self.ctx.app_dir(app).join(tier).join(name), content);
        self
    }

    /// Write `apps/<app>/call/<name>`.
    pub fn with_script(self, app: &str, name: &str, content: &str) -> Self {
        write(&self.ctx.app_dir(app).join("call").join(name), content);
        self
    }

    /// Write an arbitrary file below the config dir.
    pub fn with_file(self, rel: &str, content: &str) -> Self {
        write(&self.ctx.config_dir().join(rel), content);
        self
    }

    pub fn build(self) -> IntegrationTestContext {
        fs::write(
            self.ctx.config_dir().join("app_registry.toml"),
            &self.registry,
        )
        .expect("write registry");
        self.ctx
    }
}

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().expect("parent")).expect("create parent");
    fs::write(path, content).expect("write file");
}

/// Records commands and always succeeds.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    pub calls: RefCell<Vec<(String, PathBuf)>>,
}

impl RecordingRunner {
    pub fn commands(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|(c, _)| c.clone()).collect()
    }
}

impl ProcessRunner for RecordingRunner {
    fn run_shell(&self, command: &str, cwd: &Path) -> anyhow::Result<ExecResult> {
        self.calls
            .borrow_mut()
            .push((command.to_string(), cwd.to_path_buf()));
        Ok(ExecResult {
            stdout: String::new(),
            stderr: String::new(),
            success: true,
            code: Some(0),
        })
    }
}
