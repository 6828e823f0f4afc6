//! The per-application update pipeline: catalog → matcher → planner → executor.
//!
//! [`update_apps`] is the engine entry point. It never prints; everything it
//! does ends up in the returned [`RunReport`].

pub mod report;

pub use report::{AppOutcome, AppReport, RunReport};

use crate::config::Config;
use crate::config::registry::AppSettings;
use crate::exec::ProcessRunner;
use crate::link::{self, CommandRun, LinkExecutor};
use crate::operations::FileSystemOps;
use crate::platform::Platform;
use crate::theme::{self, ArtifactCatalog, ResolvedTheme, SchemeDetector, ThemeRequest};

/// Selector value meaning every registered app.
pub const ALL_APPS: &str = "*";

/// Which applications a run touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppSelector {
    /// Every registered app, in registry order.
    All,
    /// The named apps, in the given order.
    Named(Vec<String>),
}

impl AppSelector {
    /// Build a selector from CLI values; any `*` selects everything.
    ///
    /// Blank entries are dropped and repeated names kept once.
    #[must_use]
    pub fn from_args(values: &[String]) -> Self {
        if values.iter().any(|v| v.trim() == ALL_APPS) {
            return Self::All;
        }
        let mut names: Vec<String> = Vec::new();
        for value in values {
            let name = value.trim();
            if !name.is_empty() && !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        Self::Named(names)
    }

    /// Resolve against the registry.
    #[must_use]
    pub fn names(&self, config: &Config) -> Vec<String> {
        match self {
            Self::All => config.registry.names().map(String::from).collect(),
            Self::Named(names) => names.clone(),
        }
    }
}

/// Everything an update run needs, passed explicitly.
#[derive(Debug, Clone)]
pub struct RunContext<'a> {
    /// Loaded configuration.
    pub config: &'a Config,
    /// Theme as requested on the command line.
    pub request: ThemeRequest,
    /// `request` with `auto` resolved.
    pub theme: ResolvedTheme,
    /// Apps to update.
    pub apps: AppSelector,
    /// Platform used for `supported_oses` checks.
    pub platform: Platform,
    /// Evaluate preconditions only.
    pub dry_run: bool,
}

impl<'a> RunContext<'a> {
    /// Resolve `request` with `detector` and bundle the run inputs.
    #[must_use]
    pub fn new(
        config: &'a Config,
        request: ThemeRequest,
        detector: &dyn SchemeDetector,
        apps: AppSelector,
        platform: Platform,
        dry_run: bool,
    ) -> Self {
        let theme = request.resolve(detector);
        Self {
            config,
            request,
            theme,
            apps,
            platform,
            dry_run,
        }
    }
}

/// Update every selected app and collect the outcomes.
pub fn update_apps(
    ctx: &RunContext<'_>,
    fs: &dyn FileSystemOps,
    runner: &dyn ProcessRunner,
) -> RunReport {
    let names = ctx.apps.names(ctx.config);
    if names.is_empty() {
        tracing::warn!("no apps selected");
    }

    let mut executor = LinkExecutor::new(runner, ctx.dry_run);
    let apps = names
        .iter()
        .map(|name| match ctx.config.registry.get(name) {
            Some(settings) => update_app(ctx, fs, runner, &mut executor, name, settings),
            None => {
                tracing::debug!("app '{name}' is not registered");
                AppReport::new(name.as_str(), AppOutcome::NotRegistered)
            }
        })
        .collect();

    RunReport {
        theme: ctx.theme.clone(),
        dry_run: ctx.dry_run,
        apps,
    }
}

/// Run the full pipeline for one registered app.
///
/// `executor` is shared across apps so that a script never runs twice in
/// one invocation.
pub fn update_app(
    ctx: &RunContext<'_>,
    fs: &dyn FileSystemOps,
    runner: &dyn ProcessRunner,
    executor: &mut LinkExecutor<'_>,
    name: &str,
    settings: &AppSettings,
) -> AppReport {
    if !ctx.platform.supports(&settings.supported_oses) {
        return AppReport::new(
            name,
            AppOutcome::Unsupported {
                os: ctx.platform.os,
            },
        );
    }

    let app_dir = ctx.config.app_dir(name);
    let catalog = match ArtifactCatalog::build(fs, &app_dir) {
        Ok(catalog) => catalog,
        Err(e) => {
            return AppReport::new(
                name,
                AppOutcome::Failed {
                    reason: e.to_string(),
                },
            );
        }
    };

    let resolution = theme::resolve(&catalog, &ctx.theme);
    let mut warnings: Vec<String> = resolution.malformed.iter().map(ToString::to_string).collect();

    let operations = match link::plan(name, &resolution.resolved, settings) {
        Ok(operations) => operations,
        Err(e) => {
            tracing::debug!("{e}");
            return AppReport {
                app: name.to_string(),
                outcome: AppOutcome::Conflict {
                    reason: e.to_string(),
                },
                warnings,
            };
        }
    };
    tracing::debug!("{name}: {} operation(s) planned", operations.len());

    let scripts = link::scripts::discover(fs, &app_dir, &ctx.theme).unwrap_or_else(|e| {
        warnings.push(format!("{e:#}"));
        link::ScriptPlan::default()
    });

    let links = executor.apply(&operations, &scripts);

    let refresh = match &settings.refresh_cmd {
        Some(cmd) if !ctx.dry_run && !links.succeeded.is_empty() => {
            tracing::debug!("{name}: running refresh command");
            Some(CommandRun::capture(runner, cmd.as_str(), cmd, &app_dir))
        }
        _ => None,
    };

    AppReport {
        app: name.to_string(),
        outcome: AppOutcome::Applied { links, refresh },
        warnings,
    }
}

#[cfg(all(test, unix))]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::exec::test_helpers::RecordingRunner;
    use crate::link::LinkStatus;
    use crate::operations::SystemFileSystemOps;
    use crate::platform::Os;
    use crate::theme::WildcardDetector;
    use std::fs;
    use std::path::PathBuf;

    struct Fixture {
        dir: tempfile::TempDir,
    }

    impl Fixture {
        fn new(registry: &str) -> Self {
            let dir = tempfile::tempdir().unwrap();
            fs::create_dir_all(dir.path().join("cfg/apps")).unwrap();
            fs::create_dir_all(dir.path().join("home")).unwrap();
            let registry = registry.replace("{home}", &dir.path().join("home").to_string_lossy());
            fs::write(dir.path().join("cfg/app_registry.toml"), registry).unwrap();
            Self { dir }
        }

        fn file(&self, rel: &str, content: &str) -> PathBuf {
            let path = self.dir.path().join("cfg/apps").join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, content).unwrap();
            path
        }

        fn home(&self) -> PathBuf {
            self.dir.path().join("home")
        }

        fn config(&self) -> Config {
            Config::load(&self.dir.path().join("cfg")).unwrap()
        }
    }

    fn run(
        config: &Config,
        palette: &str,
        scheme: &str,
        apps: &[&str],
        dry_run: bool,
        runner: &RecordingRunner,
    ) -> RunReport {
        let selector =
            AppSelector::from_args(&apps.iter().map(|s| (*s).to_string()).collect::<Vec<_>>());
        let ctx = RunContext::new(
            config,
            ThemeRequest::new(palette, scheme),
            &WildcardDetector,
            selector,
            Platform::new(Os::Linux),
            dry_run,
        );
        update_apps(&ctx, &SystemFileSystemOps, runner)
    }

    fn links_of(report: &AppReport) -> link::ApplyOutcome {
        assert!(
            matches!(report.outcome, AppOutcome::Applied { .. }),
            "expected applied outcome, got {:?}",
            report.outcome
        );
        match &report.outcome {
            AppOutcome::Applied { links, .. } => links.clone(),
            _ => link::ApplyOutcome::default(),
        }
    }

    #[test]
    fn selector_star_means_all() {
        assert_eq!(
            AppSelector::from_args(&["kitty".to_string(), "*".to_string()]),
            AppSelector::All
        );
        assert_eq!(
            AppSelector::from_args(&["kitty".to_string(), " kitty ".to_string(), String::new()]),
            AppSelector::Named(vec!["kitty".to_string()])
        );
    }

    #[test]
    fn user_override_with_palette_fallback() {
        let fx = Fixture::new("[app.demo]\nconfig_dir = \"{home}\"\n");
        fx.file("demo/generated/any-any.conf.ini", "generated");
        let user = fx.file("demo/user/dark-any.conf.ini", "user");
        let config = fx.config();
        let runner = RecordingRunner::new();

        let report = run(&config, "dark", "light", &["demo"], false, &runner);

        let links = links_of(&report.apps[0]);
        assert_eq!(links.succeeded.len(), 1);
        assert_eq!(fs::read_link(fx.home().join("conf.ini")).unwrap(), user);
    }

    #[test]
    fn conflict_skips_only_that_app() {
        let fx = Fixture::new(
            "[app.bad]\nconfig_dir = \"{home}\"\nconfig_map = { \"x\" = \"{home}/x\" }\n\n\
             [app.good]\nconfig_dir = \"{home}\"\n",
        );
        fx.file("bad/generated/any-any.x", "x");
        let good = fx.file("good/generated/any-any.good.rc", "good");
        let config = fx.config();
        let runner = RecordingRunner::new();

        let report = run(&config, "any", "any", &["*"], false, &runner);

        assert!(matches!(
            report.app("bad").unwrap().outcome,
            AppOutcome::Conflict { .. }
        ));
        assert!(fs::symlink_metadata(fx.home().join("x")).is_err());
        assert_eq!(fs::read_link(fx.home().join("good.rc")).unwrap(), good);
    }

    #[test]
    fn unregistered_app_is_reported() {
        let fx = Fixture::new("[app.kitty]\nconfig_dir = \"{home}\"\n");
        fx.file("kitty/generated/any-any.kitty.conf", "k");
        let config = fx.config();
        let runner = RecordingRunner::new();

        let report = run(&config, "any", "any", &["rofi"], false, &runner);

        assert_eq!(report.apps.len(), 1);
        assert_eq!(report.apps[0].outcome, AppOutcome::NotRegistered);
    }

    #[test]
    fn unsupported_os_is_not_linked() {
        let fx = Fixture::new(
            "[app.mac]\nconfig_dir = \"{home}\"\nsupported_oses = [\"Darwin\"]\n",
        );
        fx.file("mac/generated/any-any.mac.conf", "m");
        let config = fx.config();
        let runner = RecordingRunner::new();

        let report = run(&config, "any", "any", &["*"], false, &runner);

        assert_eq!(
            report.apps[0].outcome,
            AppOutcome::Unsupported { os: Os::Linux }
        );
        assert!(fs::symlink_metadata(fx.home().join("mac.conf")).is_err());
    }

    #[test]
    fn missing_app_dir_fails_that_app() {
        let fx = Fixture::new(
            "[app.ghost]\nconfig_dir = \"{home}\"\n\n[app.kitty]\nconfig_dir = \"{home}\"\n",
        );
        fx.file("kitty/generated/any-any.kitty.conf", "k");
        let config = fx.config();
        let runner = RecordingRunner::new();

        let report = run(&config, "any", "any", &["*"], false, &runner);

        assert!(matches!(
            report.app("ghost").unwrap().outcome,
            AppOutcome::Failed { .. }
        ));
        assert_eq!(links_of(report.app("kitty").unwrap()).succeeded.len(), 1);
    }

    #[test]
    fn refresh_and_scripts_run_after_success() {
        let fx = Fixture::new(
            "[app.kitty]\nconfig_dir = \"{home}\"\nrefresh_cmd = \"pkill -USR1 kitty\"\n",
        );
        fx.file("kitty/generated/nord-dark.kitty.conf", "k");
        fx.file("kitty/generated/nord-dark.theme.conf", "t");
        fx.file("kitty/call/any-any.sh", "#!/bin/sh\n");
        let config = fx.config();
        let runner = RecordingRunner::new();

        let report = run(&config, "nord", "dark", &["kitty"], false, &runner);

        let commands = runner.commands();
        assert_eq!(commands.len(), 2, "one script then one refresh: {commands:?}");
        assert!(commands[0].ends_with("any-any.sh'"));
        assert_eq!(commands[1], "pkill -USR1 kitty");
        assert!(runner.dirs().iter().all(|d| d == &config.app_dir("kitty")));
        assert!(matches!(
            &report.apps[0].outcome,
            AppOutcome::Applied { refresh: Some(run), .. } if run.succeeded()
        ));
    }

    #[test]
    fn second_run_is_idempotent() {
        let fx = Fixture::new("[app.kitty]\nconfig_dir = \"{home}\"\n");
        let artifact = fx.file("kitty/generated/nord-any.kitty.conf", "k");
        let config = fx.config();
        let runner = RecordingRunner::new();

        let first = run(&config, "nord", "dark", &["*"], false, &runner);
        let second = run(&config, "nord", "dark", &["*"], false, &runner);

        assert_eq!(first.failed_operations(), 0);
        assert_eq!(second.failed_operations(), 0);
        assert_eq!(
            links_of(&second.apps[0]).succeeded[0].status,
            LinkStatus::AlreadyLinked
        );
        assert_eq!(
            fs::read_link(fx.home().join("kitty.conf")).unwrap(),
            artifact
        );
    }

    #[test]
    fn dry_run_skips_refresh_and_mutation() {
        let fx = Fixture::new(
            "[app.kitty]\nconfig_dir = \"{home}\"\nrefresh_cmd = \"true\"\n",
        );
        fx.file("kitty/generated/any-any.kitty.conf", "k");
        fx.file("kitty/call/any-any.sh", "");
        let config = fx.config();
        let runner = RecordingRunner::new();

        let report = run(&config, "any", "any", &["*"], true, &runner);

        assert!(runner.commands().is_empty());
        assert!(fs::symlink_metadata(fx.home().join("kitty.conf")).is_err());
        assert_eq!(
            links_of(&report.apps[0]).succeeded[0].status,
            LinkStatus::WouldLink
        );
    }

    #[test]
    fn malformed_names_become_warnings() {
        let fx = Fixture::new("[app.kitty]\nconfig_dir = \"{home}\"\n");
        fx.file("kitty/generated/README", "");
        fx.file("kitty/generated/any-any.kitty.conf", "k");
        let config = fx.config();
        let runner = RecordingRunner::new();

        let report = run(&config, "any", "any", &["kitty"], false, &runner);

        assert_eq!(report.apps[0].warnings.len(), 1);
        assert!(report.apps[0].warnings[0].contains("README"));
        assert_eq!(links_of(&report.apps[0]).succeeded.len(), 1);
    }
}
