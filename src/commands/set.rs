//! Command: switch every selected app to a palette and scheme.
use anyhow::Result;
use std::path::Path;

use super::{CommandSetup, version};
use crate::appearance;
use crate::cli::{GlobalOpts, SetOpts};
use crate::exec::ShellRunner;
use crate::link::{CommandRun, LinkStatus};
use crate::logging::{Log, Logger};
use crate::operations::SystemFileSystemOps;
use crate::theme::{ThemeRequest, WildcardDetector};
use crate::update::{self, AppOutcome, AppReport, AppSelector, RunContext, RunReport};

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

/// Run the set command.
///
/// Per-link failures are reported but do not make the command fail.
///
/// # Errors
///
/// Returns an error if the config directory cannot be resolved or loaded.
pub fn run(global: &GlobalOpts, opts: &SetOpts, log: &Logger) -> Result<()> {
    log.info(&format!("autoconf {}", version()));
    let setup = CommandSetup::init(global, log)?;

    let request = ThemeRequest::new(opts.palette.as_str(), opts.scheme.as_str());
    let ctx = RunContext::new(
        &setup.config,
        request,
        &WildcardDetector,
        AppSelector::from_args(&opts.app),
        setup.platform,
        global.dry_run,
    );
    log.stage(&format!("Applying theme {}", ctx.theme));

    let runner = ShellRunner;
    if !opts.no_appearance {
        if global.dry_run {
            for cmd in appearance::commands(ctx.platform.os, &ctx.theme.scheme) {
                log.dry_run(&format!("would run: {cmd}"));
            }
        } else {
            let runs = appearance::apply(
                &runner,
                ctx.platform.os,
                &ctx.theme.scheme,
                &setup.config.config_dir,
            );
            render_commands(&runs, log);
        }
    }

    let report = update::update_apps(&ctx, &SystemFileSystemOps, &runner);
    render_report(&report, &setup.config.config_dir, log);
    log.print_summary();

    if log.has_failures() {
        log.warn(&format!(
            "{} link operation(s) failed across {} app(s)",
            report.failed_operations(),
            log.failure_count()
        ));
    }
    Ok(())
}

/// Write `report` through `log`, one stage per app, and record app statuses.
pub fn render_report(report: &RunReport, config_dir: &Path, log: &dyn Log) {
    for app in &report.apps {
        log.stage(&app.app);
        render_app(app, config_dir, log);
        for warning in &app.warnings {
            log.warn(warning);
        }
        let (status, message) = app.status(report.dry_run);
        log.record_app(&app.app, status, message.as_deref());
    }
}

fn render_app(app: &AppReport, config_dir: &Path, log: &dyn Log) {
    match &app.outcome {
        AppOutcome::Applied { links, refresh } => {
            for success in &links.succeeded {
                let line = format!(
                    "✓ {} :: {} -> {}",
                    app.app,
                    success.operation.from_path.display(),
                    relative_to(&success.operation.to_path, config_dir)
                );
                match success.status {
                    LinkStatus::WouldLink => log.dry_run(&line),
                    LinkStatus::AlreadyLinked => {
                        log.info(&format!("{GREEN}{line} (already linked){RESET}"));
                    }
                    LinkStatus::Linked => log.info(&format!("{GREEN}{line}{RESET}")),
                }
            }
            for failure in &links.failed {
                log.error(&format!(
                    "{RED}✗ {} :: {} -> {} ({}){RESET}",
                    app.app,
                    failure.operation.from_path.display(),
                    relative_to(&failure.operation.to_path, config_dir),
                    failure.error
                ));
            }
            render_commands(&links.scripts, log);
            if let Some(refresh) = refresh {
                render_commands(std::slice::from_ref(refresh), log);
            }
        }
        AppOutcome::NotRegistered => log.warn(&format!("{} is not registered", app.app)),
        AppOutcome::Unsupported { os } => {
            log.debug(&format!("{} does not support {os}", app.app));
        }
        AppOutcome::Conflict { reason } => log.warn(reason),
        AppOutcome::Failed { reason } => log.error(&format!("{RED}✗ {reason}{RESET}")),
    }
}

/// Dim the output of each command; failures become warnings.
fn render_commands(runs: &[CommandRun], log: &dyn Log) {
    for run in runs {
        match &run.result {
            Ok(result) => {
                for line in result.stdout.lines().chain(result.stderr.lines()) {
                    log.info(&format!("{DIM}  {line}{RESET}"));
                }
                if !result.success {
                    let code = result
                        .code
                        .map_or_else(|| "signal".to_string(), |c| c.to_string());
                    log.warn(&format!("{} exited with {code}", run.label));
                }
            }
            Err(e) => log.warn(&format!("{} could not run: {e}", run.label)),
        }
    }
}

/// `path` relative to `base` when it lies below it, else in full.
fn relative_to(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .display()
        .to_string()
}
