//! Command: render an app's templates for one palette.
use anyhow::Result;

use super::CommandSetup;
use crate::cli::{GenerateOpts, GlobalOpts};
use crate::logging::{AppStatus, Log, Logger};
use crate::render::{self, RenderJob, RenderedFile};

/// Run the generate command.
///
/// # Errors
///
/// Returns an error if configuration fails to load, the colours file,
/// template path or output directory is missing, or a template is invalid.
pub fn run(global: &GlobalOpts, opts: &GenerateOpts, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    let job = RenderJob::for_app(
        &setup.config,
        &opts.app,
        &opts.palette,
        opts.template.as_deref(),
        opts.output.as_deref(),
    );

    log.stage(&format!("Generating {} artifacts for {}", job.palette, opts.app));
    log.debug(&format!("colors: {}", job.colors.display()));
    log.debug(&format!("templates: {}", job.templates.display()));

    if global.dry_run {
        log.dry_run(&format!(
            "would render {} into {}",
            job.templates.display(),
            job.output_dir.display()
        ));
        log.record_app(&opts.app, AppStatus::DryRun, None);
        log.print_summary();
        return Ok(());
    }

    let rendered = render::generate(&job)?;
    report(&opts.app, &rendered, log);
    log.print_summary();
    Ok(())
}

/// Log each written artifact and record the app's status.
pub fn report(app: &str, rendered: &[RenderedFile], log: &dyn Log) {
    let mut skipped = 0;
    for file in rendered {
        log.info(&format!(
            "{} -> {} ({} line(s))",
            file.template.display(),
            file.output.display(),
            file.lines
        ));
        for err in &file.skipped {
            log.warn(&format!("  {err}"));
        }
        skipped += file.skipped.len();
    }

    let message = format!("{} file(s), {skipped} entry(ies) skipped", rendered.len());
    let status = if rendered.is_empty() {
        AppStatus::Skipped
    } else {
        AppStatus::Ok
    };
    log.record_app(app, status, Some(&message));
}
