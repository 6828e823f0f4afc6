//! Subcommand orchestration.
pub mod generate;
pub mod set;

use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::config::{self, Config};
use crate::logging::Log;
use crate::platform::Platform;

/// Version string baked in at build time.
#[must_use]
pub fn version() -> &'static str {
    option_env!("AUTOCONF_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the version to stdout.
#[allow(clippy::print_stdout)]
pub fn print_version() {
    println!("autoconf {}", version());
}

/// Shared state produced by the common command setup sequence.
#[derive(Debug)]
pub struct CommandSetup {
    /// Detected platform.
    pub platform: Platform,
    /// Loaded config directory and registry.
    pub config: Config,
}

impl CommandSetup {
    /// Detect the platform, locate the config directory and load the registry.
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be determined, is
    /// missing its `apps/` subdirectory, or the registry fails to parse.
    pub fn init(global: &GlobalOpts, log: &dyn Log) -> Result<Self> {
        let platform = Platform::detect();
        let config_dir = config::resolve_config_dir(global.config_dir.as_deref())?;

        log.stage("Loading configuration");
        let config = Config::load(&config_dir)?;
        let shown = dunce::canonicalize(&config.config_dir)
            .unwrap_or_else(|_| config.config_dir.clone());
        log.info(&format!("config dir: {}", shown.display()));
        log.debug(&format!("platform: {}", platform.os));
        log.info(&format!("loaded {} registered app(s)", config.registry.len()));

        let warnings = config.validate();
        if !warnings.is_empty() {
            log.warn(&format!(
                "found {} configuration warning(s):",
                warnings.len()
            ));
            for warning in &warnings {
                log.warn(&format!(
                    "  {} [{}]: {}",
                    warning.source, warning.item, warning.message
                ));
            }
        }

        Ok(Self { platform, config })
    }
}
