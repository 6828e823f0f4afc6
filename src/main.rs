//! `autoconf` command-line entry point.
use anyhow::Result;
use clap::Parser;

use autoconf_cli::{cli, commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();

    let command = match &args.command {
        cli::Command::Set(_) => "set",
        cli::Command::Generate(_) => "generate",
        cli::Command::Version => "version",
    };
    logging::init_subscriber(args.verbose, command);
    let log = logging::Logger::new(command);

    match args.command {
        cli::Command::Set(opts) => commands::set::run(&args.global, &opts, &log),
        cli::Command::Generate(opts) => commands::generate::run(&args.global, &opts, &log),
        cli::Command::Version => {
            commands::print_version();
            Ok(())
        }
    }
}
