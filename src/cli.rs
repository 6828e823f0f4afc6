//! Command-line interface definitions.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI entry point for the theme switcher.
#[derive(Parser, Debug)]
#[command(
    name = "autoconf",
    about = "Switch application configs between palettes and colour schemes",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Override the configuration directory (default: $XDG_CONFIG_HOME/autoconf)
    #[arg(short, long, global = true)]
    pub config_dir: Option<PathBuf>,

    /// Preview changes without applying
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Link every selected app to the artifacts for a palette and scheme
    #[command(alias = "update")]
    Set(SetOpts),
    /// Render an app's templates for a palette into artifacts
    Generate(GenerateOpts),
    /// Print version information
    Version,
}

/// Options for the `set` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct SetOpts {
    /// Palette name, `any`, or `auto`
    #[arg(short, long, default_value = "auto")]
    pub palette: String,

    /// Colour scheme (e.g. light, dark), `any`, or `auto`
    #[arg(short, long, default_value = "auto")]
    pub scheme: String,

    /// Apps to update; `*` selects every registered app
    #[arg(short, long, value_delimiter = ',', default_value = "*")]
    pub app: Vec<String>,

    /// Do not switch the desktop's light/dark preference
    #[arg(long)]
    pub no_appearance: bool,
}

/// Options for the `generate` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct GenerateOpts {
    /// App whose templates are rendered
    #[arg(short, long)]
    pub app: String,

    /// Palette whose colours fill the templates
    #[arg(short, long)]
    pub palette: String,

    /// Template file or directory (default: apps/<app>/templates)
    #[arg(short, long)]
    pub template: Option<PathBuf>,

    /// Output directory (default: apps/<app>/generated)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
