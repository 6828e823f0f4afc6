//! Per-application theme switching.
//!
//! Each registered application keeps its themed config variants as
//! artifacts named `<palette>-<scheme>.<logical name>` under
//! `apps/<app>/`. A run resolves the requested palette and scheme against
//! those names, with `any` acting as a wildcard, and points the app's real
//! config files at the winners through symlinks.
//!
//! - **[`config`]** locates the config directory and loads `app_registry.toml`
//! - **[`theme`]** catalogs artifacts and picks the best match per logical name
//! - **[`link`]** plans and applies the symlinks, then runs reload scripts
//! - **[`update`]** drives the pipeline for every selected app
//! - **[`render`]** generates artifacts from palette colours and templates
//! - **[`commands`]** wires it all to the `set` and `generate` subcommands
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod appearance;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod link;
pub mod logging;
pub mod operations;
pub mod platform;
pub mod render;
pub mod theme;
pub mod update;
