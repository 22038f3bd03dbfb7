//! # dtok
//!
//! **CLI Binary**
//!
//! This is the entry point for the `dtok` command-line application.
//! It orchestrates the other crates to perform the requested actions.
//!
//! ## Responsibilities
//! * Parse command line arguments
//! * Load `dtok.toml`
//! * Install logging
//! * Dispatch commands to appropriate handlers
//! * Handle errors and exit codes
//!
//! This crate should contain minimal business logic.

mod commands;
mod config;
mod error_hints;
mod logging;

use anyhow::Result;
use clap::Parser;
use dtok_config::Cli;

pub use config::{ResolvedConfig, resolve_change_options, resolve_scan_options};

/// Entry point used by the `dtok` binary.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.global.verbose);
    let resolved = config::load(&cli.global)?;
    commands::dispatch(cli, &resolved)
}

/// Render an error chain plus troubleshooting hints for stderr.
pub fn format_error(err: &anyhow::Error) -> String {
    error_hints::format(err)
}
