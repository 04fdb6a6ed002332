//! cli
//!
//! Command-line interface layer for cfxml.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Install logging at the requested verbosity
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap and dispatches to
//! the [`crate::engine`] for the export itself.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use anyhow::{Context as _, Result};

use crate::ui::{logging, output::Verbosity};

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    let verbosity = Verbosity::from_flags(cli.quiet, cli.debug);
    logging::init(verbosity);

    let ctx = commands::Context {
        verbosity,
        cwd: std::env::current_dir().context("Failed to read working directory")?,
    };

    commands::dispatch(cli.command, &ctx)
}
