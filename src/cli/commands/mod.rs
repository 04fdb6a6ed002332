//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Merges command-specific arguments over configuration
//! 2. Calls the library to do the work
//! 3. Formats and displays output
//!
//! Handlers return `anyhow::Result`; library errors are wrapped with
//! context naming what was being done.

mod completion;
mod config_cmd;
mod export;
mod inspect;

pub use completion::completion;
pub use config_cmd::{path as config_path, show as config_show};
pub use export::{export, ExportArgs};
pub use inspect::inspect;

use anyhow::Result;

use super::args::{Command, ConfigAction};
use crate::ui::output::Verbosity;

/// Per-invocation context shared by handlers.
#[derive(Debug, Clone)]
pub struct Context {
    pub verbosity: Verbosity,
    /// Directory searched for `.cfxml.toml`.
    pub cwd: std::path::PathBuf,
}

/// Dispatch a parsed command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Export {
            source,
            dest,
            format,
            kinds,
            no_modules,
            no_form_definitions,
            strict,
        } => export(
            ctx,
            ExportArgs {
                source,
                dest,
                format,
                kinds,
                no_modules,
                no_form_definitions,
                strict,
            },
        ),
        Command::Inspect { file, path } => inspect(&file, path.as_deref()),
        Command::Config { action } => match action {
            ConfigAction::Show => config_show(ctx),
            ConfigAction::Path => config_path(ctx),
        },
        Command::Completion { shell } => completion(shell),
    }
}
