//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Errors only

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::core::types::{InputFormat, MetadataKind};

/// cfxml - Decode 1C configuration containers into canonical metadata XML
#[derive(Parser, Debug)]
#[command(name = "cfxml")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Errors only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Export catalogs and common modules to XML
    #[command(
        name = "export",
        long_about = "Export metadata objects to canonical XML and module files.\n\n\
            The export runs in two phases. First every catalog, document and defined \
            type is scanned to build the type registry. Then each catalog and common \
            module is decoded, its attribute types are resolved against the registry, \
            and the XML and module text are written under DEST.\n\n\
            Objects and children that cannot be decoded are skipped and listed in the \
            summary. Existing files in DEST are overwritten; nothing is deleted.",
        after_help = "\
EXAMPLES:
    # Export an unpacked container
    cfxml export ./unpacked ./out

    # Export only catalogs from an intermediate tree
    cfxml export ./tree ./out --format intermediate --kind Catalog

    # Fail the run if anything was skipped
    cfxml export ./unpacked ./out --strict"
    )]
    Export {
        /// Unpacked container or intermediate tree
        source: PathBuf,

        /// Destination directory
        dest: PathBuf,

        /// Input format [default: from config, else auto]
        #[arg(long, value_parser = parse_format)]
        format: Option<InputFormat>,

        /// Kind to export; repeatable [default: all exportable kinds]
        #[arg(long = "kind", value_name = "KIND", value_parser = parse_kind)]
        kinds: Vec<MetadataKind>,

        /// Do not write module text
        #[arg(long)]
        no_modules: bool,

        /// Do not write embedded form definitions
        #[arg(long)]
        no_form_definitions: bool,

        /// Exit with an error when anything was skipped
        #[arg(long)]
        strict: bool,
    },

    /// Print a record file as JSON
    #[command(
        name = "inspect",
        after_help = "\
EXAMPLES:
    # Whole record
    cfxml inspect ./unpacked/root

    # The catalog header section
    cfxml inspect ./unpacked/0a1b... --path 0.1.9.1"
    )]
    Inspect {
        /// Record file
        file: PathBuf,

        /// Index path into the record, such as 0.1.9 or [0][1][9]
        #[arg(long)]
        path: Option<String>,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        after_help = "\
EXAMPLES:
    # Bash
    cfxml completion bash > ~/.local/share/bash-completion/completions/cfxml

    # Zsh
    cfxml completion zsh > ~/.zfunc/_cfxml"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print where configuration files are read from
    Path,
}

/// Supported shells for completion.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

fn parse_format(value: &str) -> Result<InputFormat, String> {
    value.parse().map_err(|e: crate::core::types::TypeError| e.to_string())
}

fn parse_kind(value: &str) -> Result<MetadataKind, String> {
    crate::core::config::schema::parse_exportable(value).map_err(|e| e.to_string())
}
