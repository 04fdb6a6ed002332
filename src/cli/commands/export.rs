//! export command - Two-phase export of a container to XML

use std::path::PathBuf;

use anyhow::{bail, Context as _, Result};

use super::Context;
use crate::core::config::Config;
use crate::core::types::{InputFormat, MetadataKind};
use crate::engine::{self, ExportError, ExportOptions, ExportReport};
use crate::store::FsStore;
use crate::ui::output::{self, Verbosity};

/// Arguments of `cfxml export`.
#[derive(Debug, Clone)]
pub struct ExportArgs {
    pub source: PathBuf,
    pub dest: PathBuf,
    pub format: Option<InputFormat>,
    pub kinds: Vec<MetadataKind>,
    pub no_modules: bool,
    pub no_form_definitions: bool,
    pub strict: bool,
}

impl ExportArgs {
    /// Apply flags over configured defaults.
    fn options(&self, config: &Config) -> ExportOptions {
        let mut options = ExportOptions::from_config(config);
        if let Some(format) = self.format {
            options.format = format;
        }
        if !self.kinds.is_empty() {
            options.kinds = self.kinds.clone();
        }
        if self.no_modules {
            options.resolve.modules = false;
        }
        if self.no_form_definitions {
            options.resolve.form_definitions = false;
        }
        options.strict |= self.strict;
        options
    }
}

/// Run the export and print its summary.
pub fn export(ctx: &Context, args: ExportArgs) -> Result<()> {
    if !args.source.is_dir() {
        bail!("source '{}' is not a directory", args.source.display());
    }
    let config = Config::load(Some(&ctx.cwd)).context("Failed to load config")?;
    let options = args.options(&config);

    let input = FsStore::new(&args.source);
    let output = FsStore::new(&args.dest);

    match engine::export(&input, &output, &options) {
        Ok(report) => {
            summarize(&report, ctx.verbosity);
            Ok(())
        }
        Err(ExportError::Strict(report)) => {
            summarize(&report, ctx.verbosity);
            Err(ExportError::Strict(report)).context("Export incomplete")
        }
        Err(err) => Err(err).with_context(|| {
            format!("Failed to export '{}'", args.source.display())
        }),
    }
}

fn summarize(report: &ExportReport, verbosity: Verbosity) {
    output::print(report, verbosity);
    if !report.skipped.is_empty() {
        output::warn(
            format!("skipped objects:\n{}", output::format_list(&report.skipped, "  - ")),
            verbosity,
        );
    }
    if !report.diagnostics.skipped_children.is_empty() {
        let children: Vec<String> = report
            .diagnostics
            .skipped_children
            .iter()
            .map(|c| format!("{} {:?} {}: {}", c.parent, c.child_kind, c.child, c.reason))
            .collect();
        output::warn(
            format!("skipped children:\n{}", output::format_list(&children, "  - ")),
            verbosity,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> ExportArgs {
        ExportArgs {
            source: "in".into(),
            dest: "out".into(),
            format: None,
            kinds: Vec::new(),
            no_modules: false,
            no_form_definitions: false,
            strict: false,
        }
    }

    #[test]
    fn flags_override_config() {
        let config = Config::default();
        let options = ExportArgs {
            format: Some(InputFormat::Intermediate),
            kinds: vec![MetadataKind::CommonModule],
            no_modules: true,
            strict: true,
            ..args()
        }
        .options(&config);

        assert_eq!(options.format, InputFormat::Intermediate);
        assert_eq!(options.kinds, vec![MetadataKind::CommonModule]);
        assert!(!options.resolve.modules);
        assert!(options.resolve.form_definitions);
        assert!(options.strict);
    }

    #[test]
    fn defaults_come_from_config() {
        let options = args().options(&Config::default());
        assert_eq!(options, ExportOptions::default());
    }
}
