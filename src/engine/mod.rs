//! engine
//!
//! Orchestrates an export run: Open -> Scan -> Export.
//!
//! # Architecture
//!
//! 1. **Open**: pick the input adapter ([`open_source`]); a malformed
//!    container descriptor stops the run here
//! 2. **Scan**: build and freeze the type registry ([`scan::build_registry`])
//! 3. **Export**: decode, resolve, emit and write each object of the
//!    requested kinds ([`export::Exporter`])
//!
//! # Invariants
//!
//! - Export never starts before the registry is frozen; the exporter only
//!   accepts a [`TypeRegistry`](crate::registry::TypeRegistry)
//! - Per-object failures are skips recorded in the [`ExportReport`]
//! - The destination is only written to, never cleared
//!
//! # Example
//!
//! ```no_run
//! use cfxml::engine::{export, ExportOptions};
//! use cfxml::store::FsStore;
//!
//! let input = FsStore::new("unpacked");
//! let output = FsStore::new("out");
//! let report = export(&input, &output, &ExportOptions::default())?;
//! println!("{report}");
//! # Ok::<(), cfxml::engine::ExportError>(())
//! ```

pub mod export;
pub mod report;
pub mod scan;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

pub use export::Exporter;
pub use report::{ExportReport, ExportedObject, Phase, SkippedObject};
pub use scan::{build_registry, RegistryScan};

use crate::core::config::Config;
use crate::core::types::{InputFormat, MetadataKind};
use crate::resolve::ResolveOptions;
use crate::source::{ContainerSource, IntermediateSource, MetadataSource, SourceError};
use crate::store::{FileStore, StoreError};

/// Errors that stop an export run.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The container itself is unusable.
    #[error("malformed container: {0}")]
    Malformed(#[source] SourceError),

    /// The input could not be listed.
    #[error("failed to read input: {0}")]
    Source(#[source] SourceError),

    /// A file could not be written.
    #[error("failed to write output: {0}")]
    Store(#[from] StoreError),

    /// Strict mode and something was skipped.
    #[error("strict mode: {} objects and {} children skipped", .0.skipped.len(), .0.diagnostics.skipped_children.len())]
    Strict(Box<ExportReport>),
}

impl From<SourceError> for ExportError {
    fn from(err: SourceError) -> Self {
        if err.is_malformed_container() {
            ExportError::Malformed(err)
        } else {
            ExportError::Source(err)
        }
    }
}

/// Settings for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportOptions {
    pub format: InputFormat,
    /// Kinds to export, in output order.
    pub kinds: Vec<MetadataKind>,
    pub resolve: ResolveOptions,
    /// Fail the run when anything was skipped.
    pub strict: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: InputFormat::Auto,
            kinds: MetadataKind::EXPORTABLE.to_vec(),
            resolve: ResolveOptions::default(),
            strict: false,
        }
    }
}

impl ExportOptions {
    /// Options from configuration; CLI flags are applied on top by the caller.
    pub fn from_config(config: &Config) -> Self {
        Self {
            format: config.input_format(),
            kinds: config.kinds(),
            resolve: ResolveOptions {
                modules: config.modules(),
                form_definitions: config.form_definitions(),
            },
            strict: config.strict(),
        }
    }

    /// Requested kinds in export order, deduplicated.
    fn ordered_kinds(&self) -> Vec<MetadataKind> {
        MetadataKind::EXPORTABLE
            .into_iter()
            .filter(|kind| self.kinds.contains(kind))
            .collect()
    }
}

/// Resolve `Auto` against what the store holds.
pub fn detect_format(store: &dyn FileStore) -> InputFormat {
    if ContainerSource::locate(store).is_some() {
        InputFormat::Container
    } else {
        InputFormat::Intermediate
    }
}

/// Open the input adapter for `format`.
///
/// # Errors
///
/// Fails when the container descriptor or header file is unusable.
pub fn open_source<'a>(
    store: &'a dyn FileStore,
    format: InputFormat,
) -> Result<Box<dyn MetadataSource + 'a>, SourceError> {
    let format = match format {
        InputFormat::Auto => detect_format(store),
        explicit => explicit,
    };
    debug!(format = format.as_str(), "opening input");
    Ok(match format {
        InputFormat::Intermediate => Box::new(IntermediateSource::new(store)),
        _ => Box::new(ContainerSource::open(store)?),
    })
}

/// Run a full export from `input` to `output`.
///
/// # Errors
///
/// See [`ExportError`]; skipped objects are not errors unless
/// `options.strict` is set.
pub fn export(
    input: &dyn FileStore,
    output: &dyn FileStore,
    options: &ExportOptions,
) -> Result<ExportReport, ExportError> {
    let source = open_source(input, options.format)?;
    let mut report = ExportReport::new(source.format());

    let RegistryScan { registry, skipped } = build_registry(source.as_ref())?;
    report.registry = registry.stats();
    report.skipped = skipped;

    let exporter = Exporter::new(source.as_ref(), &registry, output, options.resolve);
    for kind in options.ordered_kinds() {
        exporter.export_kind(kind, &mut report)?;
    }

    if options.strict && report.has_skips() {
        return Err(ExportError::Strict(Box::new(report)));
    }
    Ok(report)
}
