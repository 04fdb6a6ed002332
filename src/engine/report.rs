//! engine::report
//!
//! What an export run did: exported objects, skips and fallbacks.

use std::fmt;

use serde::Serialize;

use crate::core::types::{InputFormat, MetadataKind};
use crate::registry::RegistryStats;
use crate::resolve::Diagnostics;

/// Phase in which an object was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    /// Registry construction; the object's type is unknown to resolution.
    Registry,
    /// Decode, resolve or emit of an exportable object.
    Export,
}

/// An object dropped from the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedObject {
    pub kind: MetadataKind,
    pub label: String,
    pub phase: Phase,
    pub reason: String,
}

impl fmt::Display for SkippedObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.kind, self.label, self.reason)
    }
}

/// An object written to the destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportedObject {
    pub kind: MetadataKind,
    pub name: String,
    pub files: usize,
}

/// Outcome of one export run.
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    pub format: InputFormat,
    pub registry: RegistryStats,
    pub exported: Vec<ExportedObject>,
    pub skipped: Vec<SkippedObject>,
    pub diagnostics: Diagnostics,
}

impl ExportReport {
    pub fn new(format: InputFormat) -> Self {
        Self {
            format,
            registry: RegistryStats::default(),
            exported: Vec::new(),
            skipped: Vec::new(),
            diagnostics: Diagnostics::default(),
        }
    }

    pub(crate) fn skip(&mut self, kind: MetadataKind, label: &str, phase: Phase, reason: impl ToString) {
        let reason = reason.to_string();
        tracing::warn!(%kind, object = %label, ?phase, %reason, "skipping object");
        self.skipped.push(SkippedObject {
            kind,
            label: label.to_string(),
            phase,
            reason,
        });
    }

    /// Whether any object or child was dropped.
    pub fn has_skips(&self) -> bool {
        !self.skipped.is_empty() || !self.diagnostics.skipped_children.is_empty()
    }

    pub fn files_written(&self) -> usize {
        self.exported.iter().map(|object| object.files).sum()
    }

    /// Exported objects of `kind`.
    pub fn exported_count(&self, kind: MetadataKind) -> usize {
        self.exported.iter().filter(|object| object.kind == kind).count()
    }
}

impl fmt::Display for ExportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Exported {} objects ({} files) from {} input",
            self.exported.len(),
            self.files_written(),
            self.format.as_str()
        )?;
        writeln!(
            f,
            "Type registry: {} defined types, {} catalogs, {} documents",
            self.registry.defined_types, self.registry.catalogs, self.registry.documents
        )?;
        write!(
            f,
            "Skipped: {} objects, {} children; fallback types: {}",
            self.skipped.len(),
            self.diagnostics.skipped_children.len(),
            self.diagnostics.fallbacks.len()
        )
    }
}
