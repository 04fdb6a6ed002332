//! engine::scan
//!
//! Registry construction: the first of the two export phases.
//!
//! # Architecture
//!
//! The scanner walks every referenceable object of the source (defined
//! types, catalogs, documents), reads only its type identifier and name,
//! and freezes the result into a [`TypeRegistry`]. Export proper starts
//! only once this returns, so every attribute type is resolved against
//! the complete registry.
//!
//! # Invariants
//!
//! - Scan is read-only
//! - An object that cannot be read is left out of the registry and
//!   reported; it never aborts the scan
//! - Failure to list a kind is fatal

use tracing::debug;

use super::report::{Phase, SkippedObject};
use crate::core::types::{MetadataKind, ObjectId};
use crate::decode::registry_entry;
use crate::registry::{ReferenceKind, TypeRegistry, TypeRegistryBuilder};
use crate::source::{MetadataSource, ObjectHandle, SourceError};

/// Output of the registry phase.
#[derive(Debug)]
pub struct RegistryScan {
    pub registry: TypeRegistry,
    /// Objects left out of the registry.
    pub skipped: Vec<SkippedObject>,
}

/// Build the type registry from every referenceable object of `source`.
///
/// # Errors
///
/// Returns `SourceError` only when a kind cannot be listed.
pub fn build_registry(source: &dyn MetadataSource) -> Result<RegistryScan, SourceError> {
    let mut builder = TypeRegistryBuilder::new();
    let mut skipped = Vec::new();

    for &kind in MetadataKind::REFERENCEABLE.iter() {
        let Some(reference_kind) = ReferenceKind::from_metadata_kind(kind) else {
            continue;
        };
        for handle in source.objects(kind)? {
            match read_entry(source, &handle) {
                Ok((type_id, name)) => {
                    debug!(%kind, %type_id, %name, "registered type");
                    builder.insert(reference_kind, type_id, name);
                }
                Err(err) => {
                    tracing::warn!(%kind, object = %handle.label, %err, "left out of type registry");
                    skipped.push(SkippedObject {
                        kind,
                        label: handle.label.clone(),
                        phase: Phase::Registry,
                        reason: err.to_string(),
                    });
                }
            }
        }
    }

    let registry = builder.build();
    debug!(stats = ?registry.stats(), "type registry frozen");
    Ok(RegistryScan { registry, skipped })
}

fn read_entry(
    source: &dyn MetadataSource,
    handle: &ObjectHandle,
) -> Result<(ObjectId, String), SourceError> {
    let raw = source.load(handle)?;
    Ok(registry_entry(&raw)?)
}
