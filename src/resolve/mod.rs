//! resolve
//!
//! Turn loaded records into complete metadata objects.
//!
//! # Overview
//!
//! A [`Resolver`] decodes one object record, pulls its children and
//! module text from the source and resolves attribute types against the
//! frozen [`TypeRegistry`]. The result is a [`MetadataObject`] ready for
//! emission.
//!
//! # Skip contract
//!
//! - A failure to decode the object itself, to list its children or to
//!   read its module text is returned as [`ResolveError`]; the caller
//!   skips the object
//! - A child that fails to load or decode is dropped and recorded in
//!   [`Diagnostics::skipped_children`]
//! - A type the decoder cannot pin down gets a fallback type and is
//!   recorded in [`Diagnostics::fallbacks`]
//!
//! Fallbacks are logged under the [`FALLBACK_TARGET`] tracing target so
//! they can be filtered apart from ordinary skips.

mod attributes;
mod catalog;
mod commands;
mod common_module;
mod forms;

use serde::Serialize;
use thiserror::Error;

pub use attributes::resolve_attributes;
pub use forms::{form_order, sniff_form_definition};

use crate::core::model::MetadataObject;
use crate::core::record::DecodeError;
use crate::core::types::{MetadataKind, ObjectId};
use crate::decode::RawObject;
use crate::registry::TypeRegistry;
use crate::source::{MetadataSource, ObjectHandle, SourceError};

/// Tracing target for fallback types.
pub const FALLBACK_TARGET: &str = "cfxml::fallback";

/// Errors that skip one object.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("{0} objects are not exported")]
    Unsupported(MetadataKind),
}

/// What to pull in besides the records themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolveOptions {
    pub modules: bool,
    pub form_definitions: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            modules: true,
            form_definitions: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChildKind {
    Attribute,
    Command,
    Form,
}

/// A child dropped from its parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedChild {
    pub parent: String,
    pub child_kind: ChildKind,
    pub child: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FallbackKind {
    /// Full definition with a marker other than `B`, `S` or `#`; typed Boolean.
    UnknownTypeMarker { marker: Option<String> },
    /// String type without a usable length; length 0.
    MissingStringLength,
    /// Override whose type id is missing or unknown; typed `cfg:AnyIBRef`.
    UnresolvedTypeReference { type_id: Option<ObjectId> },
}

/// An attribute typed by fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fallback {
    pub object: String,
    pub attribute: String,
    pub kind: FallbackKind,
}

/// Non-fatal findings collected during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    pub skipped_children: Vec<SkippedChild>,
    pub fallbacks: Vec<Fallback>,
}

impl Diagnostics {
    pub fn skip_child(
        &mut self,
        parent: &str,
        child_kind: ChildKind,
        child: impl Into<String>,
        reason: impl ToString,
    ) {
        let child = child.into();
        let reason = reason.to_string();
        tracing::warn!(%parent, ?child_kind, %child, %reason, "skipping child");
        self.skipped_children.push(SkippedChild {
            parent: parent.to_string(),
            child_kind,
            child,
            reason,
        });
    }

    pub fn is_clean(&self) -> bool {
        self.skipped_children.is_empty() && self.fallbacks.is_empty()
    }
}

/// Resolves objects of one source against one registry.
pub struct Resolver<'a> {
    source: &'a dyn MetadataSource,
    registry: &'a TypeRegistry,
    options: ResolveOptions,
}

impl<'a> Resolver<'a> {
    pub fn new(
        source: &'a dyn MetadataSource,
        registry: &'a TypeRegistry,
        options: ResolveOptions,
    ) -> Self {
        Self {
            source,
            registry,
            options,
        }
    }

    /// Resolve one exportable object.
    ///
    /// # Errors
    ///
    /// Returns `ResolveError` when the object has to be skipped.
    pub fn resolve(
        &self,
        handle: &ObjectHandle,
        raw: &RawObject,
        diagnostics: &mut Diagnostics,
    ) -> Result<MetadataObject, ResolveError> {
        match handle.kind {
            MetadataKind::Catalog => self
                .resolve_catalog(handle, raw, diagnostics)
                .map(MetadataObject::Catalog),
            MetadataKind::CommonModule => self
                .resolve_common_module(handle, raw)
                .map(MetadataObject::CommonModule),
            other => Err(ResolveError::Unsupported(other)),
        }
    }
}
