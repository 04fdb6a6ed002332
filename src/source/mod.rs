//! source
//!
//! Input adapters: where object records, child records and module text
//! come from.
//!
//! # Adapters
//!
//! - [`ContainerSource`] - An unpacked container directory: a root
//!   descriptor, a header file with include groups, one record file per
//!   object and companion files next to it
//! - [`IntermediateSource`] - Per-kind directories of JSON headers and
//!   module files, as written by earlier unpack tools
//!
//! Both adapters hand out the same [`RawObject`]s, so everything after
//! loading is shared and both inputs yield identical output.
//!
//! # Failure contract
//!
//! - [`MetadataSource::objects`] failures are fatal for the run
//! - [`MetadataSource::load`], [`MetadataSource::children`] and
//!   [`MetadataSource::module`] failures skip one object
//! - Companion and child-load failures drop one child

mod container;
mod includes;
mod intermediate;

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub use container::ContainerSource;
pub use includes::{files_of_kind, include_entries, IncludeEntry};
pub use intermediate::IntermediateSource;

use crate::core::record::{parse, strip_bom, DecodeError, MalformedContainerError, Record};
use crate::core::types::{InputFormat, MetadataKind};
use crate::decode::RawObject;
use crate::store::StoreError;

/// Errors from input adapters.
#[derive(Debug, Error)]
pub enum SourceError {
    /// A record file is not valid brace syntax.
    #[error("malformed record {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: MalformedContainerError,
    },

    /// A record parsed but does not have the expected shape.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// An intermediate JSON file could not be read.
    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Module text in an unsupported encoding.
    #[error("undecodable text in {}", .0.display())]
    Encoding(PathBuf),
}

impl SourceError {
    /// Whether this error means the container itself is unusable.
    pub fn is_malformed_container(&self) -> bool {
        matches!(self, SourceError::Malformed { .. })
    }
}

/// Which module text of an object to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleSlot {
    /// Object module of a catalog, or the only module of a common module.
    Object,
    Manager,
    Form,
}

/// Handle to one object in a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectHandle {
    pub kind: MetadataKind,
    /// Record file (container) or object directory (intermediate),
    /// relative to the source store.
    pub location: PathBuf,
    /// Short name used in logs and reports.
    pub label: String,
}

impl ObjectHandle {
    pub fn new(kind: MetadataKind, location: impl Into<PathBuf>, label: impl Into<String>) -> Self {
        Self {
            kind,
            location: location.into(),
            label: label.into(),
        }
    }
}

/// An input adapter.
pub trait MetadataSource {
    fn format(&self) -> InputFormat;

    /// Every object of `kind`, in source order.
    fn objects(&self, kind: MetadataKind) -> Result<Vec<ObjectHandle>, SourceError>;

    /// Load the record of one object.
    fn load(&self, handle: &ObjectHandle) -> Result<RawObject, SourceError>;

    /// Children of `kind` listed by the parent, in the parent's include order.
    fn children(
        &self,
        parent: &ObjectHandle,
        parent_raw: &RawObject,
        kind: MetadataKind,
    ) -> Result<Vec<ObjectHandle>, SourceError>;

    /// Module text, BOM stripped; `None` when the object has none.
    fn module(&self, handle: &ObjectHandle, slot: ModuleSlot) -> Result<Option<String>, SourceError>;

    /// Raw bytes of a companion file such as `<object>.0`.
    fn companion(&self, handle: &ObjectHandle, suffix: &str) -> Result<Option<Vec<u8>>, SourceError>;

    /// Whether the object ships predefined data.
    fn has_predefined_data(&self, handle: &ObjectHandle) -> bool;
}

/// Decode text stored as UTF-8 (BOM optional) or windows-1251.
pub fn decode_text(bytes: &[u8]) -> Option<Cow<'_, str>> {
    let bytes = strip_bom(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => Some(Cow::Borrowed(text)),
        Err(_) => encoding_rs::WINDOWS_1251.decode_without_bom_handling_and_without_replacement(bytes),
    }
}

/// Parse a record file, attributing syntax errors to `path`.
pub(crate) fn parse_record(path: &Path, bytes: &[u8]) -> Result<Record, SourceError> {
    parse(bytes).map_err(|source| SourceError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

/// `path` with `.suffix` appended to its file name.
pub(crate) fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}
