//! source::intermediate
//!
//! Intermediate form: one directory per object.
//!
//! # Layout
//!
//! ```text
//! <root>/<Kind>/<Object>/
//!   <Kind>.json                 {name, name2, comment, header}
//!   <Kind>.id.json              {uuid}
//!   <Kind>.obj.bsl              object module
//!   <Kind>.mgr.bsl              manager module
//!   <Kind>.<n>                  companion files
//!   Предустановленные данные.bin
//!   CatalogCommand/<Child>/     child objects, same layout
//!   CatalogForm/<Child>/
//! ```
//!
//! Children carry no order of their own. They are ordered by matching
//! their identifiers against the parent record's include list; children
//! the list does not mention follow, sorted by directory name.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use super::includes::files_of_kind;
use super::{decode_text, MetadataSource, ModuleSlot, ObjectHandle, SourceError};
use crate::core::record::{strip_bom, Record};
use crate::core::types::{InputFormat, MetadataKind, ObjectId, Synonym};
use crate::decode::{Descriptor, RawObject};
use crate::store::FileStore;

/// Predefined-data marker file.
pub const PREDEFINED_DATA_FILE: &str = "Предустановленные данные.bin";

/// `<Kind>.json`
#[derive(Debug, Deserialize)]
struct HeaderFile {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    name2: Option<Synonym>,
    #[serde(default)]
    comment: Option<String>,
    header: Record,
}

/// `<Kind>.id.json`
#[derive(Debug, Default, Deserialize)]
struct IdFile {
    #[serde(default)]
    uuid: Option<String>,
}

/// Intermediate tree opened for reading.
pub struct IntermediateSource<'a> {
    store: &'a dyn FileStore,
    root: PathBuf,
}

impl<'a> IntermediateSource<'a> {
    pub fn new(store: &'a dyn FileStore) -> Self {
        Self {
            store,
            root: PathBuf::new(),
        }
    }

    /// Whether the store looks like an intermediate tree.
    pub fn detect(store: &dyn FileStore) -> bool {
        MetadataKind::ALL
            .iter()
            .any(|kind| store.is_dir(Path::new(kind.as_str())))
    }

    fn file(handle: &ObjectHandle, suffix: &str) -> PathBuf {
        handle
            .location
            .join(format!("{}.{suffix}", handle.kind.as_str()))
    }

    fn read_json<T: for<'de> Deserialize<'de>>(&self, path: &Path) -> Result<T, SourceError> {
        let bytes = self.store.read(path)?;
        serde_json::from_slice(strip_bom(&bytes)).map_err(|source| {
            SourceError::Json {
                path: path.to_path_buf(),
                source,
            }
        })
    }

    fn object_id(&self, handle: &ObjectHandle) -> Result<Option<ObjectId>, SourceError> {
        let path = Self::file(handle, "id.json");
        if !self.store.exists(&path) {
            return Ok(None);
        }
        let id: IdFile = self.read_json(&path)?;
        Ok(id.uuid.and_then(|uuid| ObjectId::parse(&uuid).ok()))
    }

    /// Object directories under `dir`, sorted by name.
    fn object_dirs(&self, dir: &Path, kind: MetadataKind) -> Result<Vec<ObjectHandle>, SourceError> {
        if !self.store.is_dir(dir) {
            return Ok(Vec::new());
        }
        Ok(self
            .store
            .list_dir(dir)?
            .into_iter()
            .filter(|name| self.store.is_dir(&dir.join(name)))
            .map(|name| ObjectHandle::new(kind, dir.join(&name), name))
            .collect())
    }
}

impl MetadataSource for IntermediateSource<'_> {
    fn format(&self) -> InputFormat {
        InputFormat::Intermediate
    }

    fn objects(&self, kind: MetadataKind) -> Result<Vec<ObjectHandle>, SourceError> {
        self.object_dirs(&self.root.join(kind.as_str()), kind)
    }

    fn load(&self, handle: &ObjectHandle) -> Result<RawObject, SourceError> {
        let header: HeaderFile = self.read_json(&Self::file(handle, "json"))?;
        let descriptor = Descriptor {
            id: self.object_id(handle)?,
            name: header.name,
            synonym: header.name2,
            comment: header.comment,
        };
        Ok(RawObject::new(handle.kind, header.header).with_descriptor(descriptor))
    }

    fn children(
        &self,
        parent: &ObjectHandle,
        parent_raw: &RawObject,
        kind: MetadataKind,
    ) -> Result<Vec<ObjectHandle>, SourceError> {
        let listed: Vec<Option<ObjectId>> = files_of_kind(&parent_raw.cursor().at(0)?, kind)?
            .iter()
            .map(|file| ObjectId::parse(file).ok())
            .collect();

        let mut ranked = Vec::new();
        for child in self.object_dirs(&parent.location.join(kind.as_str()), kind)? {
            let id = self.object_id(&child).unwrap_or_else(|err| {
                debug!(child = %child.label, %err, "unreadable child id");
                None
            });
            let rank = id.and_then(|id| listed.iter().position(|l| *l == Some(id)));
            ranked.push((rank.unwrap_or(usize::MAX), child));
        }
        // Stable: unlisted children keep their name order
        ranked.sort_by_key(|(rank, _)| *rank);
        Ok(ranked.into_iter().map(|(_, child)| child).collect())
    }

    fn module(&self, handle: &ObjectHandle, slot: ModuleSlot) -> Result<Option<String>, SourceError> {
        let suffix = match slot {
            ModuleSlot::Object | ModuleSlot::Form => "obj.bsl",
            ModuleSlot::Manager => "mgr.bsl",
        };
        let path = Self::file(handle, suffix);
        if !self.store.exists(&path) {
            return Ok(None);
        }
        let bytes = self.store.read(&path)?;
        decode_text(&bytes)
            .map(|text| Some(text.into_owned()))
            .ok_or(SourceError::Encoding(path))
    }

    fn companion(&self, handle: &ObjectHandle, suffix: &str) -> Result<Option<Vec<u8>>, SourceError> {
        let path = Self::file(handle, suffix);
        if !self.store.exists(&path) {
            return Ok(None);
        }
        Ok(Some(self.store.read(&path)?))
    }

    fn has_predefined_data(&self, handle: &ObjectHandle) -> bool {
        self.store
            .exists(&handle.location.join(PREDEFINED_DATA_FILE))
    }
}
