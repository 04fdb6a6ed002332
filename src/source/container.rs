//! source::container
//!
//! Unpacked container directories.
//!
//! # Layout
//!
//! ```text
//! <container>/
//!   configinfo | root        root descriptor naming the header file
//!   <header>                 include groups listing every object file
//!   <object>                 one record per object
//!   <object>.0               object module (`text` inside when unpacked)
//!                            or form definition / form module (`module`)
//!   <object>.1               second form definition candidate
//!   <object>.2               manager module
//!   <object>.1c              predefined data
//! ```
//!
//! The container may also be one of up to two subdirectories of the given
//! directory; the last one by name is used.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::includes::{files_of_kind, include_entries, IncludeEntry};
use super::{
    decode_text, parse_record, with_suffix, MetadataSource, ModuleSlot, ObjectHandle, SourceError,
};
use crate::core::record::{Cursor, DecodeError, MalformedContainerError, Record};
use crate::core::types::{is_known_include_group, InputFormat, MetadataKind};
use crate::decode::RawObject;
use crate::store::FileStore;

const CONFIG_INFO: &str = "configinfo";
const ROOT_DESCRIPTOR: &str = "root";

/// Header file name position within each descriptor.
const CONFIG_INFO_HEADER: [usize; 2] = [1, 1];
const ROOT_DESCRIPTOR_HEADER: [usize; 2] = [0, 1];

/// Group version whose include block is nested one level deeper.
const NESTED_GROUP_VERSION: &str = "6";

/// Container directory opened for reading.
pub struct ContainerSource<'a> {
    store: &'a dyn FileStore,
    root: PathBuf,
    entries: Vec<IncludeEntry>,
}

impl<'a> ContainerSource<'a> {
    /// Whether `dir` holds a root descriptor.
    pub fn has_descriptor(store: &dyn FileStore, dir: &Path) -> bool {
        store.exists(&dir.join(CONFIG_INFO)) || store.exists(&dir.join(ROOT_DESCRIPTOR))
    }

    /// Find the container directory within the store, if there is one.
    pub fn locate(store: &dyn FileStore) -> Option<PathBuf> {
        let here = PathBuf::new();
        if Self::has_descriptor(store, &here) {
            return Some(here);
        }
        // Only the last entry by name is a candidate; it may be a file.
        let last = store.list_dir(&here).ok()?.pop()?;
        let candidate = PathBuf::from(last);
        (store.is_dir(&candidate) && Self::has_descriptor(store, &candidate)).then_some(candidate)
    }

    /// Read the root descriptor and the include groups.
    ///
    /// # Errors
    ///
    /// Any failure here is fatal: a missing or malformed descriptor or
    /// header file, or include groups that do not have the expected shape.
    pub fn open(store: &'a dyn FileStore) -> Result<Self, SourceError> {
        let root = Self::locate(store).unwrap_or_default();
        let header_path = root.join(header_file_name(store, &root)?);
        let header = parse_record(&header_path, &store.read(&header_path)?)?;
        let entries = root_entries(&header).map_err(|err| SourceError::Malformed {
            path: header_path.clone(),
            source: err.into(),
        })?;
        debug!(root = %root.display(), objects = entries.len(), "opened container");
        Ok(Self {
            store,
            root,
            entries,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Every object file listed by the include groups.
    pub fn entries(&self) -> &[IncludeEntry] {
        &self.entries
    }

    fn handle(&self, kind: MetadataKind, file: &str) -> ObjectHandle {
        ObjectHandle::new(kind, self.root.join(file), file)
    }

    fn read_text(&self, path: &Path) -> Result<Option<String>, SourceError> {
        if !self.store.exists(path) {
            return Ok(None);
        }
        let bytes = self.store.read(path)?;
        decode_text(&bytes)
            .map(|text| Some(text.into_owned()))
            .ok_or_else(|| SourceError::Encoding(path.to_path_buf()))
    }
}

/// Header file name from `configinfo` (`[1][1]`) or `root` (`[0][1]`).
fn header_file_name(store: &dyn FileStore, root: &Path) -> Result<String, SourceError> {
    let (path, position) = if store.exists(&root.join(CONFIG_INFO)) {
        (root.join(CONFIG_INFO), CONFIG_INFO_HEADER)
    } else {
        (root.join(ROOT_DESCRIPTOR), ROOT_DESCRIPTOR_HEADER)
    };
    let record = parse_record(&path, &store.read(&path)?)?;
    descriptor_cursor(&record)
        .at_path(&position)
        .and_then(|c| c.text())
        .map_err(|err| SourceError::Malformed {
            path,
            source: MalformedContainerError::from(err),
        })
}

/// Container-level records are not metadata objects; the kind is dropped
/// when the error becomes `MalformedContainerError::Structure`.
fn descriptor_cursor(record: &Record) -> Cursor<'_> {
    Cursor::new(record, MetadataKind::Catalog)
}

/// Object files listed by the known include groups of the header file.
fn root_entries(header: &Record) -> Result<Vec<IncludeEntry>, DecodeError> {
    let top = descriptor_cursor(header).at(0)?;
    let group_count: usize = top.at(2)?.number()?;
    let mut entries = Vec::new();
    for index in 0..group_count {
        let group = top.at(3 + index)?;
        let group_id = group.at(0)?.text()?;
        let body = group.at(1)?;
        let version = body.at(0)?.text()?;
        if !is_known_include_group(&group_id) {
            debug!(group = %group_id, "skipping unknown include group");
            continue;
        }
        let block = if version.trim() == NESTED_GROUP_VERSION {
            body.at(1)?
        } else {
            body
        };
        entries.extend(include_entries(&block)?);
    }
    Ok(entries)
}

impl MetadataSource for ContainerSource<'_> {
    fn format(&self) -> InputFormat {
        InputFormat::Container
    }

    fn objects(&self, kind: MetadataKind) -> Result<Vec<ObjectHandle>, SourceError> {
        Ok(self
            .entries
            .iter()
            .filter(|entry| entry.kind == kind)
            .map(|entry| self.handle(kind, &entry.file))
            .collect())
    }

    fn load(&self, handle: &ObjectHandle) -> Result<RawObject, SourceError> {
        let bytes = self.store.read(&handle.location)?;
        let record = parse_record(&handle.location, &bytes)?;
        Ok(RawObject::new(handle.kind, record))
    }

    fn children(
        &self,
        _parent: &ObjectHandle,
        parent_raw: &RawObject,
        kind: MetadataKind,
    ) -> Result<Vec<ObjectHandle>, SourceError> {
        let block = parent_raw.cursor().at(0)?;
        Ok(files_of_kind(&block, kind)?
            .iter()
            .map(|file| self.handle(kind, file))
            .collect())
    }

    fn module(&self, handle: &ObjectHandle, slot: ModuleSlot) -> Result<Option<String>, SourceError> {
        let candidates: Vec<PathBuf> = match slot {
            ModuleSlot::Object => {
                let dir = with_suffix(&handle.location, "0");
                vec![dir.join("text"), dir]
            }
            ModuleSlot::Manager => {
                let dir = with_suffix(&handle.location, "2");
                vec![dir.join("text"), dir]
            }
            ModuleSlot::Form => vec![with_suffix(&handle.location, "0").join("module")],
        };
        for path in candidates {
            if let Some(text) = self.read_text(&path)? {
                return Ok(Some(text));
            }
        }
        Ok(None)
    }

    fn companion(&self, handle: &ObjectHandle, suffix: &str) -> Result<Option<Vec<u8>>, SourceError> {
        let path = with_suffix(&handle.location, suffix);
        if !self.store.exists(&path) {
            return Ok(None);
        }
        Ok(Some(self.store.read(&path)?))
    }

    fn has_predefined_data(&self, handle: &ObjectHandle) -> bool {
        self.store.exists(&with_suffix(&handle.location, "1c"))
    }
}
