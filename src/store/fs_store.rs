//! store::fs_store
//!
//! Filesystem-backed store rooted at a directory.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::traits::{FileStore, StoreError};

/// Store rooted at a directory on disk.
///
/// Relative paths resolve against the root; absolute paths are used as
/// they are.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn full(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

impl FileStore for FsStore {
    fn read(&self, path: &Path) -> Result<Vec<u8>, StoreError> {
        let full = self.full(path);
        fs::read(&full).map_err(|source| match source.kind() {
            ErrorKind::NotFound => StoreError::NotFound(full),
            _ => StoreError::Read { path: full, source },
        })
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
        let full = self.full(path);
        let write_err = |source| StoreError::Write {
            path: full.clone(),
            source,
        };

        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        // Write to a sibling temp file, then rename over the target
        let mut temp_name = full.file_name().unwrap_or_default().to_os_string();
        temp_name.push(".tmp");
        let temp_path = full.with_file_name(temp_name);
        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .map_err(write_err)?;
            file.write_all(bytes).map_err(write_err)?;
            file.sync_all().map_err(write_err)?;
        }
        fs::rename(&temp_path, &full).map_err(write_err)
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<String>, StoreError> {
        let full = self.full(path);
        let list_err = |source| StoreError::List {
            path: full.clone(),
            source,
        };
        let mut names = fs::read_dir(&full)
            .map_err(list_err)?
            .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(list_err)?;
        names.sort();
        Ok(names)
    }

    fn exists(&self, path: &Path) -> bool {
        self.full(path).is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.full(path).is_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_creates_parents_and_reads_back() {
        let temp = TempDir::new().unwrap();
        let store = FsStore::new(temp.path());
        store
            .write_text(Path::new("Catalogs/Products/Ext/ObjectModule.bsl"), "Процедура")
            .unwrap();

        let bytes = store
            .read(Path::new("Catalogs/Products/Ext/ObjectModule.bsl"))
            .unwrap();
        assert_eq!(&bytes[..3], &[0xEF, 0xBB, 0xBF]);
        assert_eq!(std::str::from_utf8(&bytes[3..]).unwrap(), "Процедура");
        assert!(!temp
            .path()
            .join("Catalogs/Products/Ext/ObjectModule.bsl.tmp")
            .exists());
    }

    #[test]
    fn missing_file_is_not_found() {
        let temp = TempDir::new().unwrap();
        let store = FsStore::new(temp.path());
        assert!(matches!(
            store.read(Path::new("nope")),
            Err(StoreError::NotFound(_))
        ));
        assert_eq!(store.read_optional(Path::new("nope")).unwrap(), None);
    }

    #[test]
    fn list_dir_is_sorted() {
        let temp = TempDir::new().unwrap();
        for name in ["b", "a", "c"] {
            fs::write(temp.path().join(name), "").unwrap();
        }
        let store = FsStore::new(temp.path());
        assert_eq!(store.list_dir(Path::new("")).unwrap(), ["a", "b", "c"]);
        assert!(store.exists(Path::new("a")));
        assert!(store.is_dir(Path::new("")));
    }

    #[test]
    fn overwrite_replaces_content() {
        let temp = TempDir::new().unwrap();
        let store = FsStore::new(temp.path());
        store.write(Path::new("x"), b"first").unwrap();
        store.write(Path::new("x"), b"second").unwrap();
        assert_eq!(store.read(Path::new("x")).unwrap(), b"second");
    }
}
