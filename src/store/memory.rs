//! store::memory
//!
//! In-memory store for tests.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;

use super::traits::{FileStore, StoreError};

/// In-memory file tree.
///
/// Directories exist implicitly as prefixes of stored files.
#[derive(Debug, Default)]
pub struct MemoryStore {
    files: Mutex<BTreeMap<PathBuf, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, builder-style.
    pub fn with_file(self, path: impl AsRef<Path>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(path, bytes);
        self
    }

    pub fn insert(&self, path: impl AsRef<Path>, bytes: impl Into<Vec<u8>>) {
        self.lock().insert(normalize(path.as_ref()), bytes.into());
    }

    /// Every stored path, sorted.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.lock().keys().cloned().collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<PathBuf, Vec<u8>>> {
        self.files
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

impl FileStore for MemoryStore {
    fn read(&self, path: &Path) -> Result<Vec<u8>, StoreError> {
        let path = normalize(path);
        self.lock()
            .get(&path)
            .cloned()
            .ok_or(StoreError::NotFound(path))
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
        self.insert(path, bytes.to_vec());
        Ok(())
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<String>, StoreError> {
        let dir = normalize(path);
        let mut names: Vec<String> = self
            .lock()
            .keys()
            .filter_map(|file| file.strip_prefix(&dir).ok())
            .filter_map(|rest| rest.components().next())
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        if names.is_empty() && !self.is_dir(&dir) {
            return Err(StoreError::List {
                path: dir,
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }
        names.sort();
        names.dedup();
        Ok(names)
    }

    fn exists(&self, path: &Path) -> bool {
        self.lock().contains_key(&normalize(path))
    }

    fn is_dir(&self, path: &Path) -> bool {
        let dir = normalize(path);
        self.lock()
            .keys()
            .any(|file| file != &dir && file.starts_with(&dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directories_are_implicit() {
        let store = MemoryStore::new()
            .with_file("Catalog/Products/Catalog.json", "{}")
            .with_file("Catalog/Goods/Catalog.json", "{}")
            .with_file("Catalog/Goods/Catalog.obj.bsl", "");
        assert!(store.is_dir(Path::new("Catalog")));
        assert!(!store.is_dir(Path::new("Catalog/Goods/Catalog.json")));
        assert_eq!(store.list_dir(Path::new("Catalog")).unwrap(), ["Goods", "Products"]);
        assert_eq!(
            store.list_dir(Path::new("Catalog/Goods")).unwrap(),
            ["Catalog.json", "Catalog.obj.bsl"]
        );
    }

    #[test]
    fn missing_directory_fails_to_list() {
        let store = MemoryStore::new();
        assert!(store.list_dir(Path::new("Catalog")).is_err());
    }

    #[test]
    fn root_lists_top_level() {
        let store = MemoryStore::new().with_file("root", "").with_file("a/b", "");
        assert_eq!(store.list_dir(Path::new("")).unwrap(), ["a", "root"]);
    }

    #[test]
    fn current_dir_components_are_ignored() {
        let store = MemoryStore::new().with_file("./x", "1");
        assert!(store.exists(Path::new("x")));
    }
}
