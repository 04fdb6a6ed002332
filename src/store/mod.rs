//! store
//!
//! File access for container input and XML output.
//!
//! # Architecture
//!
//! Every read and write of the exporter goes through the `FileStore`
//! trait, which has two implementations:
//!
//! - [`FsStore`]: The local filesystem (default)
//! - [`MemoryStore`]: An in-memory tree for tests
//!
//! Paths are relative to the store root.
//!
//! # Output rules
//!
//! - Text is written as UTF-8 with a byte-order mark
//! - Parent directories are created on demand
//! - Writes are atomic on the filesystem store (temp file + rename)
//!
//! # Example
//!
//! ```
//! use cfxml::store::{FileStore, MemoryStore};
//!
//! let store = MemoryStore::new();
//! store.write_text("Catalogs/Products.xml".as_ref(), "<x/>").unwrap();
//!
//! let bytes = store.read("Catalogs/Products.xml".as_ref()).unwrap();
//! assert!(bytes.starts_with(&[0xEF, 0xBB, 0xBF]));
//! assert_eq!(store.list_dir("Catalogs".as_ref()).unwrap(), vec!["Products.xml"]);
//! ```

mod fs_store;
mod memory;
mod traits;

pub use fs_store::FsStore;
pub use memory::MemoryStore;
pub use traits::{with_bom, FileStore, StoreError};
