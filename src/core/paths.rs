//! core::paths
//!
//! Centralized path routing for exported files.
//!
//! Every output location is computed here; nothing else joins
//! `Catalogs`, `Ext` or `Forms` by hand.
//!
//! # Output Layout
//!
//! ```text
//! <dest>/
//!   Catalogs/<Name>.xml
//!   Catalogs/<Name>/Ext/ObjectModule.bsl
//!   Catalogs/<Name>/Ext/ManagerModule.bsl
//!   Catalogs/<Name>/Forms/<Form>.xml
//!   Catalogs/<Name>/Forms/<Form>/Ext/Form.xml
//!   Catalogs/<Name>/Forms/<Form>/Ext/Form/Module.bsl
//!   CommonModules/<Name>.xml
//!   CommonModules/<Name>/Ext/Module.bsl
//! ```
//!
//! # Example
//!
//! ```
//! use cfxml::core::paths::OutputPaths;
//! use std::path::PathBuf;
//!
//! let paths = OutputPaths::new("/out");
//! assert_eq!(
//!     paths.catalog_xml("Products"),
//!     PathBuf::from("/out/Catalogs/Products.xml")
//! );
//! ```

use std::path::{Path, PathBuf};

const CATALOGS: &str = "Catalogs";
const COMMON_MODULES: &str = "CommonModules";
const EXT: &str = "Ext";
const FORMS: &str = "Forms";

/// Output locations under one destination root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    root: PathBuf,
}

impl OutputPaths {
    /// Paths relative to `root`. An empty root gives store-relative paths.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    // =========================================================================
    // Catalogs
    // =========================================================================

    pub fn catalog_xml(&self, name: &str) -> PathBuf {
        self.root.join(CATALOGS).join(format!("{name}.xml"))
    }

    fn catalog_dir(&self, name: &str) -> PathBuf {
        self.root.join(CATALOGS).join(name)
    }

    pub fn catalog_object_module(&self, name: &str) -> PathBuf {
        self.catalog_dir(name).join(EXT).join("ObjectModule.bsl")
    }

    pub fn catalog_manager_module(&self, name: &str) -> PathBuf {
        self.catalog_dir(name).join(EXT).join("ManagerModule.bsl")
    }

    // =========================================================================
    // Catalog forms
    // =========================================================================

    pub fn form_xml(&self, catalog: &str, form: &str) -> PathBuf {
        self.catalog_dir(catalog).join(FORMS).join(format!("{form}.xml"))
    }

    fn form_ext_dir(&self, catalog: &str, form: &str) -> PathBuf {
        self.catalog_dir(catalog).join(FORMS).join(form).join(EXT)
    }

    /// Embedded UI definition of a form.
    pub fn form_definition(&self, catalog: &str, form: &str) -> PathBuf {
        self.form_ext_dir(catalog, form).join("Form.xml")
    }

    pub fn form_module(&self, catalog: &str, form: &str) -> PathBuf {
        self.form_ext_dir(catalog, form).join("Form").join("Module.bsl")
    }

    // =========================================================================
    // Common modules
    // =========================================================================

    pub fn common_module_xml(&self, name: &str) -> PathBuf {
        self.root.join(COMMON_MODULES).join(format!("{name}.xml"))
    }

    pub fn common_module_text(&self, name: &str) -> PathBuf {
        self.root
            .join(COMMON_MODULES)
            .join(name)
            .join(EXT)
            .join("Module.bsl")
    }
}
