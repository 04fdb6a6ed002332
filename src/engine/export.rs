//! engine::export
//!
//! Export phase: decode, resolve, emit and write each exportable object
//! against the frozen registry.

use tracing::{debug, info};

use super::report::{ExportReport, ExportedObject, Phase};
use super::ExportError;
use crate::core::model::{Catalog, CommonModule, MetadataObject};
use crate::core::paths::OutputPaths;
use crate::core::types::MetadataKind;
use crate::emit::{emit_catalog, emit_common_module, emit_form};
use crate::registry::TypeRegistry;
use crate::resolve::{Diagnostics, ResolveError, ResolveOptions, Resolver};
use crate::source::{MetadataSource, ObjectHandle};
use crate::store::{FileStore, StoreError};

/// Writes resolved objects under one destination.
pub struct Exporter<'a> {
    source: &'a dyn MetadataSource,
    resolver: Resolver<'a>,
    output: &'a dyn FileStore,
    paths: OutputPaths,
}

impl<'a> Exporter<'a> {
    pub fn new(
        source: &'a dyn MetadataSource,
        registry: &'a TypeRegistry,
        output: &'a dyn FileStore,
        options: ResolveOptions,
    ) -> Self {
        Self {
            source,
            resolver: Resolver::new(source, registry, options),
            output,
            paths: OutputPaths::new(""),
        }
    }

    /// Export every object of `kind`, recording skips in `report`.
    ///
    /// # Errors
    ///
    /// Fatal only: the kind cannot be listed or a file cannot be written.
    pub fn export_kind(&self, kind: MetadataKind, report: &mut ExportReport) -> Result<(), ExportError> {
        let handles = self.source.objects(kind)?;
        debug!(%kind, count = handles.len(), "exporting kind");

        for handle in handles {
            let mut diagnostics = Diagnostics::default();
            match self.resolve(&handle, &mut diagnostics) {
                Ok(object) => {
                    let files = self.write(&object)?;
                    info!(%kind, name = %object.name(), files, "exported");
                    report.exported.push(ExportedObject {
                        kind,
                        name: object.name().to_string(),
                        files,
                    });
                    report.diagnostics.skipped_children.append(&mut diagnostics.skipped_children);
                    report.diagnostics.fallbacks.append(&mut diagnostics.fallbacks);
                }
                Err(err) => report.skip(kind, &handle.label, Phase::Export, err),
            }
        }
        Ok(())
    }

    fn resolve(
        &self,
        handle: &ObjectHandle,
        diagnostics: &mut Diagnostics,
    ) -> Result<MetadataObject, ResolveError> {
        let raw = self.source.load(handle)?;
        self.resolver.resolve(handle, &raw, diagnostics)
    }

    /// Write all files of one object; returns how many were written.
    fn write(&self, object: &MetadataObject) -> Result<usize, StoreError> {
        match object {
            MetadataObject::Catalog(catalog) => self.write_catalog(catalog),
            MetadataObject::CommonModule(module) => self.write_common_module(module),
            // Forms are written with their catalog
            MetadataObject::CatalogForm(_) => Ok(0),
        }
    }

    fn write_catalog(&self, catalog: &Catalog) -> Result<usize, StoreError> {
        let name = catalog.header.name.as_str();
        let mut files = Files::new(self.output);

        files.write(&self.paths.catalog_xml(name), &emit_catalog(catalog))?;
        files.write_optional(&self.paths.catalog_object_module(name), catalog.object_module.as_deref())?;
        files.write_optional(&self.paths.catalog_manager_module(name), catalog.manager_module.as_deref())?;

        for form in &catalog.forms {
            files.write(&self.paths.form_xml(name, &form.name), &emit_form(form))?;
            files.write_optional(
                &self.paths.form_definition(name, &form.name),
                form.embedded_definition_xml.as_deref(),
            )?;
            files.write_optional(
                &self.paths.form_module(name, &form.name),
                form.module_source.as_deref(),
            )?;
        }
        Ok(files.count)
    }

    fn write_common_module(&self, module: &CommonModule) -> Result<usize, StoreError> {
        let name = module.header.name.as_str();
        let mut files = Files::new(self.output);
        files.write(&self.paths.common_module_xml(name), &emit_common_module(module))?;
        files.write_optional(&self.paths.common_module_text(name), module.module.as_deref())?;
        Ok(files.count)
    }
}

/// Counting writer.
struct Files<'a> {
    store: &'a dyn FileStore,
    count: usize,
}

impl<'a> Files<'a> {
    fn new(store: &'a dyn FileStore) -> Self {
        Self { store, count: 0 }
    }

    fn write(&mut self, path: &std::path::Path, text: &str) -> Result<(), StoreError> {
        self.store.write_text(path, text)?;
        self.count += 1;
        Ok(())
    }

    fn write_optional(&mut self, path: &std::path::Path, text: Option<&str>) -> Result<(), StoreError> {
        match text {
            Some(text) => self.write(path, text),
            None => Ok(()),
        }
    }
}
