//! resolve::catalog

use super::{resolve_attributes, Diagnostics, ResolveError, Resolver};
use crate::core::model::Catalog;
use crate::decode::catalog::{decode_catalog, CatalogParts};
use crate::decode::RawObject;
use crate::source::{ModuleSlot, ObjectHandle};

impl Resolver<'_> {
    pub(super) fn resolve_catalog(
        &self,
        handle: &ObjectHandle,
        raw: &RawObject,
        diagnostics: &mut Diagnostics,
    ) -> Result<Catalog, ResolveError> {
        let CatalogParts {
            header,
            generated_types,
            layout,
        } = decode_catalog(raw)?;

        let attributes = resolve_attributes(raw, &header.name, self.registry, diagnostics);
        let commands = self.resolve_commands(handle, raw, &header.name, diagnostics)?;
        let forms = self.resolve_forms(handle, raw, &header.name, diagnostics)?;

        let (object_module, manager_module) = if self.options.modules {
            (
                self.source.module(handle, ModuleSlot::Object)?,
                self.source.module(handle, ModuleSlot::Manager)?,
            )
        } else {
            (None, None)
        };

        Ok(Catalog {
            header,
            generated_types,
            layout,
            attributes,
            commands,
            forms,
            has_predefined_data: self.source.has_predefined_data(handle),
            object_module,
            manager_module,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::{ChildKind, ResolveOptions};
    use super::*;
    use crate::core::model::{FormKind, MetadataObject, TypeInfo};
    use crate::core::types::MetadataKind;
    use crate::decode::fixtures::*;
    use crate::registry::TypeRegistryBuilder;
    use crate::source::fixtures::container_store;
    use crate::source::{ContainerSource, MetadataSource};
    use crate::store::MemoryStore;

    const FORM_XML: &str = "<?xml version=\"1.0\"?>\n<Form xmlns=\"http://v8.1c.ru/8.3/xcf/logform\"/>";

    fn command_id(n: u8) -> String {
        format!("c0000000-0000-0000-0000-00000000000{n}")
    }

    fn products_store() -> MemoryStore {
        let mut catalog = CatalogText::new("Продукты");
        catalog.attributes = vec![full_attribute(
            "55555555-5555-5555-5555-555555555555",
            "Артикул",
            r#""S",50,1"#,
        )];
        catalog.commands = ["cmd1", "cmd2", "cmd3", "cmd4"].map(String::from).to_vec();
        catalog.forms = ["frm1", "frm2"].map(String::from).to_vec();

        container_store(&[(MetadataKind::Catalog, "cat1")])
            .with_file("cat1", catalog.render())
            .with_file("cat1.0/text", "\u{FEFF}Процедура ПередЗаписью()\nКонецПроцедуры")
            .with_file("cat1.1c", "")
            .with_file("cmd1", command_text(&command_id(1), "Печать", &[]))
            .with_file("cmd2", command_text(&command_id(2), "Обновить", &[]))
            .with_file("cmd3", command_text(&command_id(3), "Открыть", &[]))
            .with_file("cmd4", "{1,{")
            .with_file("frm1", form_text("f0000000-0000-0000-0000-000000000001", "Выбор"))
            .with_file("frm2", form_text("f0000000-0000-0000-0000-000000000002", "ФормаЭлемента"))
            .with_file("frm2.1", FORM_XML)
            .with_file("frm2.0/module", "&НаКлиенте\nПроцедура Тест()\nКонецПроцедуры")
    }

    fn resolve(store: &MemoryStore, options: ResolveOptions) -> (Catalog, Diagnostics) {
        let source = ContainerSource::open(store).unwrap();
        let registry = TypeRegistryBuilder::new().build();
        let resolver = Resolver::new(&source, &registry, options);
        let handle = &source.objects(MetadataKind::Catalog).unwrap()[0];
        let raw = source.load(handle).unwrap();
        let mut diagnostics = Diagnostics::default();
        match resolver.resolve(handle, &raw, &mut diagnostics).unwrap() {
            MetadataObject::Catalog(catalog) => (catalog, diagnostics),
            other => panic!("expected catalog, got {other:?}"),
        }
    }

    #[test]
    fn resolves_children_and_modules() {
        let (catalog, diagnostics) = resolve(&products_store(), ResolveOptions::default());

        assert_eq!(catalog.header.name, "Продукты");
        assert_eq!(catalog.attributes.len(), 1);
        assert_eq!(
            catalog.attributes[0].type_info(),
            &TypeInfo::String {
                length: 50,
                allowed: crate::core::model::AllowedLength::Variable
            }
        );

        let commands: Vec<_> = catalog.commands.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(commands, ["Печать", "Обновить", "Открыть"]);

        let forms: Vec<_> = catalog.forms.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(forms, ["ФормаЭлемента", "Выбор"]);
        assert_eq!(catalog.forms[0].form_kind, FormKind::Managed);
        assert_eq!(catalog.forms[0].embedded_definition_xml.as_deref(), Some(FORM_XML));
        assert!(catalog.forms[0].module_source.as_deref().unwrap().starts_with("&НаКлиенте"));
        assert_eq!(catalog.forms[1].embedded_definition_xml, None);

        assert!(catalog.has_predefined_data);
        assert_eq!(
            catalog.object_module.as_deref(),
            Some("Процедура ПередЗаписью()\nКонецПроцедуры")
        );
        assert_eq!(catalog.manager_module, None);

        assert_eq!(diagnostics.skipped_children.len(), 1);
        let skipped = &diagnostics.skipped_children[0];
        assert_eq!(skipped.parent, "Продукты");
        assert_eq!(skipped.child_kind, ChildKind::Command);
        assert_eq!(skipped.child, "cmd4");
        assert!(diagnostics.fallbacks.is_empty());
    }

    #[test]
    fn options_turn_off_module_and_definition_reads() {
        let options = ResolveOptions {
            modules: false,
            form_definitions: false,
        };
        let (catalog, _) = resolve(&products_store(), options);
        assert_eq!(catalog.object_module, None);
        assert!(catalog
            .forms
            .iter()
            .all(|f| f.module_source.is_none() && f.embedded_definition_xml.is_none()));
    }

    #[test]
    fn missing_child_file_is_skipped() {
        let mut catalog = CatalogText::new("Products");
        catalog.forms = vec!["gone".to_string()];
        let store = container_store(&[(MetadataKind::Catalog, "cat1")])
            .with_file("cat1", catalog.render());
        let (catalog, diagnostics) = resolve(&store, ResolveOptions::default());
        assert!(catalog.forms.is_empty());
        assert_eq!(diagnostics.skipped_children[0].child_kind, ChildKind::Form);
    }

    #[test]
    fn unsupported_kind_is_an_error() {
        let store = products_store();
        let source = ContainerSource::open(&store).unwrap();
        let registry = TypeRegistryBuilder::new().build();
        let resolver = Resolver::new(&source, &registry, ResolveOptions::default());
        let handle = ObjectHandle::new(MetadataKind::CatalogCommand, "cmd1", "cmd1");
        let raw = source.load(&handle).unwrap();
        let err = resolver
            .resolve(&handle, &raw, &mut Diagnostics::default())
            .unwrap_err();
        assert!(matches!(err, ResolveError::Unsupported(MetadataKind::CatalogCommand)));
    }

    #[test]
    fn resolves_common_module_text() {
        let section = header_section_text(CATALOG_ID, "Utils", &[]);
        let store = container_store(&[(MetadataKind::CommonModule, "mod1")])
            .with_file("mod1", format!("{{1,{{1,{section},0,1,0,0,0,1,0,1}}}}"))
            .with_file("mod1.0/text", "Функция Версия() Экспорт\nКонецФункции");
        let source = ContainerSource::open(&store).unwrap();
        let registry = TypeRegistryBuilder::new().build();
        let resolver = Resolver::new(&source, &registry, ResolveOptions::default());
        let handle = &source.objects(MetadataKind::CommonModule).unwrap()[0];
        let raw = source.load(handle).unwrap();
        match resolver.resolve(handle, &raw, &mut Diagnostics::default()).unwrap() {
            MetadataObject::CommonModule(module) => {
                assert_eq!(module.header.name, "Utils");
                assert!(module.flags.server);
                assert!(module.flags.server_call);
                assert_eq!(
                    module.module.as_deref(),
                    Some("Функция Версия() Экспорт\nКонецФункции")
                );
            }
            other => panic!("expected common module, got {other:?}"),
        }
    }
}
