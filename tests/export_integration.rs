//! Integration tests for the export pipeline.
//!
//! These tests build containers and intermediate trees on disk and run
//! the full Open -> Scan -> Export flow against them.

mod support;

use assert_fs::TempDir;

use cfxml::core::types::{InputFormat, MetadataKind};
use cfxml::engine::{export, ExportError, ExportOptions, ExportReport};
use cfxml::store::FsStore;

use support::*;

const PRODUCTS: &str = "0a000000-0000-0000-0000-000000000001";
const WAREHOUSES: &str = "0b000000-0000-0000-0000-000000000001";
const UTILS: &str = "0c000000-0000-0000-0000-000000000001";
const ARTICLE: &str = "0d000000-0000-0000-0000-000000000001";
const WAREHOUSE_ATTR: &str = "0d000000-0000-0000-0000-000000000002";
const FORM: &str = "0e000000-0000-0000-0000-000000000001";
const LINK: &str = "22222222-2222-2222-2222-222222222222";
const COMMANDS: [(&str, &str); 3] = [
    ("0f000000-0000-0000-0000-000000000001", "Печать"),
    ("0f000000-0000-0000-0000-000000000002", "Загрузка"),
    ("0f000000-0000-0000-0000-000000000003", "Выгрузка"),
];

const OBJECT_MODULE: &str = "Процедура ПередЗаписью(Отказ)\nКонецПроцедуры";
const MANAGER_MODULE: &str = "Функция Получить() Экспорт\nКонецФункции";
const FORM_MODULE: &str = "&НаКлиенте\nПроцедура ПриОткрытии(Отказ)\nКонецПроцедуры";
const COMMON_MODULE: &str = "Функция Версия() Экспорт\n\tВозврат \"1.0\";\nКонецФункции";

// =============================================================================
// Test Fixtures
// =============================================================================

fn warehouses() -> Catalog {
    Catalog::new(WAREHOUSES, "Склады", 'b')
}

fn products() -> Catalog {
    let mut catalog = Catalog::new(PRODUCTS, "Продукты", 'a');
    catalog.attributes = vec![
        full_attribute(ARTICLE, "Артикул", "\"S\",50,1"),
        override_attribute(WAREHOUSE_ATTR, "Склад", LINK, &warehouses().type_id()),
    ];
    catalog.commands = COMMANDS.iter().map(|(id, _)| id.to_string()).collect();
    catalog.forms = vec![FORM.to_string()];
    catalog
}

fn container() -> ContainerFixture {
    let mut fixture = ContainerFixture::new();
    fixture
        .object(MetadataKind::Catalog, PRODUCTS, &products().render())
        .object(MetadataKind::Catalog, WAREHOUSES, &warehouses().render())
        .object(
            MetadataKind::CommonModule,
            UTILS,
            &common_module_text(UTILS, "ОбщегоНазначения"),
        )
        .file(&format!("{PRODUCTS}.0/text"), &format!("\u{FEFF}{OBJECT_MODULE}"))
        .file(&format!("{PRODUCTS}.2/text"), MANAGER_MODULE)
        .file(&format!("{UTILS}.0/text"), COMMON_MODULE)
        .file(FORM, &form_text(FORM, "ФормаЭлемента"))
        .file(&format!("{FORM}.1"), FORM_XML)
        .file(&format!("{FORM}.0/module"), FORM_MODULE);
    for (id, name) in COMMANDS {
        fixture.file(id, &command_text(id, name));
    }
    fixture.finish();
    fixture
}

fn intermediate() -> IntermediateFixture {
    let fixture = IntermediateFixture::new();
    let products_dir = "Catalog/Продукты";
    fixture
        .object(products_dir, MetadataKind::Catalog, PRODUCTS, "Продукты", &products().render())
        .file(&format!("{products_dir}/Catalog.obj.bsl"), OBJECT_MODULE)
        .file(&format!("{products_dir}/Catalog.mgr.bsl"), MANAGER_MODULE)
        .object(
            "Catalog/Склады",
            MetadataKind::Catalog,
            WAREHOUSES,
            "Склады",
            &warehouses().render(),
        )
        .object(
            "CommonModule/ОбщегоНазначения",
            MetadataKind::CommonModule,
            UTILS,
            "ОбщегоНазначения",
            &common_module_text(UTILS, "ОбщегоНазначения"),
        )
        .file("CommonModule/ОбщегоНазначения/CommonModule.obj.bsl", COMMON_MODULE);

    let form_dir = format!("{products_dir}/CatalogForm/ФормаЭлемента");
    fixture
        .object(
            &form_dir,
            MetadataKind::CatalogForm,
            FORM,
            "ФормаЭлемента",
            &form_text(FORM, "ФормаЭлемента"),
        )
        .file(&format!("{form_dir}/CatalogForm.1"), FORM_XML)
        .file(&format!("{form_dir}/CatalogForm.obj.bsl"), FORM_MODULE);

    for (id, name) in COMMANDS {
        fixture.object(
            &format!("{products_dir}/CatalogCommand/{name}"),
            MetadataKind::CatalogCommand,
            id,
            name,
            &command_text(id, name),
        );
    }
    fixture
}

fn run(input: &std::path::Path, options: &ExportOptions) -> (TempDir, Result<ExportReport, ExportError>) {
    let out = TempDir::new().unwrap();
    let result = export(&FsStore::new(input), &FsStore::new(out.path()), options);
    (out, result)
}

// =============================================================================
// Tests
// =============================================================================

#[test]
fn container_and_intermediate_produce_identical_files() {
    let container = container();
    let intermediate = intermediate();

    let (container_out, report) = run(container.dir.path(), &ExportOptions::default());
    let report = report.unwrap();
    assert_eq!(report.format, InputFormat::Container);
    assert!(!report.has_skips(), "{report}");

    let (intermediate_out, report) = run(intermediate.dir.path(), &ExportOptions::default());
    let report = report.unwrap();
    assert_eq!(report.format, InputFormat::Intermediate);
    assert!(!report.has_skips(), "{report}");

    let from_container = snapshot(container_out.path());
    let from_intermediate = snapshot(intermediate_out.path());
    assert_eq!(
        from_container.keys().collect::<Vec<_>>(),
        from_intermediate.keys().collect::<Vec<_>>()
    );
    for (path, bytes) in &from_container {
        assert_eq!(bytes, &from_intermediate[path], "{path} differs");
    }
}

#[test]
fn writes_expected_layout() {
    let container = container();
    let (out, report) = run(container.dir.path(), &ExportOptions::default());
    let report = report.unwrap();
    assert_eq!(report.exported_count(MetadataKind::Catalog), 2);
    assert_eq!(report.exported_count(MetadataKind::CommonModule), 1);
    assert_eq!(report.registry.catalogs, 2);

    let files = snapshot(out.path());
    for path in [
        "Catalogs/Продукты.xml",
        "Catalogs/Продукты/Ext/ObjectModule.bsl",
        "Catalogs/Продукты/Ext/ManagerModule.bsl",
        "Catalogs/Продукты/Forms/ФормаЭлемента.xml",
        "Catalogs/Продукты/Forms/ФормаЭлемента/Ext/Form.xml",
        "Catalogs/Продукты/Forms/ФормаЭлемента/Ext/Form/Module.bsl",
        "Catalogs/Склады.xml",
        "CommonModules/ОбщегоНазначения.xml",
        "CommonModules/ОбщегоНазначения/Ext/Module.bsl",
    ] {
        let bytes = files.get(path).unwrap_or_else(|| panic!("missing {path}"));
        assert!(bytes.starts_with(b"\xEF\xBB\xBF"), "{path} has no BOM");
    }
    assert_eq!(files.len(), 9);

    assert_eq!(text(&files, "Catalogs/Продукты/Ext/ObjectModule.bsl"), OBJECT_MODULE);
    assert_eq!(
        text(&files, "Catalogs/Продукты/Forms/ФормаЭлемента/Ext/Form.xml"),
        FORM_XML
    );
    assert_eq!(
        text(&files, "CommonModules/ОбщегоНазначения/Ext/Module.bsl"),
        COMMON_MODULE
    );
}

#[test]
fn override_attribute_resolves_through_registry() {
    let container = container();
    let (out, report) = run(container.dir.path(), &ExportOptions::default());
    assert!(report.unwrap().diagnostics.fallbacks.is_empty());

    let xml = text(&snapshot(out.path()), "Catalogs/Продукты.xml");
    assert!(xml.contains("<v8:Type>cfg:CatalogRef.Склады</v8:Type>"));
    assert!(xml.contains(&format!("<ExtendedConfigurationObject>{LINK}</ExtendedConfigurationObject>")));
    assert!(xml.contains("<DefaultObjectForm>Catalog.Продукты.Form.ФормаЭлемента</DefaultObjectForm>"));
}

#[test]
fn products_catalog_end_to_end() {
    let mut catalog = Catalog::new(PRODUCTS, "Продукты", 'a');
    catalog.attributes = vec![full_attribute(ARTICLE, "Артикул", "\"S\",50,1")];
    let mut fixture = ContainerFixture::new();
    fixture.object(MetadataKind::Catalog, PRODUCTS, &catalog.render());
    fixture.finish();

    let (out, report) = run(fixture.dir.path(), &ExportOptions::default());
    report.unwrap();
    let xml = text(&snapshot(out.path()), "Catalogs/Продукты.xml");

    assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert!(xml.contains("<Name>Продукты</Name>"));
    assert!(xml.contains("<Attribute uuid=\"0d000000-0000-0000-0000-000000000001\">"));
    assert!(xml.contains("<v8:Type>xs:string</v8:Type>"));
    assert!(xml.contains("<v8:Length>50</v8:Length>"));
    assert!(xml.contains("<v8:AllowedLength>Variable</v8:AllowedLength>"));
    assert!(!xml.contains("ObjectBelonging"));
    assert!(!xml.ends_with('\n'));
}

#[test]
fn malformed_command_is_dropped_without_failing_the_run() {
    let mut catalog = Catalog::new(PRODUCTS, "Продукты", 'a');
    catalog.commands = COMMANDS.iter().map(|(id, _)| id.to_string()).collect();
    let mut fixture = ContainerFixture::new();
    fixture.object(MetadataKind::Catalog, PRODUCTS, &catalog.render());
    for (id, name) in &COMMANDS[..2] {
        fixture.file(id, &command_text(id, name));
    }
    fixture.file(COMMANDS[2].0, "{1,{1,{");
    fixture.finish();

    let (out, report) = run(fixture.dir.path(), &ExportOptions::default());
    let report = report.unwrap();
    assert_eq!(report.exported.len(), 1);
    assert_eq!(report.diagnostics.skipped_children.len(), 1);
    assert_eq!(report.diagnostics.skipped_children[0].child, COMMANDS[2].0);

    let xml = text(&snapshot(out.path()), "Catalogs/Продукты.xml");
    assert_eq!(xml.matches("<Command uuid=").count(), 2);
}

#[test]
fn malformed_root_descriptor_aborts() {
    let mut fixture = ContainerFixture::new();
    fixture.finish();
    fixture.file("root", "{2,hdr0000");

    let (out, report) = run(fixture.dir.path(), &ExportOptions::default());
    assert!(matches!(report, Err(ExportError::Malformed(_))));
    assert!(snapshot(out.path()).is_empty());
}

#[test]
fn options_limit_what_is_written() {
    let container = container();
    let options = ExportOptions {
        kinds: vec![MetadataKind::Catalog],
        resolve: cfxml::resolve::ResolveOptions {
            modules: false,
            form_definitions: false,
        },
        ..ExportOptions::default()
    };
    let (out, report) = run(container.dir.path(), &options);
    report.unwrap();

    let files = snapshot(out.path());
    let mut paths: Vec<_> = files.keys().map(String::as_str).collect();
    paths.sort_unstable();
    assert_eq!(
        paths,
        [
            "Catalogs/Продукты.xml",
            "Catalogs/Продукты/Forms/ФормаЭлемента.xml",
            "Catalogs/Склады.xml",
        ]
    );
}

#[test]
fn export_is_deterministic() {
    let container = container();
    let (first, _) = run(container.dir.path(), &ExportOptions::default());
    let (second, _) = run(container.dir.path(), &ExportOptions::default());
    assert_eq!(snapshot(first.path()), snapshot(second.path()));
}
