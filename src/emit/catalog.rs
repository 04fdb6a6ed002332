//! emit::catalog

use super::children::{attribute, command};
use super::{document, extended_object, lang_items, object_belonging, XmlWriter};
use crate::core::model::{Catalog, CatalogLayout, GeneratedType};

/// Hierarchy level count emitted for adopted catalogs.
const ADOPTED_LEVEL_COUNT: u32 = 2;

/// Adopted catalogs always declare this code length.
const ADOPTED_CODE_LENGTH: u32 = 9;

/// Standard attributes of a base catalog, in output order.
const STANDARD_ATTRIBUTES: [&str; 9] = [
    "PredefinedDataName",
    "Predefined",
    "Ref",
    "DeletionMark",
    "IsFolder",
    "Owner",
    "Parent",
    "Description",
    "Code",
];

/// Per-attribute differences from the default standard-attribute row.
struct StandardAttribute {
    fill_checking: &'static str,
    fill_from_filling_value: bool,
    type_reduction_mode: &'static str,
}

impl StandardAttribute {
    fn of(name: &str) -> Self {
        let mut row = StandardAttribute {
            fill_checking: "DontCheck",
            fill_from_filling_value: false,
            type_reduction_mode: "TransformValues",
        };
        match name {
            "Owner" => {
                row.fill_checking = "ShowError";
                row.fill_from_filling_value = true;
                row.type_reduction_mode = "Deny";
            }
            "Parent" => row.fill_from_filling_value = true,
            "Description" => row.fill_checking = "ShowError",
            _ => {}
        }
        row
    }
}

/// Render a catalog document.
pub fn emit_catalog(catalog: &Catalog) -> String {
    let header = &catalog.header;
    document("Catalog", &header.id, |w| {
        w.open("InternalInfo");
        for generated in &catalog.generated_types {
            generated_type(w, &header.name, generated);
        }
        w.close("InternalInfo");

        w.open("Properties");
        object_belonging(w, header.extension_link);
        w.text("Name", &header.name);
        lang_items(
            w,
            "Synonym",
            header.synonym.iter().map(|(lang, content)| (lang.as_str(), content.as_str())),
        );
        w.text("Comment", &header.comment);
        extended_object(w, header.extension_link);
        match &catalog.layout {
            CatalogLayout::Base {
                level_count,
                code_length,
                description_length,
            } => base_properties(w, catalog, *level_count, *code_length, *description_length),
            CatalogLayout::Adopted {
                code_length,
                description_length,
            } => adopted_properties(w, *code_length, *description_length),
            CatalogLayout::Minimal => {}
        }
        w.close("Properties");

        child_objects(w, catalog);
    })
}

fn generated_type(w: &mut XmlWriter, name: &str, generated: &GeneratedType) {
    let category = generated.category.as_str();
    let type_name = format!("Catalog{category}.{name}");
    w.open_with("xr:GeneratedType", &[("name", &type_name), ("category", category)]);
    w.value("xr:TypeId", generated.type_id);
    w.value("xr:ValueId", generated.value_id);
    w.close("xr:GeneratedType");
}

fn allowed_length(code_length: u32) -> &'static str {
    if code_length != 0 {
        "Variable"
    } else {
        "Fixed"
    }
}

/// Shared code-numbering properties.
fn code_settings(w: &mut XmlWriter, code_length: u32) {
    w.text("CodeType", "String");
    w.text("CodeAllowedLength", allowed_length(code_length));
    w.text("CodeSeries", "WholeCatalog");
    w.value("CheckUnique", true);
    w.value("Autonumbering", true);
    w.text("DefaultPresentation", "AsDescription");
}

/// Shared hierarchy and ownership properties.
fn hierarchy_settings(w: &mut XmlWriter, level_count: u32) {
    w.value("Hierarchical", false);
    w.text("HierarchyType", "HierarchyFoldersAndItems");
    w.value("LimitLevelCount", false);
    w.value("LevelCount", level_count);
    w.value("FoldersOnTop", true);
    w.value("UseStandardCommands", true);
    w.empty("Owners");
    w.text("SubordinationUse", "ToItems");
}

fn adopted_properties(w: &mut XmlWriter, code_length: u32, description_length: u32) {
    w.value("CodeLength", ADOPTED_CODE_LENGTH);
    w.value("DescriptionLength", description_length);
    code_settings(w, code_length);
    hierarchy_settings(w, ADOPTED_LEVEL_COUNT);
}

fn base_properties(
    w: &mut XmlWriter,
    catalog: &Catalog,
    level_count: u32,
    code_length: u32,
    description_length: u32,
) {
    let name = &catalog.header.name;
    hierarchy_settings(w, level_count);
    w.value("CodeLength", code_length);
    w.value("DescriptionLength", description_length);
    code_settings(w, code_length);
    standard_attributes(w);
    w.empty("Characteristics");
    w.text("PredefinedDataUpdate", "Auto");
    w.text("EditType", "InDialog");
    w.value("QuickChoice", false);
    w.text("ChoiceMode", "BothWays");
    w.open("InputByString");
    w.text("xr:Field", &format!("Catalog.{name}.StandardAttribute.Description"));
    w.text("xr:Field", &format!("Catalog.{name}.StandardAttribute.Code"));
    w.close("InputByString");
    w.text("SearchStringModeOnInputByString", "Begin");
    w.text("FullTextSearchOnInputByString", "DontUse");
    w.text("ChoiceDataGetModeOnInputByString", "Directly");

    let default_form = catalog
        .forms
        .first()
        .map(|form| format!("Catalog.{name}.Form.{}", form.name))
        .unwrap_or_default();
    w.text("DefaultObjectForm", &default_form);
    for slot in [
        "DefaultFolderForm",
        "DefaultListForm",
        "DefaultChoiceForm",
        "DefaultFolderChoiceForm",
        "AuxiliaryObjectForm",
        "AuxiliaryFolderForm",
        "AuxiliaryListForm",
        "AuxiliaryChoiceForm",
        "AuxiliaryFolderChoiceForm",
    ] {
        w.empty(slot);
    }

    w.value("IncludeHelpInContents", false);
    w.empty("BasedOn");
    w.empty("DataLockFields");
    w.text("DataLockControlMode", "Managed");
    w.text("FullTextSearch", "Use");
    w.empty("ObjectPresentation");
    w.empty("ExtendedObjectPresentation");
    w.empty("ListPresentation");
    w.empty("ExtendedListPresentation");
    w.empty("Explanation");
    w.text("CreateOnInput", "Use");
    w.text("ChoiceHistoryOnInput", "Auto");
    w.text("DataHistory", "DontUse");
    w.value("UpdateDataHistoryImmediatelyAfterWrite", false);
    w.value("ExecuteAfterWriteDataHistoryVersionProcessing", false);
}

fn standard_attributes(w: &mut XmlWriter) {
    w.open("StandardAttributes");
    for name in STANDARD_ATTRIBUTES {
        let row = StandardAttribute::of(name);
        w.open_with("xr:StandardAttribute", &[("name", name)]);
        w.empty("xr:LinkByType");
        w.text("xr:FillChecking", row.fill_checking);
        w.value("xr:MultiLine", false);
        w.value("xr:FillFromFillingValue", row.fill_from_filling_value);
        w.text("xr:CreateOnInput", "Auto");
        w.text("xr:TypeReductionMode", row.type_reduction_mode);
        w.empty_with("xr:MaxValue", &[("xsi:nil", "true")]);
        w.empty("xr:ToolTip");
        w.value("xr:ExtendedEdit", false);
        w.empty("xr:Format");
        w.empty("xr:ChoiceForm");
        w.text("xr:QuickChoice", "Auto");
        w.text("xr:ChoiceHistoryOnInput", "Auto");
        w.empty("xr:EditFormat");
        w.value("xr:PasswordMode", false);
        w.text("xr:DataHistory", "Use");
        w.value("xr:MarkNegatives", false);
        w.empty_with("xr:MinValue", &[("xsi:nil", "true")]);
        w.empty("xr:Synonym");
        w.empty("xr:Comment");
        w.text("xr:FullTextSearch", "Use");
        w.empty("xr:ChoiceParameterLinks");
        w.empty_with("xr:FillValue", &[("xsi:nil", "true")]);
        w.empty("xr:Mask");
        w.empty("xr:ChoiceParameters");
        w.close("xr:StandardAttribute");
    }
    w.close("StandardAttributes");
}

/// Attributes, then commands, then form names.
fn child_objects(w: &mut XmlWriter, catalog: &Catalog) {
    if catalog.attributes.is_empty() && catalog.commands.is_empty() && catalog.forms.is_empty() {
        w.empty("ChildObjects");
        return;
    }
    w.open("ChildObjects");
    for item in &catalog.attributes {
        attribute(w, item);
    }
    for item in &catalog.commands {
        command(w, item);
    }
    for form in &catalog.forms {
        w.text("Form", &form.name);
    }
    w.close("ChildObjects");
}
