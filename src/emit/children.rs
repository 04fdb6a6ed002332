//! emit::children
//!
//! `Attribute` and `Command` blocks inside a catalog's `ChildObjects`.

use super::{extended_object, lang_items, object_belonging, XmlWriter, ADOPTED};
use crate::core::model::{
    AttributeDefinition, AttributeDescriptor, CommandDescriptor, TypeInfo,
};
use crate::core::types::LangItem;

pub(super) fn attribute(w: &mut XmlWriter, attribute: &AttributeDescriptor) {
    let id = attribute.id.to_string();
    w.open_with("Attribute", &[("uuid", &id)]);
    match &attribute.definition {
        AttributeDefinition::Full {
            password_mode,
            synonym,
            tooltip,
            type_info,
        } => {
            w.open("Properties");
            w.text("Name", &attribute.name);
            lang_item(w, "Synonym", synonym.as_ref());
            w.text("Comment", &attribute.comment);
            type_block(w, type_info);
            w.value("PasswordMode", password_mode);
            w.empty("Format");
            w.empty("EditFormat");
            lang_item(w, "ToolTip", tooltip.as_ref());
            w.value("MarkNegatives", false);
            w.empty("Mask");
            w.value("MultiLine", false);
            w.value("ExtendedEdit", false);
            w.empty_with("MinValue", &[("xsi:nil", "true")]);
            w.empty_with("MaxValue", &[("xsi:nil", "true")]);
            w.value("FillFromFillingValue", false);
            match type_info {
                TypeInfo::String { .. } => w.empty_with("FillValue", &[("xsi:type", "xs:string")]),
                _ => w.empty_with("FillValue", &[("xsi:nil", "true")]),
            }
            w.text("FillChecking", "DontCheck");
            w.text("ChoiceFoldersAndItems", "Items");
            w.empty("ChoiceParameterLinks");
            w.empty("ChoiceParameters");
            w.text("QuickChoice", "Auto");
            w.text("CreateOnInput", "Auto");
            w.empty("ChoiceForm");
            w.empty("LinkByType");
            w.text("ChoiceHistoryOnInput", "Auto");
            w.text("Use", "ForItem");
            w.text("Indexing", "DontIndex");
            let search = match type_info {
                TypeInfo::ValueStorage => "DontUse",
                _ => "Use",
            };
            w.text("FullTextSearch", search);
            w.text("DataHistory", "Use");
            w.close("Properties");
        }
        AttributeDefinition::Override {
            extension_link,
            type_info,
        } => {
            w.empty("InternalInfo");
            w.open("Properties");
            w.text("ObjectBelonging", ADOPTED);
            w.text("Name", &attribute.name);
            w.text("Comment", &attribute.comment);
            match extension_link {
                Some(link) => w.value("ExtendedConfigurationObject", link),
                None => w.empty("ExtendedConfigurationObject"),
            }
            type_block(w, type_info);
            w.close("Properties");
        }
    }
    w.close("Attribute");
}

pub(super) fn command(w: &mut XmlWriter, command: &CommandDescriptor) {
    let id = command.id.to_string();
    w.open_with("Command", &[("uuid", &id)]);
    w.empty("InternalInfo");
    w.open("Properties");
    object_belonging(w, command.extension_link);
    w.text("Name", &command.name);
    w.text("Comment", &command.comment);
    extended_object(w, command.extension_link);
    w.text("Group", &command.navigation_group);
    w.close("Properties");
    w.close("Command");
}

fn lang_item(w: &mut XmlWriter, tag: &str, item: Option<&LangItem>) {
    lang_items(
        w,
        tag,
        item.map(|item| (item.lang.as_str(), item.content.as_str())),
    );
}

fn type_block(w: &mut XmlWriter, type_info: &TypeInfo) {
    w.open("Type");
    match type_info {
        TypeInfo::Boolean => w.text("v8:Type", "xs:boolean"),
        TypeInfo::String { length, allowed } => {
            w.text("v8:Type", "xs:string");
            w.open("v8:StringQualifiers");
            w.value("v8:Length", length);
            w.text("v8:AllowedLength", allowed.as_str());
            w.close("v8:StringQualifiers");
        }
        TypeInfo::ValueStorage => w.text("v8:Type", "v8:ValueStorage"),
        TypeInfo::TypeReference { qualified_name } => w.text("v8:Type", qualified_name),
        TypeInfo::TypeSet { qualified_name } => w.text("v8:TypeSet", qualified_name),
    }
    w.close("Type");
}
