//! emit
//!
//! Canonical XML for resolved metadata objects.
//!
//! # Output shape
//!
//! Every document is an XML declaration followed by a `MetaDataObject`
//! root carrying the fixed namespace set and format version, one object
//! element, its `InternalInfo`, its `Properties` and, for catalogs, its
//! `ChildObjects`.
//!
//! Lines are tab-indented and joined with `\n`; there is no trailing
//! newline. Empty text renders as a self-closed element. Rendering is pure:
//! the same object always yields the same bytes.
//!
//! # Example
//!
//! ```
//! use cfxml::emit::XmlWriter;
//!
//! let mut w = XmlWriter::new();
//! w.open("Properties");
//! w.text("Name", "A & B");
//! w.text("Comment", "");
//! w.close("Properties");
//! assert_eq!(
//!     w.finish(),
//!     "<Properties>\n\t<Name>A &amp; B</Name>\n\t<Comment/>\n</Properties>"
//! );
//! ```

mod catalog;
mod children;
mod common_module;
mod form;

use std::fmt::Display;

use quick_xml::escape::{escape, partial_escape};

pub use catalog::emit_catalog;
pub use common_module::emit_common_module;
pub use form::emit_form;

use crate::core::model::MetadataObject;
use crate::core::types::ObjectId;

pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Format version declared on the root element.
pub const FORMAT_VERSION: &str = "2.20";

/// Namespace declarations of the root element, in output order.
pub const NAMESPACES: [(&str, &str); 17] = [
    ("xmlns", "http://v8.1c.ru/8.3/MDClasses"),
    ("xmlns:app", "http://v8.1c.ru/8.2/managed-application/core"),
    ("xmlns:cfg", "http://v8.1c.ru/8.1/data/enterprise/current-config"),
    ("xmlns:cmi", "http://v8.1c.ru/8.2/managed-application/cmi"),
    ("xmlns:ent", "http://v8.1c.ru/8.1/data/enterprise"),
    ("xmlns:lf", "http://v8.1c.ru/8.2/managed-application/logform"),
    ("xmlns:style", "http://v8.1c.ru/8.1/data/ui/style"),
    ("xmlns:sys", "http://v8.1c.ru/8.1/data/ui/fonts/system"),
    ("xmlns:v8", "http://v8.1c.ru/8.1/data/core"),
    ("xmlns:v8ui", "http://v8.1c.ru/8.1/data/ui"),
    ("xmlns:web", "http://v8.1c.ru/8.1/data/ui/colors/web"),
    ("xmlns:win", "http://v8.1c.ru/8.1/data/ui/colors/windows"),
    ("xmlns:xen", "http://v8.1c.ru/8.3/xcf/enums"),
    ("xmlns:xpr", "http://v8.1c.ru/8.3/xcf/predef"),
    ("xmlns:xr", "http://v8.1c.ru/8.3/xcf/readable"),
    ("xmlns:xs", "http://www.w3.org/2001/XMLSchema"),
    ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
];

const ADOPTED: &str = "Adopted";

/// Render one resolved object.
pub fn emit(object: &MetadataObject) -> String {
    match object {
        MetadataObject::Catalog(catalog) => emit_catalog(catalog),
        MetadataObject::CommonModule(module) => emit_common_module(module),
        MetadataObject::CatalogForm(form) => emit_form(form),
    }
}

/// Line-oriented XML builder with tab indentation.
#[derive(Debug, Default)]
pub struct XmlWriter {
    lines: Vec<String>,
    depth: usize,
}

impl XmlWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line at the current depth, as is.
    pub fn raw(&mut self, line: &str) {
        let mut text = "\t".repeat(self.depth);
        text.push_str(line);
        self.lines.push(text);
    }

    pub fn open(&mut self, tag: &str) {
        self.raw(&format!("<{tag}>"));
        self.depth += 1;
    }

    pub fn open_with(&mut self, tag: &str, attrs: &[(&str, &str)]) {
        self.raw(&format!("<{tag}{}>", attributes(attrs)));
        self.depth += 1;
    }

    pub fn close(&mut self, tag: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.raw(&format!("</{tag}>"));
    }

    /// `<tag>text</tag>`, or `<tag/>` for empty text.
    pub fn text(&mut self, tag: &str, text: &str) {
        if text.is_empty() {
            self.empty(tag);
        } else {
            self.raw(&format!("<{tag}>{}</{tag}>", partial_escape(text)));
        }
    }

    /// `<tag>value</tag>` for numbers, flags and identifiers.
    pub fn value(&mut self, tag: &str, value: impl Display) {
        self.text(tag, &value.to_string());
    }

    pub fn empty(&mut self, tag: &str) {
        self.raw(&format!("<{tag}/>"));
    }

    pub fn empty_with(&mut self, tag: &str, attrs: &[(&str, &str)]) {
        self.raw(&format!("<{tag}{}/>", attributes(attrs)));
    }

    pub fn finish(self) -> String {
        self.lines.join("\n")
    }
}

fn attributes(attrs: &[(&str, &str)]) -> String {
    attrs
        .iter()
        .map(|(name, value)| format!(" {name}=\"{}\"", escape(*value)))
        .collect()
}

/// Declaration, root element and the object element around `body`.
fn document(element: &str, id: &ObjectId, body: impl FnOnce(&mut XmlWriter)) -> String {
    let mut w = XmlWriter::new();
    w.raw(XML_DECLARATION);

    let mut root: Vec<(&str, &str)> = NAMESPACES.to_vec();
    root.push(("version", FORMAT_VERSION));
    w.open_with("MetaDataObject", &root);

    let id = id.to_string();
    w.open_with(element, &[("uuid", &id)]);
    body(&mut w);
    w.close(element);
    w.close("MetaDataObject");
    w.finish()
}

/// `<tag>` with one `v8:item` per language, or `<tag/>` when there are none.
fn lang_items<'a>(w: &mut XmlWriter, tag: &str, items: impl IntoIterator<Item = (&'a str, &'a str)>) {
    let mut items = items.into_iter().peekable();
    if items.peek().is_none() {
        w.empty(tag);
        return;
    }
    w.open(tag);
    for (lang, content) in items {
        w.open("v8:item");
        w.text("v8:lang", lang);
        w.text("v8:content", content);
        w.close("v8:item");
    }
    w.close(tag);
}

fn object_belonging(w: &mut XmlWriter, link: Option<ObjectId>) {
    if link.is_some() {
        w.text("ObjectBelonging", ADOPTED);
    }
}

fn extended_object(w: &mut XmlWriter, link: Option<ObjectId>) {
    if let Some(link) = link {
        w.value("ExtendedConfigurationObject", link);
    }
}

/// `InternalInfo` marking one property of an extended object.
fn extended_state(w: &mut XmlWriter, property: &str) {
    w.open("InternalInfo");
    w.open("xr:PropertyState");
    w.text("xr:Property", property);
    w.text("xr:State", "Extended");
    w.close("xr:PropertyState");
    w.close("InternalInfo");
}
