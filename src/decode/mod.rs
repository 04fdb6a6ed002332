//! decode
//!
//! Schema variant dispatch: positional records to normalized headers.
//!
//! # Overview
//!
//! Every object kind keeps its universal header in a kind-specific
//! *header section* of the object record:
//!
//! | Kind | Header section | Registry type id |
//! |---|---|---|
//! | Catalog | `[0][1][9][1]` | `[0][1][3]` |
//! | Document | `[0][1][9][1]` | `[0][1][3]` |
//! | DefinedType | `[0][1][2]` | `[0][1][1]` |
//! | CommonModule | `[0][1][1]` | |
//! | CatalogCommand | `[0][1][1]` | |
//! | CatalogForm | `[0][1][1][1]` | |
//!
//! Within a header section the identifier sits at `[1][2]`, the name at
//! `[2]`, the synonym at `[3]` and the comment at `[4]`. The extension link
//! is the last UUID-shaped leaf of the section outside the identity block
//! at `[1]`.
//!
//! # Modules
//!
//! - [`attribute`] - Catalog attribute entries and inline type patterns
//! - [`catalog`] - Layout classification by header-section length
//! - [`common_module`] - Execution flags
//! - [`command`] - Catalog commands
//! - [`form`] - Catalog forms
//!
//! # Descriptors
//!
//! Objects read through the intermediate adapter carry an already-decoded
//! [`Descriptor`]. Its fields take precedence over the record's header
//! section so that both adapters agree on what was decoded.

pub mod attribute;
pub mod catalog;
pub mod command;
pub mod common_module;
pub mod form;

use crate::core::model::{link_from, ObjectHeader};
use crate::core::record::{Cursor, DecodeError, DecodeReason, Record};
use crate::core::types::{is_uuid_shaped, LangItem, MetadataKind, ObjectId, Synonym};

/// Header fields decoded ahead of time by the intermediate adapter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Descriptor {
    pub id: Option<ObjectId>,
    pub name: Option<String>,
    pub synonym: Option<Synonym>,
    pub comment: Option<String>,
}

/// One object record as loaded from a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawObject {
    pub kind: MetadataKind,
    pub record: Record,
    pub descriptor: Option<Descriptor>,
}

impl RawObject {
    pub fn new(kind: MetadataKind, record: Record) -> Self {
        Self {
            kind,
            record,
            descriptor: None,
        }
    }

    pub fn with_descriptor(mut self, descriptor: Descriptor) -> Self {
        self.descriptor = Some(descriptor);
        self
    }

    /// Cursor at the record root.
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(&self.record, self.kind)
    }
}

/// Position of the header section for `kind`.
pub fn header_section_path(kind: MetadataKind) -> &'static [usize] {
    match kind {
        MetadataKind::Catalog | MetadataKind::Document => &[0, 1, 9, 1],
        MetadataKind::DefinedType => &[0, 1, 2],
        MetadataKind::CommonModule | MetadataKind::CatalogCommand => &[0, 1, 1],
        MetadataKind::CatalogForm => &[0, 1, 1, 1],
    }
}

/// Position of the registry type identifier, for referenceable kinds.
pub fn reference_type_path(kind: MetadataKind) -> Option<&'static [usize]> {
    match kind {
        MetadataKind::Catalog | MetadataKind::Document => Some(&[0, 1, 3]),
        MetadataKind::DefinedType => Some(&[0, 1, 1]),
        _ => None,
    }
}

/// Cursor at the header section of `raw`.
pub fn header_section(raw: &RawObject) -> Result<Cursor<'_>, DecodeError> {
    raw.cursor().at_path(header_section_path(raw.kind))
}

/// Decode the universal header of `raw`.
///
/// # Errors
///
/// Returns `DecodeError` when the header section is missing or malformed,
/// or when the resulting name is empty.
pub fn decode_header(raw: &RawObject) -> Result<ObjectHeader, DecodeError> {
    let section = header_section(raw)?;
    let mut header = decode_header_section(&section)?;

    if let Some(descriptor) = &raw.descriptor {
        if let Some(id) = descriptor.id {
            header.id = id;
        }
        if let Some(name) = &descriptor.name {
            header.name = name.clone();
        }
        if let Some(synonym) = &descriptor.synonym {
            header.synonym = synonym.clone();
        }
        if let Some(comment) = &descriptor.comment {
            header.comment = comment.clone();
        }
    }

    if header.name.is_empty() {
        return Err(section.error(DecodeReason::EmptyName));
    }
    Ok(header)
}

fn decode_header_section(section: &Cursor<'_>) -> Result<ObjectHeader, DecodeError> {
    let id = section.at_path(&[1, 2])?.id()?;
    let name = section.at(2)?.text()?;
    let synonym = match section.get(3) {
        Some(cursor) => decode_synonym(&cursor)?,
        None => Synonym::new(),
    };
    let comment = match section.get(4) {
        Some(cursor) => cursor.text()?,
        None => String::new(),
    };

    Ok(ObjectHeader {
        id,
        name,
        synonym,
        comment,
        extension_link: extension_link(section),
    })
}

/// Decode `{N,lang,content,...}` into an ordered map.
pub fn decode_synonym(cursor: &Cursor<'_>) -> Result<Synonym, DecodeError> {
    let count: usize = cursor.at(0)?.number()?;
    let mut synonym = Synonym::with_capacity(count);
    for i in 0..count {
        let lang = cursor.at(1 + 2 * i)?.text()?;
        let content = cursor.at(2 + 2 * i)?.text()?;
        synonym.insert(lang, content);
    }
    Ok(synonym)
}

/// Decode a `{1,lang,content}` item; anything else is "no item".
pub fn decode_lang_item(cursor: &Cursor<'_>) -> Option<LangItem> {
    if cursor.get(0)?.text().ok()?.trim() != "1" {
        return None;
    }
    Some(LangItem {
        lang: cursor.get(1)?.text().ok()?,
        content: cursor.get(2)?.text().ok()?,
    })
}

/// Extension link of a header section.
///
/// Scans depth-first for UUID-shaped leaves, skipping the identity block
/// at `[1]`. The last one wins; the zero sentinel means no link.
pub fn extension_link(section: &Cursor<'_>) -> Option<ObjectId> {
    let items = section.record().as_list()?;
    let last = items
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != 1)
        .filter_map(|(_, item)| last_uuid_leaf(item))
        .last()?;
    link_from(ObjectId::parse(last).ok())
}

fn last_uuid_leaf(record: &Record) -> Option<&str> {
    match record {
        Record::Leaf(text) => Some(text.trim()).filter(|text| is_uuid_shaped(text)),
        Record::List(items) => items.iter().rev().find_map(last_uuid_leaf),
    }
}

/// Minimal decode for the type registry: `(type id, name)`.
///
/// # Errors
///
/// Returns `DecodeError` when the kind is not referenceable or the header
/// or type id cannot be read.
pub fn registry_entry(raw: &RawObject) -> Result<(ObjectId, String), DecodeError> {
    let path = reference_type_path(raw.kind).ok_or_else(|| {
        raw.cursor()
            .error(DecodeReason::InvalidId(format!("{} has no type id", raw.kind)))
    })?;
    let type_id = raw.cursor().at_path(path)?.id()?;
    let header = decode_header(raw)?;
    Ok((type_id, header.name))
}
