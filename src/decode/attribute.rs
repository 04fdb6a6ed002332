//! decode::attribute
//!
//! Catalog attribute entries.
//!
//! Attributes sit in the catalog's include section `[0][6]`, entries from
//! index 2. Decoding stops at the raw type pattern; turning a type
//! identifier into a qualified name needs the registry and happens in
//! `resolve`.

use super::{decode_lang_item, RawObject};
use crate::core::model::link_from;
use crate::core::record::{Cursor, DecodeError};
use crate::core::types::{LangItem, ObjectId};

/// Position of the attribute section in a catalog record.
pub const ATTRIBUTE_SECTION: [usize; 2] = [0, 6];

/// Property blocks longer than this belong to extension overrides.
const FULL_DEFINITION_MAX_PROPS: usize = 9;

/// Inline type pattern of a full definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypePattern {
    Boolean,
    /// `length` is `None` when the record does not carry a usable number.
    String {
        length: Option<u32>,
        variable: bool,
    },
    ValueStorage,
    /// Any other marker, or none at all.
    Unknown { marker: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawDefinition {
    Full {
        password_mode: bool,
        synonym: Option<LangItem>,
        tooltip: Option<LangItem>,
        pattern: TypePattern,
    },
    Override {
        extension_link: Option<ObjectId>,
        type_id: Option<ObjectId>,
    },
}

/// One attribute as found in the record, before type resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAttribute {
    pub id: ObjectId,
    pub name: String,
    pub comment: String,
    pub definition: RawDefinition,
}

/// Attribute entries of a catalog in source order.
///
/// A catalog without an attribute section has no attributes.
pub fn attribute_entries(raw: &RawObject) -> Vec<Cursor<'_>> {
    raw.cursor()
        .at_path(&ATTRIBUTE_SECTION)
        .and_then(|section| section.children_from(2))
        .unwrap_or_default()
}

/// Decode one attribute entry.
pub fn decode_attribute(entry: &Cursor<'_>) -> Result<RawAttribute, DecodeError> {
    let sub = entry.at_path(&[0, 1])?;
    let props = sub.at_path(&[1, 1])?;
    let pattern = sub.at_path(&[1, 2])?;

    let id = props.at_path(&[1, 2])?.id()?;
    let name = props.at(2)?.text()?;
    let comment = match props.get(4) {
        Some(cursor) => cursor.text()?,
        None => String::new(),
    };

    let definition = if props.len()? <= FULL_DEFINITION_MAX_PROPS {
        RawDefinition::Full {
            password_mode: flag(&sub, 2),
            synonym: props.get(3).as_ref().and_then(decode_lang_item),
            tooltip: sub.get(4).as_ref().and_then(decode_lang_item),
            pattern: type_pattern(&pattern),
        }
    } else {
        RawDefinition::Override {
            extension_link: link_from(props.get(11).and_then(|c| c.id().ok())),
            type_id: pattern.at_path(&[1, 1]).and_then(|c| c.id()).ok(),
        }
    };

    Ok(RawAttribute {
        id,
        name,
        comment,
        definition,
    })
}

fn flag(cursor: &Cursor<'_>, index: usize) -> bool {
    cursor
        .get(index)
        .and_then(|c| c.is_set().ok())
        .unwrap_or(false)
}

fn type_pattern(pattern: &Cursor<'_>) -> TypePattern {
    let body = pattern.get(1);
    let marker = body
        .as_ref()
        .and_then(|b| b.get(0))
        .and_then(|c| c.text().ok());

    match marker.as_deref() {
        Some("B") => TypePattern::Boolean,
        Some("S") => {
            let body = body.as_ref();
            TypePattern::String {
                length: body
                    .and_then(|b| b.get(1))
                    .and_then(|c| c.number().ok()),
                variable: body.map(|b| flag(b, 2)).unwrap_or(false),
            }
        }
        Some("#") => TypePattern::ValueStorage,
        _ => TypePattern::Unknown { marker },
    }
}
