//! decode::catalog
//!
//! Catalog body: generated types and layout.

use super::{decode_header, header_section, RawObject};
use crate::core::model::{CatalogLayout, GeneratedCategory, GeneratedType, ObjectHeader};
use crate::core::record::{Cursor, DecodeError};

/// Catalog body, relative to the record root.
const BODY: [usize; 2] = [0, 1];

/// `(category, type id slot, value id slot)` within the body.
const GENERATED_SLOTS: [(GeneratedCategory, usize, usize); 5] = [
    (GeneratedCategory::Object, 1, 2),
    (GeneratedCategory::Ref, 3, 4),
    (GeneratedCategory::Selection, 5, 6),
    (GeneratedCategory::List, 7, 8),
    (GeneratedCategory::Manager, 34, 35),
];

const BASE_SECTION_LEN: usize = 9;
const ADOPTED_SECTION_LEN: usize = 19;

const LEVEL_COUNT: usize = 10;
const CODE_LENGTH: usize = 11;
const DESCRIPTION_LENGTH: usize = 19;

/// Everything a catalog record carries on its own, without children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogParts {
    pub header: ObjectHeader,
    pub generated_types: Vec<GeneratedType>,
    pub layout: CatalogLayout,
}

/// Decode header, generated types and layout of a catalog record.
pub fn decode_catalog(raw: &RawObject) -> Result<CatalogParts, DecodeError> {
    let header = decode_header(raw)?;
    let body = raw.cursor().at_path(&BODY)?;
    let generated_types = GENERATED_SLOTS
        .iter()
        .map(|&(category, type_slot, value_slot)| {
            Ok(GeneratedType {
                category,
                type_id: body.at(type_slot)?.id()?,
                value_id: body.at(value_slot)?.id()?,
            })
        })
        .collect::<Result<Vec<_>, DecodeError>>()?;

    let section_len = header_section(raw)?.len()?;
    let layout = classify(&body, section_len)?;

    Ok(CatalogParts {
        header,
        generated_types,
        layout,
    })
}

/// Pick the layout by header-section length.
fn classify(body: &Cursor<'_>, section_len: usize) -> Result<CatalogLayout, DecodeError> {
    Ok(match section_len {
        BASE_SECTION_LEN => CatalogLayout::Base {
            level_count: body.at(LEVEL_COUNT)?.number()?,
            code_length: body.at(CODE_LENGTH)?.number()?,
            description_length: body.at(DESCRIPTION_LENGTH)?.number()?,
        },
        ADOPTED_SECTION_LEN => CatalogLayout::Adopted {
            code_length: body.at(CODE_LENGTH)?.number()?,
            description_length: body.at(DESCRIPTION_LENGTH)?.number()?,
        },
        _ => CatalogLayout::Minimal,
    })
}
