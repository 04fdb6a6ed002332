//! source::includes
//!
//! Include blocks: typed lists of object file names.
//!
//! An include block holds a section count at `[2]` and sections at
//! `[3..]`. Each section is `{kind_uuid, count, entry...}`; string entries
//! are file names, nested lists are inline objects and are not listed.

use tracing::debug;

use crate::core::record::{unquote, Cursor, DecodeError, Record};
use crate::core::types::MetadataKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeEntry {
    pub kind: MetadataKind,
    pub file: String,
}

/// File entries of an include block, in order.
///
/// Sections with an unknown kind or an unreadable header are skipped.
///
/// # Errors
///
/// Returns `DecodeError` when the section count is missing or claims more
/// sections than the block holds, or when a section of a known kind claims
/// more entries than it holds.
pub fn include_entries(block: &Cursor<'_>) -> Result<Vec<IncludeEntry>, DecodeError> {
    let count: usize = block.at(2)?.number()?;
    let mut entries = Vec::new();
    for index in 0..count {
        let section = block.at(3 + index)?;
        let kind_id = section.at(0).and_then(|c| c.text());
        let declared = section.at(1).and_then(|c| c.number::<usize>());
        let kind_id = match (kind_id, declared) {
            (Ok(kind_id), Ok(_)) => kind_id,
            _ => {
                debug!(path = %section.path(), "unreadable include section");
                continue;
            }
        };
        let Some(kind) = MetadataKind::from_type_id(&kind_id) else {
            continue;
        };
        for entry in section.counted(1)? {
            if let Record::Leaf(file) = entry.record() {
                entries.push(IncludeEntry {
                    kind,
                    file: unquote(file.trim()),
                });
            }
        }
    }
    Ok(entries)
}

/// File names of `kind` within an include block.
pub fn files_of_kind(block: &Cursor<'_>, kind: MetadataKind) -> Result<Vec<String>, DecodeError> {
    Ok(include_entries(block)?
        .into_iter()
        .filter(|entry| entry.kind == kind)
        .map(|entry| entry.file)
        .collect())
}
