//! decode::command

use super::{decode_header, RawObject};
use crate::core::model::{CommandDescriptor, DEFAULT_NAVIGATION_GROUP};
use crate::core::record::DecodeError;

/// Decode a catalog command record.
pub fn decode_command(raw: &RawObject) -> Result<CommandDescriptor, DecodeError> {
    let header = decode_header(raw)?;
    Ok(CommandDescriptor {
        id: header.id,
        name: header.name,
        comment: header.comment,
        extension_link: header.extension_link,
        navigation_group: DEFAULT_NAVIGATION_GROUP.to_string(),
    })
}
