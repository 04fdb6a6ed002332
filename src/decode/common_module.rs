//! decode::common_module

use super::{decode_header, RawObject};
use crate::core::model::{ExecutionFlags, ObjectHeader};
use crate::core::record::{Cursor, DecodeError};

/// Flags start at `[0][1][2]`; offsets below are relative to that.
const FLAGS_START: usize = 2;

const CLIENT_ORDINARY_APPLICATION: usize = 0;
const SERVER: usize = 1;
const EXTERNAL_CONNECTION: usize = 2;
const GLOBAL: usize = 3;
const PRIVILEGED: usize = 4;
const CLIENT_MANAGED_APPLICATION: usize = 5;
const SERVER_CALL: usize = 7;

/// Decode header and execution flags of a common module record.
///
/// Missing or non-leaf flags read as clear.
pub fn decode_common_module(raw: &RawObject) -> Result<(ObjectHeader, ExecutionFlags), DecodeError> {
    let header = decode_header(raw)?;
    let body = raw.cursor().at_path(&[0, 1])?;
    let flag = |offset: usize| is_set(&body, FLAGS_START + offset);

    let flags = ExecutionFlags {
        global: flag(GLOBAL),
        client_managed_application: flag(CLIENT_MANAGED_APPLICATION),
        server: flag(SERVER),
        external_connection: flag(EXTERNAL_CONNECTION),
        client_ordinary_application: flag(CLIENT_ORDINARY_APPLICATION),
        server_call: flag(SERVER_CALL),
        privileged: flag(PRIVILEGED),
    };
    Ok((header, flags))
}

fn is_set(body: &Cursor<'_>, index: usize) -> bool {
    body.get(index)
        .and_then(|c| c.is_set().ok())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;
    use crate::core::types::MetadataKind;

    fn module(flags: &str) -> RawObject {
        let section = header_section_text(CATALOG_ID, "Utils", &[]);
        RawObject::new(
            MetadataKind::CommonModule,
            parse(&format!("{{1,{{1,{section},{flags}}}}}")),
        )
    }

    #[test]
    fn flags_follow_fixed_offsets() {
        // client-ordinary, server, ext-conn, global, privileged, client-managed, _, server-call
        let (header, flags) = decode_common_module(&module("1,1,0,0,0,1,0,1")).unwrap();
        assert_eq!(header.name, "Utils");
        assert_eq!(
            flags,
            ExecutionFlags {
                global: false,
                client_managed_application: true,
                server: true,
                external_connection: false,
                client_ordinary_application: true,
                server_call: true,
                privileged: false,
            }
        );
    }

    #[test]
    fn global_and_privileged() {
        let (_, flags) = decode_common_module(&module("0,0,0,1,1,0,0,0")).unwrap();
        assert!(flags.global);
        assert!(flags.privileged);
        assert!(!flags.server);
    }

    #[test]
    fn missing_flags_are_clear() {
        let (_, flags) = decode_common_module(&module("0,1")).unwrap();
        assert!(flags.server);
        assert!(!flags.server_call);
        assert!(!flags.global);
    }

    #[test]
    fn list_in_flag_position_is_clear() {
        let (_, flags) = decode_common_module(&module("{1},1")).unwrap();
        assert!(!flags.client_ordinary_application);
        assert!(flags.server);
    }
}
