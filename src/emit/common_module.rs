//! emit::common_module

use super::{document, extended_object, extended_state, lang_items, object_belonging};
use crate::core::model::{CommonModule, RETURN_VALUES_REUSE};

/// Render a common module document.
///
/// Extended modules carry a `Module` property state and leave out
/// `Privileged` and `ReturnValuesReuse`, which belong to the base object.
pub fn emit_common_module(module: &CommonModule) -> String {
    let header = &module.header;
    let flags = &module.flags;
    document("CommonModule", &header.id, |w| {
        if header.is_extended() {
            extended_state(w, "Module");
        }
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
        w.value("Global", flags.global);
        w.value("ClientManagedApplication", flags.client_managed_application);
        w.value("Server", flags.server);
        w.value("ExternalConnection", flags.external_connection);
        w.value("ClientOrdinaryApplication", flags.client_ordinary_application);
        w.value("ServerCall", flags.server_call);
        if !header.is_extended() {
            w.value("Privileged", flags.privileged);
            w.text("ReturnValuesReuse", RETURN_VALUES_REUSE);
        }
        w.close("Properties");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{ExecutionFlags, ObjectHeader};
    use crate::core::types::{ObjectId, Synonym};

    fn module(link: Option<&str>) -> CommonModule {
        CommonModule {
            header: ObjectHeader {
                id: ObjectId::parse("0e000000-0000-0000-0000-000000000001").unwrap(),
                name: "ОбщегоНазначения".into(),
                synonym: Synonym::new(),
                comment: String::new(),
                extension_link: link.map(|l| ObjectId::parse(l).unwrap()),
            },
            flags: ExecutionFlags {
                server: true,
                server_call: true,
                ..ExecutionFlags::default()
            },
            module: None,
        }
    }

    #[test]
    fn base_module() {
        let text = emit_common_module(&module(None));
        let lines: Vec<_> = text.lines().skip(2).collect();
        assert_eq!(
            lines,
            [
                "\t<CommonModule uuid=\"0e000000-0000-0000-0000-000000000001\">",
                "\t\t<Properties>",
                "\t\t\t<Name>ОбщегоНазначения</Name>",
                "\t\t\t<Synonym/>",
                "\t\t\t<Comment/>",
                "\t\t\t<Global>false</Global>",
                "\t\t\t<ClientManagedApplication>false</ClientManagedApplication>",
                "\t\t\t<Server>true</Server>",
                "\t\t\t<ExternalConnection>false</ExternalConnection>",
                "\t\t\t<ClientOrdinaryApplication>false</ClientOrdinaryApplication>",
                "\t\t\t<ServerCall>true</ServerCall>",
                "\t\t\t<Privileged>false</Privileged>",
                "\t\t\t<ReturnValuesReuse>DontUse</ReturnValuesReuse>",
                "\t\t</Properties>",
                "\t</CommonModule>",
                "</MetaDataObject>",
            ]
        );
    }

    #[test]
    fn extended_module() {
        let text = emit_common_module(&module(Some("22222222-2222-2222-2222-222222222222")));
        assert!(text.contains(
            "\t\t<InternalInfo>\n\t\t\t<xr:PropertyState>\n\t\t\t\t<xr:Property>Module</xr:Property>\n\t\t\t\t<xr:State>Extended</xr:State>"
        ));
        assert!(text.contains("<ObjectBelonging>Adopted</ObjectBelonging>"));
        assert!(text.contains(
            "\t\t\t<Comment/>\n\t\t\t<ExtendedConfigurationObject>22222222-2222-2222-2222-222222222222</ExtendedConfigurationObject>"
        ));
        assert!(!text.contains("Privileged"));
        assert!(!text.contains("ReturnValuesReuse"));
    }
}
