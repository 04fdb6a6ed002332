//! decode::form
//!
//! Catalog form headers. The embedded UI definition and the form module
//! live in companion files and are attached by the resolver.

use super::{decode_header, RawObject};
use crate::core::model::{FormDescriptor, FormKind};
use crate::core::record::DecodeError;

/// Position of the managed/ordinary flag.
const FORM_KIND: [usize; 4] = [0, 1, 1, 3];

/// Decode a catalog form record.
///
/// A missing kind flag reads as managed.
pub fn decode_form(raw: &RawObject) -> Result<FormDescriptor, DecodeError> {
    let header = decode_header(raw)?;
    let form_kind = match raw.cursor().at_path(&FORM_KIND).and_then(|c| c.text()) {
        Ok(flag) if flag.trim() != "1" => FormKind::Ordinary,
        _ => FormKind::Managed,
    };

    Ok(FormDescriptor {
        id: header.id,
        name: header.name,
        comment: header.comment,
        extension_link: header.extension_link,
        form_kind,
        embedded_definition_xml: None,
        module_source: None,
    })
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;
    use crate::core::types::MetadataKind;

    fn form(kind_flag: Option<&str>) -> RawObject {
        let section = header_section_text(CATALOG_ID, "ФормаЭлемента", &[]);
        let wrapper = match kind_flag {
            Some(flag) => format!("{{0,{section},0,{flag}}}"),
            None => format!("{{0,{section}}}"),
        };
        RawObject::new(
            MetadataKind::CatalogForm,
            parse(&format!("{{1,{{1,{wrapper}}}}}")),
        )
    }

    #[test]
    fn managed_flag() {
        let form = decode_form(&form(Some("1"))).unwrap();
        assert_eq!(form.name, "ФормаЭлемента");
        assert_eq!(form.form_kind, FormKind::Managed);
        assert_eq!(form.embedded_definition_xml, None);
    }

    #[test]
    fn ordinary_flag() {
        assert_eq!(decode_form(&form(Some("0"))).unwrap().form_kind, FormKind::Ordinary);
    }

    #[test]
    fn missing_flag_defaults_to_managed() {
        assert_eq!(decode_form(&form(None)).unwrap().form_kind, FormKind::Managed);
    }
}
