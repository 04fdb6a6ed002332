//! emit::form

use super::{document, extended_object, extended_state, object_belonging};
use crate::core::model::FormDescriptor;

/// Render the metadata document of a catalog form.
///
/// The embedded UI definition and the module are written verbatim by the
/// exporter; they are not part of this document.
pub fn emit_form(form: &FormDescriptor) -> String {
    document("Form", &form.id, |w| {
        if form.extension_link.is_some() {
            extended_state(w, "Form");
        } else {
            w.empty("InternalInfo");
        }
        w.open("Properties");
        object_belonging(w, form.extension_link);
        w.text("Name", &form.name);
        w.text("Comment", &form.comment);
        extended_object(w, form.extension_link);
        w.text("FormType", form.form_kind.as_str());
        w.close("Properties");
    })
}
