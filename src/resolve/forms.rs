//! resolve::forms
//!
//! Catalog forms with their embedded definitions and modules.

use std::borrow::Cow;
use std::cmp::Ordering;

use super::{ChildKind, Diagnostics, ResolveError, Resolver};
use crate::core::model::FormDescriptor;
use crate::core::types::MetadataKind;
use crate::decode::form::decode_form;
use crate::decode::RawObject;
use crate::source::{decode_text, ModuleSlot, ObjectHandle, SourceError};

/// Companion files that may hold the form definition, in lookup order.
const DEFINITION_SUFFIXES: [&str; 2] = ["0", "1"];

/// Only the head of a companion is checked for a form root element.
const SNIFF_LEN: usize = 2048;

const FORM_MARKERS: [&[u8]; 2] = [b"<Form ", b"<Form xmlns"];

const ITEM_FORM: &str = "ФормаЭлемента";
const LIST_FORM: &str = "ФормаСписка";

/// Text of a form definition, if `bytes` is one.
pub fn sniff_form_definition(bytes: &[u8]) -> Option<String> {
    let head = &bytes[..bytes.len().min(SNIFF_LEN)];
    let is_form = FORM_MARKERS
        .iter()
        .any(|marker| head.windows(marker.len()).any(|window| window == *marker));
    if !is_form {
        return None;
    }
    decode_text(bytes).map(Cow::into_owned)
}

/// Item form first, then list form, then the rest by name.
pub fn form_order(a: &str, b: &str) -> Ordering {
    fn rank(name: &str) -> u8 {
        match name {
            ITEM_FORM => 0,
            LIST_FORM => 1,
            _ => 2,
        }
    }
    rank(a).cmp(&rank(b)).then_with(|| a.cmp(b))
}

impl Resolver<'_> {
    pub(super) fn resolve_forms(
        &self,
        parent: &ObjectHandle,
        raw: &RawObject,
        owner: &str,
        diagnostics: &mut Diagnostics,
    ) -> Result<Vec<FormDescriptor>, ResolveError> {
        let handles = self.source.children(parent, raw, MetadataKind::CatalogForm)?;
        let mut forms = Vec::with_capacity(handles.len());
        for handle in handles {
            match self.resolve_form(&handle) {
                Ok(form) => forms.push(form),
                Err(err) => diagnostics.skip_child(owner, ChildKind::Form, &handle.label, err),
            }
        }
        forms.sort_by(|a, b| form_order(&a.name, &b.name));
        Ok(forms)
    }

    fn resolve_form(&self, handle: &ObjectHandle) -> Result<FormDescriptor, ResolveError> {
        let raw = self.source.load(handle)?;
        let mut form = decode_form(&raw)?;
        if self.options.form_definitions {
            form.embedded_definition_xml = self.form_definition(handle)?;
        }
        if self.options.modules {
            form.module_source = self.source.module(handle, ModuleSlot::Form)?;
        }
        Ok(form)
    }

    fn form_definition(&self, handle: &ObjectHandle) -> Result<Option<String>, SourceError> {
        for suffix in DEFINITION_SUFFIXES {
            let Some(bytes) = self.source.companion(handle, suffix)? else {
                continue;
            };
            if let Some(xml) = sniff_form_definition(&bytes) {
                return Ok(Some(xml));
            }
        }
        Ok(None)
    }
}
