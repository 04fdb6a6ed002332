//! resolve::common_module

use super::{ResolveError, Resolver};
use crate::core::model::CommonModule;
use crate::decode::common_module::decode_common_module;
use crate::decode::RawObject;
use crate::source::{ModuleSlot, ObjectHandle};

impl Resolver<'_> {
    pub(super) fn resolve_common_module(
        &self,
        handle: &ObjectHandle,
        raw: &RawObject,
    ) -> Result<CommonModule, ResolveError> {
        let (header, flags) = decode_common_module(raw)?;
        let module = if self.options.modules {
            self.source.module(handle, ModuleSlot::Object)?
        } else {
            None
        };
        Ok(CommonModule {
            header,
            flags,
            module,
        })
    }
}
