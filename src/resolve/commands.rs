//! resolve::commands

use super::{ChildKind, Diagnostics, ResolveError, Resolver};
use crate::core::model::CommandDescriptor;
use crate::core::types::MetadataKind;
use crate::decode::command::decode_command;
use crate::decode::RawObject;
use crate::source::ObjectHandle;

impl Resolver<'_> {
    /// Commands of a catalog in include order; broken ones are dropped.
    pub(super) fn resolve_commands(
        &self,
        parent: &ObjectHandle,
        raw: &RawObject,
        owner: &str,
        diagnostics: &mut Diagnostics,
    ) -> Result<Vec<CommandDescriptor>, ResolveError> {
        let handles = self
            .source
            .children(parent, raw, MetadataKind::CatalogCommand)?;
        let mut commands = Vec::with_capacity(handles.len());
        for handle in handles {
            match self.resolve_command(&handle) {
                Ok(command) => commands.push(command),
                Err(err) => diagnostics.skip_child(owner, ChildKind::Command, &handle.label, err),
            }
        }
        Ok(commands)
    }

    fn resolve_command(&self, handle: &ObjectHandle) -> Result<CommandDescriptor, ResolveError> {
        let raw = self.source.load(handle)?;
        Ok(decode_command(&raw)?)
    }
}
