//! resolve::attributes

use tracing::warn;

use super::{ChildKind, Diagnostics, Fallback, FallbackKind, FALLBACK_TARGET};
use crate::core::model::{AllowedLength, AttributeDefinition, AttributeDescriptor, TypeInfo};
use crate::decode::attribute::{
    attribute_entries, decode_attribute, RawAttribute, RawDefinition, TypePattern,
};
use crate::decode::RawObject;
use crate::registry::TypeRegistry;

/// Attributes of a catalog in source order.
///
/// Entries that fail to decode are dropped and recorded.
pub fn resolve_attributes(
    raw: &RawObject,
    owner: &str,
    registry: &TypeRegistry,
    diagnostics: &mut Diagnostics,
) -> Vec<AttributeDescriptor> {
    let mut attributes = Vec::new();
    for entry in attribute_entries(raw) {
        match decode_attribute(&entry) {
            Ok(attribute) => attributes.push(resolve_one(attribute, owner, registry, diagnostics)),
            Err(err) => {
                diagnostics.skip_child(owner, ChildKind::Attribute, entry.path().to_string(), err)
            }
        }
    }
    attributes
}

fn resolve_one(
    attribute: RawAttribute,
    owner: &str,
    registry: &TypeRegistry,
    diagnostics: &mut Diagnostics,
) -> AttributeDescriptor {
    let RawAttribute {
        id,
        name,
        comment,
        definition,
    } = attribute;

    let mut fallback = |kind: FallbackKind| {
        warn!(target: FALLBACK_TARGET, object = %owner, attribute = %name, ?kind, "fallback type");
        diagnostics.fallbacks.push(Fallback {
            object: owner.to_string(),
            attribute: name.clone(),
            kind,
        });
    };

    let definition = match definition {
        RawDefinition::Full {
            password_mode,
            synonym,
            tooltip,
            pattern,
        } => {
            let type_info = match pattern {
                TypePattern::Boolean => TypeInfo::Boolean,
                TypePattern::ValueStorage => TypeInfo::ValueStorage,
                TypePattern::String { length, variable } => {
                    if length.is_none() {
                        fallback(FallbackKind::MissingStringLength);
                    }
                    TypeInfo::String {
                        length: length.unwrap_or(0),
                        allowed: if variable {
                            AllowedLength::Variable
                        } else {
                            AllowedLength::Fixed
                        },
                    }
                }
                TypePattern::Unknown { marker } => {
                    fallback(FallbackKind::UnknownTypeMarker { marker });
                    TypeInfo::Boolean
                }
            };
            AttributeDefinition::Full {
                password_mode,
                synonym,
                tooltip,
                type_info,
            }
        }
        RawDefinition::Override {
            extension_link,
            type_id,
        } => {
            let resolved = type_id.as_ref().and_then(|id| registry.resolve(id));
            let type_info = match resolved {
                Some((kind, name)) => kind.type_info(name),
                None => {
                    fallback(FallbackKind::UnresolvedTypeReference { type_id });
                    TypeInfo::any_reference()
                }
            };
            AttributeDefinition::Override {
                extension_link,
                type_info,
            }
        }
    };

    AttributeDescriptor {
        id,
        name,
        comment,
        definition,
    }
}
