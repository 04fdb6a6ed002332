//! registry
//!
//! Type registry: type identifiers of referenceable objects to names.
//!
//! # Phases
//!
//! The registry is filled in one pass over every Catalog, Document and
//! DefinedType object ([`TypeRegistryBuilder`]) and frozen with
//! [`TypeRegistryBuilder::build`]. Resolution only accepts the frozen
//! [`TypeRegistry`], so nothing can be resolved against a half-built map.
//!
//! # Example
//!
//! ```
//! use cfxml::core::types::ObjectId;
//! use cfxml::registry::{ReferenceKind, TypeRegistryBuilder};
//!
//! let id = ObjectId::parse("0a1b2c3d-0000-0000-0000-000000000001").unwrap();
//! let mut builder = TypeRegistryBuilder::new();
//! builder.insert(ReferenceKind::Catalog, id, "Products");
//! let registry = builder.build();
//!
//! assert_eq!(registry.resolve(&id), Some((ReferenceKind::Catalog, "Products")));
//! assert_eq!(
//!     registry.type_info(Some(&id)).qualified_name(),
//!     Some("cfg:CatalogRef.Products")
//! );
//! ```

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::core::model::TypeInfo;
use crate::core::types::{MetadataKind, ObjectId};

/// The three independent maps of the registry, in resolution priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ReferenceKind {
    DefinedType,
    Catalog,
    Document,
}

impl ReferenceKind {
    /// Resolution priority order.
    pub const PRIORITY: [ReferenceKind; 3] = [
        ReferenceKind::DefinedType,
        ReferenceKind::Catalog,
        ReferenceKind::Document,
    ];

    pub fn from_metadata_kind(kind: MetadataKind) -> Option<Self> {
        match kind {
            MetadataKind::DefinedType => Some(ReferenceKind::DefinedType),
            MetadataKind::Catalog => Some(ReferenceKind::Catalog),
            MetadataKind::Document => Some(ReferenceKind::Document),
            _ => None,
        }
    }

    /// Map a resolved name to its declared type.
    pub fn type_info(self, name: &str) -> TypeInfo {
        match self {
            ReferenceKind::DefinedType => TypeInfo::TypeSet {
                qualified_name: format!("cfg:DefinedType.{name}"),
            },
            ReferenceKind::Catalog => TypeInfo::TypeReference {
                qualified_name: format!("cfg:CatalogRef.{name}"),
            },
            ReferenceKind::Document => TypeInfo::TypeReference {
                qualified_name: format!("cfg:DocumentRef.{name}"),
            },
        }
    }

    fn slot(self) -> usize {
        match self {
            ReferenceKind::DefinedType => 0,
            ReferenceKind::Catalog => 1,
            ReferenceKind::Document => 2,
        }
    }
}

type NameMap = HashMap<ObjectId, String>;

/// Mutable registry under construction.
#[derive(Debug, Default)]
pub struct TypeRegistryBuilder {
    maps: [NameMap; 3],
    replaced: usize,
}

impl TypeRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `type_id -> name`. A repeated identifier replaces the
    /// earlier name.
    pub fn insert(&mut self, kind: ReferenceKind, type_id: ObjectId, name: impl Into<String>) {
        let name = name.into();
        if let Some(previous) = self.maps[kind.slot()].insert(type_id, name.clone()) {
            self.replaced += 1;
            debug!(?kind, %type_id, %previous, %name, "duplicate type id, keeping last");
        }
    }

    pub fn build(self) -> TypeRegistry {
        TypeRegistry {
            maps: self.maps,
            replaced: self.replaced,
        }
    }
}

/// Immutable registry consulted during resolution.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    maps: [NameMap; 3],
    replaced: usize,
}

/// Entry counts, for the export report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    pub defined_types: usize,
    pub catalogs: usize,
    pub documents: usize,
    pub replaced: usize,
}

impl TypeRegistry {
    /// Look up a type identifier: defined types, then catalogs, then documents.
    pub fn resolve(&self, type_id: &ObjectId) -> Option<(ReferenceKind, &str)> {
        ReferenceKind::PRIORITY.iter().find_map(|&kind| {
            self.maps[kind.slot()]
                .get(type_id)
                .map(|name| (kind, name.as_str()))
        })
    }

    /// Declared type for an override's type identifier.
    ///
    /// A missing or unknown identifier yields `cfg:AnyIBRef`.
    pub fn type_info(&self, type_id: Option<&ObjectId>) -> TypeInfo {
        type_id
            .and_then(|id| self.resolve(id))
            .map(|(kind, name)| kind.type_info(name))
            .unwrap_or_else(TypeInfo::any_reference)
    }

    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            defined_types: self.maps[ReferenceKind::DefinedType.slot()].len(),
            catalogs: self.maps[ReferenceKind::Catalog.slot()].len(),
            documents: self.maps[ReferenceKind::Document.slot()].len(),
            replaced: self.replaced,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.maps.iter().all(HashMap::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u8) -> ObjectId {
        ObjectId::parse(&format!("{n:08x}-0000-0000-0000-000000000000")).unwrap()
    }

    #[test]
    fn registry_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TypeRegistry>();
    }

    #[test]
    fn defined_type_wins_over_catalog_and_document() {
        let mut builder = TypeRegistryBuilder::new();
        builder.insert(ReferenceKind::Document, id(1), "Order");
        builder.insert(ReferenceKind::Catalog, id(1), "Products");
        builder.insert(ReferenceKind::DefinedType, id(1), "Amount");
        let registry = builder.build();
        assert_eq!(registry.resolve(&id(1)), Some((ReferenceKind::DefinedType, "Amount")));
    }

    #[test]
    fn catalog_wins_over_document() {
        let mut builder = TypeRegistryBuilder::new();
        builder.insert(ReferenceKind::Document, id(1), "Order");
        builder.insert(ReferenceKind::Catalog, id(1), "Products");
        let registry = builder.build();
        assert_eq!(registry.resolve(&id(1)), Some((ReferenceKind::Catalog, "Products")));
    }

    #[test]
    fn last_write_wins() {
        let mut builder = TypeRegistryBuilder::new();
        builder.insert(ReferenceKind::Catalog, id(2), "Old");
        builder.insert(ReferenceKind::Catalog, id(2), "New");
        let registry = builder.build();
        assert_eq!(registry.resolve(&id(2)), Some((ReferenceKind::Catalog, "New")));
        assert_eq!(registry.stats().replaced, 1);
        assert_eq!(registry.stats().catalogs, 1);
    }

    #[test]
    fn type_info_mapping() {
        let mut builder = TypeRegistryBuilder::new();
        builder.insert(ReferenceKind::DefinedType, id(1), "Amount");
        builder.insert(ReferenceKind::Catalog, id(2), "Products");
        builder.insert(ReferenceKind::Document, id(3), "Order");
        let registry = builder.build();

        assert_eq!(
            registry.type_info(Some(&id(1))),
            TypeInfo::TypeSet {
                qualified_name: "cfg:DefinedType.Amount".into()
            }
        );
        assert_eq!(
            registry.type_info(Some(&id(2))),
            TypeInfo::TypeReference {
                qualified_name: "cfg:CatalogRef.Products".into()
            }
        );
        assert_eq!(
            registry.type_info(Some(&id(3))),
            TypeInfo::TypeReference {
                qualified_name: "cfg:DocumentRef.Order".into()
            }
        );
    }

    #[test]
    fn unknown_or_missing_id_is_any_reference() {
        let registry = TypeRegistryBuilder::new().build();
        assert!(registry.is_empty());
        assert_eq!(registry.type_info(Some(&id(9))), TypeInfo::any_reference());
        assert_eq!(registry.type_info(None), TypeInfo::any_reference());
    }

    #[test]
    fn reference_kind_from_metadata_kind() {
        assert_eq!(
            ReferenceKind::from_metadata_kind(MetadataKind::Catalog),
            Some(ReferenceKind::Catalog)
        );
        assert_eq!(ReferenceKind::from_metadata_kind(MetadataKind::CommonModule), None);
    }
}
