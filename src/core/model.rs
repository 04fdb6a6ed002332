//! core::model
//!
//! Normalized metadata objects.
//!
//! Decoders turn positional records into these types; emitters render them.
//! Nothing here refers to record indices.
//!
//! # Invariants
//!
//! - `ObjectHeader::name` is non-empty (decoding fails otherwise)
//! - `extension_link` is never `Some(ObjectId::ZERO)`
//! - An attribute is either a full definition or an override, never both

use serde::Serialize;

use super::types::{LangItem, MetadataKind, ObjectId, Synonym};

/// Universal header of every metadata object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectHeader {
    pub id: ObjectId,
    pub name: String,
    pub synonym: Synonym,
    pub comment: String,
    /// Base object this record overlays, if it is an extension.
    pub extension_link: Option<ObjectId>,
}

impl ObjectHeader {
    pub fn is_extended(&self) -> bool {
        self.extension_link.is_some()
    }
}

/// Normalize a decoded link: the all-zero sentinel means "no link".
pub fn link_from(id: Option<ObjectId>) -> Option<ObjectId> {
    id.filter(|id| !id.is_zero())
}

// =============================================================================
// Types
// =============================================================================

/// Fixed or variable string length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AllowedLength {
    Fixed,
    Variable,
}

impl AllowedLength {
    pub fn as_str(self) -> &'static str {
        match self {
            AllowedLength::Fixed => "Fixed",
            AllowedLength::Variable => "Variable",
        }
    }
}

/// Declared type of an attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TypeInfo {
    Boolean,
    String { length: u32, allowed: AllowedLength },
    ValueStorage,
    /// A single referenced object type, e.g. `cfg:CatalogRef.Products`.
    TypeReference { qualified_name: String },
    /// A type set, e.g. `cfg:DefinedType.Amount` or `cfg:AnyIBRef`.
    TypeSet { qualified_name: String },
}

impl TypeInfo {
    /// Qualified name of the "any object reference" type set.
    pub const ANY_REFERENCE: &'static str = "cfg:AnyIBRef";

    /// The fallback for type identifiers the registry cannot resolve.
    pub fn any_reference() -> Self {
        TypeInfo::TypeSet {
            qualified_name: Self::ANY_REFERENCE.to_string(),
        }
    }

    /// Qualified name of reference and type-set types.
    pub fn qualified_name(&self) -> Option<&str> {
        match self {
            TypeInfo::TypeReference { qualified_name } | TypeInfo::TypeSet { qualified_name } => {
                Some(qualified_name)
            }
            _ => None,
        }
    }
}

// =============================================================================
// Children
// =============================================================================

/// Full definition or extension override of an attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AttributeDefinition {
    /// Base definition with a complete type and UI flags.
    Full {
        password_mode: bool,
        synonym: Option<LangItem>,
        tooltip: Option<LangItem>,
        type_info: TypeInfo,
    },
    /// Extension override of a base attribute.
    Override {
        extension_link: Option<ObjectId>,
        type_info: TypeInfo,
    },
}

/// A typed attribute of a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeDescriptor {
    pub id: ObjectId,
    pub name: String,
    pub comment: String,
    pub definition: AttributeDefinition,
}

impl AttributeDescriptor {
    pub fn is_full_definition(&self) -> bool {
        matches!(self.definition, AttributeDefinition::Full { .. })
    }

    pub fn type_info(&self) -> &TypeInfo {
        match &self.definition {
            AttributeDefinition::Full { type_info, .. } => type_info,
            AttributeDefinition::Override { type_info, .. } => type_info,
        }
    }

    pub fn extension_link(&self) -> Option<ObjectId> {
        match &self.definition {
            AttributeDefinition::Full { .. } => None,
            AttributeDefinition::Override { extension_link, .. } => *extension_link,
        }
    }
}

/// Navigation group every catalog command is placed in.
pub const DEFAULT_NAVIGATION_GROUP: &str = "FormNavigationPanelGoTo";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandDescriptor {
    pub id: ObjectId,
    pub name: String,
    pub comment: String,
    pub extension_link: Option<ObjectId>,
    pub navigation_group: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FormKind {
    Managed,
    Ordinary,
}

impl FormKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FormKind::Managed => "Managed",
            FormKind::Ordinary => "Ordinary",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormDescriptor {
    pub id: ObjectId,
    pub name: String,
    pub comment: String,
    pub extension_link: Option<ObjectId>,
    pub form_kind: FormKind,
    /// Embedded UI definition (`Ext/Form.xml`), when recoverable.
    pub embedded_definition_xml: Option<String>,
    pub module_source: Option<String>,
}

// =============================================================================
// Catalog
// =============================================================================

/// Category of a generated type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GeneratedCategory {
    Object,
    Ref,
    Selection,
    List,
    Manager,
}

impl GeneratedCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            GeneratedCategory::Object => "Object",
            GeneratedCategory::Ref => "Ref",
            GeneratedCategory::Selection => "Selection",
            GeneratedCategory::List => "List",
            GeneratedCategory::Manager => "Manager",
        }
    }
}

/// A platform type generated for a catalog (`CatalogRef.<Name>` etc).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedType {
    pub category: GeneratedCategory,
    pub type_id: ObjectId,
    pub value_id: ObjectId,
}

/// Recognized catalog layouts, keyed by header-section length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CatalogLayout {
    /// 9-element header: base definition with the full property set.
    Base {
        level_count: u32,
        code_length: u32,
        description_length: u32,
    },
    /// 19-element header: adopted object with the code/hierarchy subset.
    Adopted {
        code_length: u32,
        description_length: u32,
    },
    /// Any other length: universal header only.
    Minimal,
}

impl CatalogLayout {
    pub fn name(&self) -> &'static str {
        match self {
            CatalogLayout::Base { .. } => "base",
            CatalogLayout::Adopted { .. } => "adopted",
            CatalogLayout::Minimal => "minimal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalog {
    pub header: ObjectHeader,
    pub generated_types: Vec<GeneratedType>,
    pub layout: CatalogLayout,
    pub attributes: Vec<AttributeDescriptor>,
    pub commands: Vec<CommandDescriptor>,
    pub forms: Vec<FormDescriptor>,
    pub has_predefined_data: bool,
    pub object_module: Option<String>,
    pub manager_module: Option<String>,
}

// =============================================================================
// Common module
// =============================================================================

/// Where a common module's code may run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionFlags {
    pub global: bool,
    pub client_managed_application: bool,
    pub server: bool,
    pub external_connection: bool,
    pub client_ordinary_application: bool,
    pub server_call: bool,
    pub privileged: bool,
}

/// Return-value reuse policy; the decoder always reports `DontUse`.
pub const RETURN_VALUES_REUSE: &str = "DontUse";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommonModule {
    pub header: ObjectHeader,
    pub flags: ExecutionFlags,
    pub module: Option<String>,
}

// =============================================================================
// Objects
// =============================================================================

/// A fully resolved object ready for emission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum MetadataObject {
    Catalog(Catalog),
    CommonModule(CommonModule),
    CatalogForm(FormDescriptor),
}

impl MetadataObject {
    pub fn kind(&self) -> MetadataKind {
        match self {
            MetadataObject::Catalog(_) => MetadataKind::Catalog,
            MetadataObject::CommonModule(_) => MetadataKind::CommonModule,
            MetadataObject::CatalogForm(_) => MetadataKind::CatalogForm,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            MetadataObject::Catalog(catalog) => &catalog.header.name,
            MetadataObject::CommonModule(module) => &module.header.name,
            MetadataObject::CatalogForm(form) => &form.name,
        }
    }

    pub fn extension_link(&self) -> Option<ObjectId> {
        match self {
            MetadataObject::Catalog(catalog) => catalog.header.extension_link,
            MetadataObject::CommonModule(module) => module.header.extension_link,
            MetadataObject::CatalogForm(form) => form.extension_link,
        }
    }
}
