//! core::types
//!
//! Strong types for container metadata.
//!
//! # Types
//!
//! - [`ObjectId`] - Validated object/type identifier (UUID)
//! - [`MetadataKind`] - Kind tag of an included metadata object
//! - [`InputFormat`] - Which input adapter reads the source tree
//! - [`LangItem`] / [`Synonym`] - Localized text
//!
//! # Validation
//!
//! These types enforce validity at construction time. An identifier that
//! is not UUID-shaped never becomes an [`ObjectId`], and an unknown kind
//! UUID never becomes a [`MetadataKind`].
//!
//! # Examples
//!
//! ```
//! use cfxml::core::types::{MetadataKind, ObjectId};
//!
//! let id = ObjectId::parse("cf4abea6-37b2-11d4-940f-008048da11f9").unwrap();
//! assert_eq!(MetadataKind::from_type_id(&id.to_string()), Some(MetadataKind::Catalog));
//!
//! assert!(ObjectId::parse("not-a-uuid").is_err());
//! assert!(ObjectId::ZERO.is_zero());
//! ```

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors from type validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid object id: {0}")]
    InvalidObjectId(String),

    #[error("unknown metadata kind: {0}")]
    UnknownKind(String),

    #[error("unknown input format '{0}', must be one of: auto, container, intermediate")]
    UnknownFormat(String),
}

/// Returns true if `text` has the canonical 8-4-4-4-12 hex layout.
///
/// Only the shape is checked; the nil UUID is UUID-shaped.
pub fn is_uuid_shaped(text: &str) -> bool {
    let bytes = text.as_bytes();
    if bytes.len() != 36 {
        return false;
    }
    bytes.iter().enumerate().all(|(i, b)| match i {
        8 | 13 | 18 | 23 => *b == b'-',
        _ => b.is_ascii_hexdigit(),
    })
}

/// A validated object or type identifier.
///
/// Displays in lower-case hyphenated form, which is how the container
/// stores identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectId(Uuid);

impl ObjectId {
    /// The all-zero sentinel used for "no link".
    pub const ZERO: ObjectId = ObjectId(Uuid::nil());

    /// Parse a UUID-shaped identifier.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidObjectId` if the text is not UUID-shaped.
    pub fn parse(text: &str) -> Result<Self, TypeError> {
        let trimmed = text.trim();
        if !is_uuid_shaped(trimmed) {
            return Err(TypeError::InvalidObjectId(text.to_string()));
        }
        Uuid::parse_str(trimmed)
            .map(Self)
            .map_err(|_| TypeError::InvalidObjectId(text.to_string()))
    }

    /// Check for the all-zero sentinel.
    pub fn is_zero(&self) -> bool {
        self.0.is_nil()
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for ObjectId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ObjectId {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ObjectId> for String {
    fn from(id: ObjectId) -> Self {
        id.to_string()
    }
}

/// Kind of a metadata object as tagged in include sections.
///
/// Each kind is identified in the container by a fixed type UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MetadataKind {
    Catalog,
    Document,
    DefinedType,
    CommonModule,
    CatalogForm,
    CatalogCommand,
}

impl MetadataKind {
    /// All kinds the decoder recognizes.
    pub const ALL: [MetadataKind; 6] = [
        MetadataKind::Catalog,
        MetadataKind::Document,
        MetadataKind::DefinedType,
        MetadataKind::CommonModule,
        MetadataKind::CatalogForm,
        MetadataKind::CatalogCommand,
    ];

    /// Kinds that are exported as top-level documents.
    pub const EXPORTABLE: [MetadataKind; 2] = [MetadataKind::Catalog, MetadataKind::CommonModule];

    /// Kinds that feed the type registry.
    pub const REFERENCEABLE: [MetadataKind; 3] = [
        MetadataKind::Catalog,
        MetadataKind::Document,
        MetadataKind::DefinedType,
    ];

    /// The type UUID tagging this kind in include sections.
    pub fn type_id(self) -> &'static str {
        match self {
            MetadataKind::Catalog => "cf4abea6-37b2-11d4-940f-008048da11f9",
            MetadataKind::Document => "061d872a-5787-460e-95ac-ed74ea3a3e84",
            MetadataKind::DefinedType => "c045099e-13b9-4fb6-9d50-fca00202971e",
            MetadataKind::CommonModule => "0fe48980-252d-11d6-a3c7-0050bae0a776",
            MetadataKind::CatalogForm => "fdf816d2-1ead-11d5-b975-0050bae0a95d",
            MetadataKind::CatalogCommand => "4fe87c89-9ad4-43f6-9fdb-9dc83b3879c6",
        }
    }

    /// Look up a kind by its type UUID.
    pub fn from_type_id(text: &str) -> Option<Self> {
        let text = text.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.type_id().eq_ignore_ascii_case(text))
    }

    /// Canonical kind name, also the intermediate-form directory name.
    pub fn as_str(self) -> &'static str {
        match self {
            MetadataKind::Catalog => "Catalog",
            MetadataKind::Document => "Document",
            MetadataKind::DefinedType => "DefinedType",
            MetadataKind::CommonModule => "CommonModule",
            MetadataKind::CatalogForm => "CatalogForm",
            MetadataKind::CatalogCommand => "CatalogCommand",
        }
    }

    /// Output folder for exportable kinds.
    pub fn output_folder(self) -> Option<&'static str> {
        match self {
            MetadataKind::Catalog => Some("Catalogs"),
            MetadataKind::CommonModule => Some("CommonModules"),
            _ => None,
        }
    }

    /// Whether objects of this kind are written as top-level documents.
    pub fn is_exportable(self) -> bool {
        Self::EXPORTABLE.contains(&self)
    }
}

impl fmt::Display for MetadataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetadataKind {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TypeError::UnknownKind(s.to_string()))
    }
}

impl TryFrom<String> for MetadataKind {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MetadataKind> for String {
    fn from(kind: MetadataKind) -> Self {
        kind.as_str().to_string()
    }
}

/// Include-group UUIDs of the root header that carry exportable objects.
pub const KNOWN_INCLUDE_GROUPS: [&str; 7] = [
    "9cd510cd-abfc-11d4-9434-004095e12fc7",
    "9fcd25a0-4822-11d4-9414-008048da11f9",
    "e3687481-0a87-462c-a166-9f34594f9bba",
    "9de14907-ec23-4a07-96f0-85521cb6b53b",
    "51f2d5d8-ea4d-4064-8892-82951750031e",
    "e68182ea-4237-4383-967f-90c1e3370bc7",
    "fb282519-d103-4dd3-bc12-cb271d631dfc",
];

/// Check whether a root include group UUID is recognized.
pub fn is_known_include_group(text: &str) -> bool {
    let text = text.trim();
    KNOWN_INCLUDE_GROUPS
        .iter()
        .any(|group| group.eq_ignore_ascii_case(text))
}

/// Which adapter reads the source tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    /// Detect from the presence of a root descriptor.
    #[default]
    Auto,
    /// Raw unpacked container (`root` / `configinfo` plus object files).
    Container,
    /// Per-kind directories of JSON descriptors.
    Intermediate,
}

impl InputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            InputFormat::Auto => "auto",
            InputFormat::Container => "container",
            InputFormat::Intermediate => "intermediate",
        }
    }
}

impl FromStr for InputFormat {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(InputFormat::Auto),
            "container" => Ok(InputFormat::Container),
            "intermediate" => Ok(InputFormat::Intermediate),
            _ => Err(TypeError::UnknownFormat(s.to_string())),
        }
    }
}

/// One localized text entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LangItem {
    pub lang: String,
    pub content: String,
}

/// Multilingual text keyed by language code, in source order.
pub type Synonym = IndexMap<String, String>;
