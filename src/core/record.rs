//! core::record
//!
//! The brace-record tree and its parser.
//!
//! # Overview
//!
//! Container files hold nested brace records:
//!
//! ```text
//! {1,{0,0,cf4abea6-37b2-11d4-940f-008048da11f9},"Name",{"ru","Имя"}}
//! ```
//!
//! A [`Record`] is either a text leaf or an ordered list of records. Leaves
//! keep their raw text: quoted strings keep their quotes and doubled-quote
//! escapes until a decoder asks for [`unquote`]d text.
//!
//! Parsing a file yields a root list holding every top-level brace group, so
//! `root[0]` is the first group of the file.
//!
//! # Checked Access
//!
//! Decoders never index a record directly. They walk it with a [`Cursor`],
//! which tracks the [`FieldPath`] it has taken and turns every out-of-bounds
//! or shape mismatch into a [`DecodeError`] the caller can skip on.
//!
//! # Example
//!
//! ```
//! use cfxml::core::record::{parse, Cursor};
//! use cfxml::core::types::MetadataKind;
//!
//! let root = parse(b"{1,{\"a\",\"b\"\"c\"}}").unwrap();
//! let cursor = Cursor::new(&root, MetadataKind::Catalog);
//!
//! assert_eq!(cursor.at_path(&[0, 1, 1]).unwrap().text().unwrap(), "b\"c");
//!
//! let err = cursor.at_path(&[0, 5]).unwrap_err();
//! assert_eq!(err.field_path.to_string(), "[0][5]");
//! ```

use std::fmt;
use std::str::FromStr;

use nom::{
    branch::alt,
    bytes::complete::{is_not, tag, take_while},
    character::complete::{char, multispace0},
    combinator::{map, opt, recognize},
    multi::{many0, many0_count, separated_list1},
    sequence::{delimited, terminated, tuple},
    IResult,
};
use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::{MetadataKind, ObjectId};

/// UTF-8 byte-order mark.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Strip a leading UTF-8 byte-order mark, if any.
pub fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)
}

/// A file that cannot be read as a brace record at all.
///
/// Fatal when it hits the root descriptor or an include group; an object
/// file failing this way is skipped.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MalformedContainerError {
    #[error("invalid UTF-8 at byte {offset}")]
    InvalidUtf8 { offset: usize },

    #[error("unterminated quoted string starting at byte {offset}")]
    UnterminatedString { offset: usize },

    #[error("unbalanced braces at byte {offset}")]
    UnbalancedBraces { offset: usize },

    #[error("unexpected input at byte {offset}")]
    UnexpectedInput { offset: usize },

    #[error("no brace records found")]
    Empty,

    #[error("malformed structure at {path}: {reason}")]
    Structure { path: FieldPath, reason: String },
}

impl From<DecodeError> for MalformedContainerError {
    fn from(err: DecodeError) -> Self {
        MalformedContainerError::Structure {
            path: err.field_path,
            reason: err.reason.to_string(),
        }
    }
}

/// Why a checked access failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeReason {
    #[error("index out of bounds (length {len})")]
    OutOfBounds { len: usize },

    #[error("expected a list, found a leaf")]
    ExpectedList,

    #[error("expected a leaf, found a list")]
    ExpectedLeaf,

    #[error("invalid identifier '{0}'")]
    InvalidId(String),

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("section declares {declared} entries but holds {actual}")]
    CountMismatch { declared: usize, actual: usize },

    #[error("object name is empty")]
    EmptyName,
}

/// A record did not have the shape its decoder expects.
///
/// Recovered by skipping the object or child being decoded.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{object_kind} record at {field_path}: {reason}")]
pub struct DecodeError {
    pub object_kind: MetadataKind,
    pub field_path: FieldPath,
    pub reason: DecodeReason,
}

/// Index path from the record root, displayed as `[0][1][9]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath(Vec<usize>);

impl FieldPath {
    /// The empty path.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Extend the path by one index.
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        for index in &self.0 {
            write!(f, "[{index}]")?;
        }
        Ok(())
    }
}

impl FromStr for FieldPath {
    type Err = String;

    /// Accepts `0.1.9`, `[0][1][9]`, or an empty string for the root.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace("][", ".").replace(['[', ']'], "");
        if normalized.is_empty() {
            return Ok(Self::root());
        }
        normalized
            .split('.')
            .map(|part| {
                part.trim()
                    .parse::<usize>()
                    .map_err(|_| format!("invalid path segment '{part}' in '{s}'"))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

/// A parsed brace record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Record {
    /// Raw leaf text, quotes included.
    Leaf(String),
    /// Ordered children.
    List(Vec<Record>),
}

impl Record {
    /// Build a leaf from raw text.
    pub fn leaf(text: impl Into<String>) -> Self {
        Record::Leaf(text.into())
    }

    pub fn as_leaf(&self) -> Option<&str> {
        match self {
            Record::Leaf(text) => Some(text),
            Record::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Record]> {
        match self {
            Record::List(items) => Some(items),
            Record::Leaf(_) => None,
        }
    }

    /// Unchecked child lookup; `None` for leaves and missing indices.
    pub fn get(&self, index: usize) -> Option<&Record> {
        self.as_list().and_then(|items| items.get(index))
    }
}

impl fmt::Display for Record {
    /// Writes the record back in brace syntax.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Record::Leaf(text) => f.write_str(text),
            Record::List(items) => {
                f.write_str("{")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl<'de> Deserialize<'de> for Record {
    /// Reads the intermediate JSON form: nested arrays of scalars.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = Record;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string, number, boolean or array")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Record, E> {
                Ok(Record::Leaf(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Record, E> {
                Ok(Record::Leaf(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Record, E> {
                Ok(Record::Leaf(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Record, E> {
                Ok(Record::Leaf(v.to_string()))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Record, E> {
                Ok(Record::Leaf(v.to_string()))
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Record, E> {
                Ok(Record::Leaf(v.to_string()))
            }

            fn visit_unit<E: de::Error>(self) -> Result<Record, E> {
                Ok(Record::Leaf(String::new()))
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Record, A::Error> {
                let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(item) = seq.next_element()? {
                    items.push(item);
                }
                Ok(Record::List(items))
            }
        }

        deserializer.deserialize_any(RecordVisitor)
    }
}

/// Strip surrounding quotes and collapse doubled quotes.
///
/// Text that is not quoted is returned unchanged.
pub fn unquote(raw: &str) -> String {
    match raw.strip_prefix('"').and_then(|rest| rest.strip_suffix('"')) {
        Some(inner) => inner.replace("\"\"", "\""),
        None => raw.to_string(),
    }
}

// =============================================================================
// Parser
// =============================================================================

type ParseResult<'a, T> = IResult<&'a str, T>;

/// `"..."` with `""` as the escaped quote; returns the raw slice.
fn quoted(input: &str) -> ParseResult<'_, &str> {
    recognize(delimited(
        char('"'),
        many0_count(alt((is_not("\""), tag("\"\"")))),
        char('"'),
    ))(input)
}

/// Unquoted leaf text up to the next delimiter, trimmed.
fn bare(input: &str) -> ParseResult<'_, &str> {
    map(
        take_while(|c: char| !matches!(c, ',' | '{' | '}' | '"')),
        str::trim,
    )(input)
}

fn element(input: &str) -> ParseResult<'_, Record> {
    delimited(
        multispace0,
        alt((
            map(list, Record::List),
            map(quoted, Record::leaf),
            map(bare, Record::leaf),
        )),
        multispace0,
    )(input)
}

fn list(input: &str) -> ParseResult<'_, Vec<Record>> {
    alt((
        // `{}` is an empty list, not a list holding one empty leaf.
        map(tuple((char('{'), multispace0, char('}'))), |_| Vec::new()),
        delimited(char('{'), separated_list1(char(','), element), char('}')),
    ))(input)
}

fn document(input: &str) -> ParseResult<'_, Vec<Record>> {
    terminated(
        many0(delimited(
            multispace0,
            map(list, Record::List),
            tuple((multispace0, opt(char(',')))),
        )),
        multispace0,
    )(input)
}

/// Parse raw file bytes into a root list of top-level groups.
///
/// A leading UTF-8 BOM is ignored.
///
/// # Errors
///
/// Returns `MalformedContainerError` for invalid UTF-8, unbalanced braces,
/// unterminated quoted strings, trailing garbage, or a file with no groups.
pub fn parse(bytes: &[u8]) -> Result<Record, MalformedContainerError> {
    let text = std::str::from_utf8(strip_bom(bytes)).map_err(|e| {
        MalformedContainerError::InvalidUtf8 {
            offset: e.valid_up_to(),
        }
    })?;
    parse_str(text)
}

/// Parse brace text into a root list of top-level groups.
pub fn parse_str(text: &str) -> Result<Record, MalformedContainerError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    match document(text) {
        Ok((rest, groups)) if rest.is_empty() => {
            if groups.is_empty() {
                Err(MalformedContainerError::Empty)
            } else {
                Ok(Record::List(groups))
            }
        }
        Ok((rest, _)) => Err(diagnose(text, text.len() - rest.len())),
        Err(_) => Err(diagnose(text, 0)),
    }
}

/// Pin a parse failure to the most specific cause.
fn diagnose(text: &str, stopped_at: usize) -> MalformedContainerError {
    let mut open_braces: Vec<usize> = Vec::new();
    let mut quote_start: Option<usize> = None;
    let mut chars = text.char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        if quote_start.is_some() {
            if c == '"' {
                if matches!(chars.peek(), Some((_, '"'))) {
                    chars.next();
                } else {
                    quote_start = None;
                }
            }
            continue;
        }
        match c {
            '"' => quote_start = Some(offset),
            '{' => open_braces.push(offset),
            '}' => {
                if open_braces.pop().is_none() {
                    return MalformedContainerError::UnbalancedBraces { offset };
                }
            }
            _ => {}
        }
    }

    if let Some(offset) = quote_start {
        return MalformedContainerError::UnterminatedString { offset };
    }
    if let Some(&offset) = open_braces.last() {
        return MalformedContainerError::UnbalancedBraces { offset };
    }
    MalformedContainerError::UnexpectedInput { offset: stopped_at }
}

// =============================================================================
// Cursor
// =============================================================================

/// Bounds-checked, path-tracking view into a record.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    record: &'a Record,
    kind: MetadataKind,
    path: FieldPath,
}

impl<'a> Cursor<'a> {
    /// Start at the root of `record`, attributing errors to `kind`.
    pub fn new(record: &'a Record, kind: MetadataKind) -> Self {
        Self {
            record,
            kind,
            path: FieldPath::root(),
        }
    }

    pub fn record(&self) -> &'a Record {
        self.record
    }

    pub fn kind(&self) -> MetadataKind {
        self.kind
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// Build an error located at this cursor.
    pub fn error(&self, reason: DecodeReason) -> DecodeError {
        DecodeError {
            object_kind: self.kind,
            field_path: self.path.clone(),
            reason,
        }
    }

    fn items(&self) -> Result<&'a [Record], DecodeError> {
        self.record
            .as_list()
            .ok_or_else(|| self.error(DecodeReason::ExpectedList))
    }

    /// Number of children.
    pub fn len(&self) -> Result<usize, DecodeError> {
        self.items().map(<[Record]>::len)
    }

    /// Whether this is a list with no children.
    pub fn is_empty(&self) -> Result<bool, DecodeError> {
        self.len().map(|len| len == 0)
    }

    /// Step into child `index`.
    pub fn at(&self, index: usize) -> Result<Cursor<'a>, DecodeError> {
        let items = self.items()?;
        let path = self.path.child(index);
        match items.get(index) {
            Some(record) => Ok(Cursor {
                record,
                kind: self.kind,
                path,
            }),
            None => Err(DecodeError {
                object_kind: self.kind,
                field_path: path,
                reason: DecodeReason::OutOfBounds { len: items.len() },
            }),
        }
    }

    /// Step through a sequence of child indices.
    pub fn at_path(&self, indices: &[usize]) -> Result<Cursor<'a>, DecodeError> {
        indices
            .iter()
            .try_fold(self.clone(), |cursor, &index| cursor.at(index))
    }

    /// Optional child: `None` when missing or when this is a leaf.
    pub fn get(&self, index: usize) -> Option<Cursor<'a>> {
        self.at(index).ok()
    }

    /// All children from `start` on.
    pub fn children_from(&self, start: usize) -> Result<Vec<Cursor<'a>>, DecodeError> {
        let len = self.len()?;
        (start..len).map(|index| self.at(index)).collect()
    }

    /// Entries of a counted section: a count leaf at `count_index`
    /// followed by that many entries.
    pub fn counted(&self, count_index: usize) -> Result<Vec<Cursor<'a>>, DecodeError> {
        let declared: usize = self.at(count_index)?.number()?;
        let start = count_index + 1;
        let actual = self.len()?.saturating_sub(start);
        if declared > actual {
            return Err(self.error(DecodeReason::CountMismatch { declared, actual }));
        }
        (start..start + declared)
            .map(|index| self.at(index))
            .collect()
    }

    /// Raw leaf text.
    pub fn leaf(&self) -> Result<&'a str, DecodeError> {
        self.record
            .as_leaf()
            .ok_or_else(|| self.error(DecodeReason::ExpectedLeaf))
    }

    /// Unquoted leaf text.
    pub fn text(&self) -> Result<String, DecodeError> {
        self.leaf().map(unquote)
    }

    /// Leaf parsed as an identifier.
    pub fn id(&self) -> Result<ObjectId, DecodeError> {
        let raw = self.leaf()?;
        ObjectId::parse(&unquote(raw)).map_err(|_| self.error(DecodeReason::InvalidId(raw.into())))
    }

    /// Leaf parsed as a number.
    pub fn number<T: FromStr>(&self) -> Result<T, DecodeError> {
        let raw = self.leaf()?;
        unquote(raw)
            .trim()
            .parse()
            .map_err(|_| self.error(DecodeReason::InvalidNumber(raw.into())))
    }

    /// Leaf flag: `1` is set, anything else is clear.
    pub fn is_set(&self) -> Result<bool, DecodeError> {
        self.leaf().map(|raw| raw.trim() == "1")
    }
}
