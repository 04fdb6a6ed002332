//! core
//!
//! Core domain types, schemas, and the record model for cfxml.
//!
//! # Modules
//!
//! - [`record`] - Brace-record parser and bounds-checked cursor
//! - [`types`] - Strong types: ObjectId, MetadataKind, InputFormat
//! - [`model`] - Decoded and resolved metadata objects
//! - [`config`] - Configuration schema and loading
//! - [`paths`] - Centralized path routing for exported files
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Schemas are strict and self-describing
//! - Every record access is bounds-checked and reports its path

pub mod config;
pub mod model;
pub mod paths;
pub mod record;
pub mod types;
