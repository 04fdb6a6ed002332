//! cfxml - Decode 1C configuration containers into canonical metadata XML
//!
//! cfxml reads an unpacked configuration container (or the intermediate
//! per-object tree earlier unpack tools produce), decodes catalogs and
//! common modules from their positional brace records, resolves attribute
//! types through a registry of every referenceable object, and writes
//! schema-exact XML plus module text.
//!
//! # Architecture
//!
//! The codebase follows a layered architecture, leaf-first:
//!
//! - [`core`] - Record model, domain types, configuration, output paths
//! - [`decode`] - Positional decoders per kind and layout
//! - [`registry`] - Type registry, built once and then frozen
//! - [`resolve`] - Children, modules and attribute types of one object
//! - [`emit`] - Deterministic XML rendering
//! - [`store`] - File-store collaborator
//! - [`source`] - Input adapters for containers and intermediate trees
//! - [`engine`] - Scan and export phases, run report
//! - [`cli`] - Command-line interface layer
//! - [`ui`] - Terminal output and logging setup
//!
//! # Correctness Invariants
//!
//! 1. Attribute types are resolved only against a frozen registry
//! 2. A malformed container aborts the run; a malformed object is skipped
//! 3. Emitting the same object twice yields identical text

pub mod cli;
pub mod core;
pub mod decode;
pub mod emit;
pub mod engine;
pub mod registry;
pub mod resolve;
pub mod source;
pub mod store;
pub mod ui;
