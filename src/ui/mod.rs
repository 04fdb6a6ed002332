//! ui
//!
//! User interaction utilities.
//!
//! # Modules
//!
//! - [`output`] - Output formatting and display
//! - [`logging`] - Log subscriber setup
//!
//! # Design
//!
//! All terminal output of the binary goes through this module. The
//! library itself only emits `tracing` records.

pub mod logging;
pub mod output;
