//! inspect command - Print a record file as JSON

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context as _, Result};

use crate::core::record::{parse, Cursor, FieldPath, Record};
use crate::core::types::MetadataKind;

/// Parse `file` and print the record, or the sub-record at `path`, as JSON.
pub fn inspect(file: &Path, path: Option<&str>) -> Result<()> {
    let bytes = fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let record = parse(&bytes).with_context(|| format!("Failed to parse {}", file.display()))?;
    let selected = select(&record, path.unwrap_or_default())?;
    let json = serde_json::to_string_pretty(selected).context("Failed to serialize record")?;
    println!("{json}");
    Ok(())
}

/// Sub-record at `path`, relative to the list of top-level groups.
fn select<'a>(record: &'a Record, path: &str) -> Result<&'a Record> {
    let path: FieldPath = path.parse().map_err(|e: String| anyhow!(e))?;
    // Records here are not tied to an object kind
    let cursor = Cursor::new(record, MetadataKind::Catalog);
    let found = cursor
        .at_path(path.indices())
        .map_err(|e| anyhow!("no record at {path}: {}", e.reason))?;
    Ok(found.record())
}
