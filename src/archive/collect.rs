use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::parse::parse_collection;
use super::record::Record;

pub fn load_collection(path: &Path) -> Result<Vec<Record>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read record collection {}", path.display()))?;
    let records = parse_collection(&raw)
        .with_context(|| format!("failed to parse record collection {}", path.display()))?;

    info!(path = %path.display(), records = records.len(), "loaded record collection");
    Ok(records)
}

pub fn parse_collection_str(raw: &str) -> Result<Vec<Record>> {
    parse_collection(raw).context("failed to parse record collection")
}
