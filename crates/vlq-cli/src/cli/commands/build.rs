//! `vlq build <file>` – URL for a JSON-encoded query.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use vlq_core::query::{LogicalQuery, QueryMode};
use vlq_core::query_url::{BuiltQuery, QueryUrlBuilder};

use super::Datasource;

pub fn run_build(ds: &Datasource, path: &Path, mode: QueryMode) -> Result<BuiltQuery> {
    let data = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let query = LogicalQuery::from_json(&data)
        .with_context(|| format!("failed to decode query from {}", path.display()))?;
    tracing::debug!(ref_id = %query.ref_id, ?mode, "building query from file");
    Ok(QueryUrlBuilder::new().build(mode, &ds.url, &ds.params, &query)?)
}
