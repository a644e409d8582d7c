//! `vlq tail <expr>` – URL of a streaming query.

use anyhow::Result;
use vlq_core::query::LogicalQuery;
use vlq_core::query_url::{build_tail_url, BuiltQuery};

use super::Datasource;

pub fn run_tail(ds: &Datasource, expr: &str, interval_ms: i64) -> Result<BuiltQuery> {
    let query = LogicalQuery {
        expr: expr.to_string(),
        interval_ms,
        ..LogicalQuery::default()
    };
    Ok(build_tail_url(&ds.url, &ds.params, &query)?)
}
