//! `vlq instant <expr>` – URL of a bounded query.

use anyhow::{Context, Result};
use vlq_core::query::{LogicalQuery, TimeRange};
use vlq_core::query_url::{build_instant_url, BuiltQuery};

use super::time::parse_time;
use super::Datasource;

#[derive(Debug, Clone, Default)]
pub struct InstantOptions {
    pub max_lines: Option<i64>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub interval_ms: i64,
}

pub fn run_instant(ds: &Datasource, expr: &str, opts: &InstantOptions) -> Result<BuiltQuery> {
    let from = opts
        .from
        .as_deref()
        .map(parse_time)
        .transpose()
        .context("invalid --from")?;
    let to = opts
        .to
        .as_deref()
        .map(parse_time)
        .transpose()
        .context("invalid --to")?;

    let query = LogicalQuery {
        expr: expr.to_string(),
        max_lines: opts.max_lines.unwrap_or(0),
        time_range: TimeRange::new(from, to),
        interval_ms: opts.interval_ms,
        ..LogicalQuery::default()
    };

    let built = build_instant_url(&ds.url, &ds.params, &query)?;
    tracing::debug!(
        limit = built.query.max_lines,
        from = ?built.query.time_range.from,
        to = ?built.query.time_range.to,
        "instant query resolved"
    );
    Ok(built)
}
