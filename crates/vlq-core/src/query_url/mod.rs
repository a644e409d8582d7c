//! Request URL construction for the LogsQL select endpoints.
//!
//! Turns a [`LogicalQuery`] plus the datasource base URL and its pass-through
//! parameters into the URL of an instant (`/select/logsql/query`) or tail
//! (`/select/logsql/tail`) request. Defaults applied along the way are returned
//! in [`BuiltQuery::query`] so callers see exactly what was requested.

mod error;
mod params;
mod path;

pub use error::QueryUrlError;
pub use params::QueryParams;
pub use path::join_path;

use chrono::Duration;
use url::Url;

use crate::clock::{Clock, SystemClock};
use crate::query::{LogicalQuery, QueryMode, DEFAULT_MAX_LINES, DEFAULT_WINDOW_MINUTES};
use crate::template::{IntervalTemplate, Substitute};

/// Endpoint for bounded queries.
pub const INSTANT_QUERY_PATH: &str = "/select/logsql/query";
/// Endpoint for streaming queries.
pub const TAIL_QUERY_PATH: &str = "/select/logsql/tail";

/// A request URL and the query as it was resolved into that URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltQuery {
    pub query: LogicalQuery,
    pub url: String,
}

/// Builds request URLs. Holds no per-request state.
#[derive(Debug, Clone, Default)]
pub struct QueryUrlBuilder<S = IntervalTemplate, C = SystemClock> {
    substitutor: S,
    clock: C,
}

impl QueryUrlBuilder {
    /// Builder with interval-variable substitution and the system clock.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: Substitute, C: Clock> QueryUrlBuilder<S, C> {
    pub fn with_parts(substitutor: S, clock: C) -> Self {
        Self { substitutor, clock }
    }

    pub fn with_substitutor<S2: Substitute>(self, substitutor: S2) -> QueryUrlBuilder<S2, C> {
        QueryUrlBuilder {
            substitutor,
            clock: self.clock,
        }
    }

    pub fn with_clock<C2: Clock>(self, clock: C2) -> QueryUrlBuilder<S, C2> {
        QueryUrlBuilder {
            substitutor: self.substitutor,
            clock,
        }
    }

    /// Builds the URL for `mode`.
    pub fn build(
        &self,
        mode: QueryMode,
        base_url: &str,
        passthrough: &str,
        query: &LogicalQuery,
    ) -> Result<BuiltQuery, QueryUrlError> {
        match mode {
            QueryMode::Instant => self.instant_url(base_url, passthrough, query),
            QueryMode::Tail => self.tail_url(base_url, passthrough, query),
        }
    }

    /// Instant query URL with `query`, `limit`, `start` and `end` set.
    ///
    /// `max_lines <= 0` resolves to [`DEFAULT_MAX_LINES`]. An unset `from` resolves
    /// to five minutes before now and an unset `to` to now, with "now" read once.
    pub fn instant_url(
        &self,
        base_url: &str,
        passthrough: &str,
        query: &LogicalQuery,
    ) -> Result<BuiltQuery, QueryUrlError> {
        let (mut url, mut params) = prepare(base_url, passthrough, INSTANT_QUERY_PATH)?;

        let mut resolved = query.clone();
        if resolved.max_lines <= 0 {
            tracing::debug!(
                requested = query.max_lines,
                "max_lines not set, using {}",
                DEFAULT_MAX_LINES
            );
            resolved.max_lines = DEFAULT_MAX_LINES;
        }

        resolved.time_range = resolved.time_range.normalized();
        let range = &mut resolved.time_range;
        let open = range.from.is_none() || range.to.is_none();
        let now = self.clock.now();
        let from = *range
            .from
            .get_or_insert_with(|| now - Duration::minutes(DEFAULT_WINDOW_MINUTES));
        let to = *range.to.get_or_insert(now);
        if open {
            tracing::debug!(
                start = from.timestamp(),
                end = to.timestamp(),
                "filled open time range"
            );
        }

        resolved.expr = self.substitutor.substitute(&query.expr, query.interval_ms);
        params.set("query", resolved.expr.as_str());
        params.set("limit", resolved.max_lines.to_string());
        params.set("start", from.timestamp().to_string());
        params.set("end", to.timestamp().to_string());

        Ok(finish(&mut url, &params, resolved))
    }

    /// Tail query URL with only `query` derived; no window or line cap.
    pub fn tail_url(
        &self,
        base_url: &str,
        passthrough: &str,
        query: &LogicalQuery,
    ) -> Result<BuiltQuery, QueryUrlError> {
        let (mut url, mut params) = prepare(base_url, passthrough, TAIL_QUERY_PATH)?;

        let mut resolved = query.clone();
        resolved.expr = self.substitutor.substitute(&query.expr, query.interval_ms);
        params.set("query", resolved.expr.as_str());

        Ok(finish(&mut url, &params, resolved))
    }
}

/// Builds an instant query URL with the default builder.
pub fn build_instant_url(
    base_url: &str,
    passthrough: &str,
    query: &LogicalQuery,
) -> Result<BuiltQuery, QueryUrlError> {
    QueryUrlBuilder::new().instant_url(base_url, passthrough, query)
}

/// Builds a tail query URL with the default builder.
pub fn build_tail_url(
    base_url: &str,
    passthrough: &str,
    query: &LogicalQuery,
) -> Result<BuiltQuery, QueryUrlError> {
    QueryUrlBuilder::new().tail_url(base_url, passthrough, query)
}

/// Validates the base URL, joins `endpoint` onto its path and merges the
/// pass-through parameters after the ones already on the base URL.
fn prepare(
    base_url: &str,
    passthrough: &str,
    endpoint: &str,
) -> Result<(Url, QueryParams), QueryUrlError> {
    if base_url.is_empty() {
        return Err(QueryUrlError::base_url(base_url, "url can't be blank"));
    }
    let mut url =
        Url::parse(base_url).map_err(|e| QueryUrlError::base_url(base_url, e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(QueryUrlError::base_url(base_url, "url cannot carry a path"));
    }
    let extra = QueryParams::parse(passthrough)?;

    let joined = join_path(url.path(), endpoint);
    url.set_path(&joined);

    let mut params = QueryParams::from_url(&url);
    params.merge(extra);
    Ok((url, params))
}

fn finish(url: &mut Url, params: &QueryParams, query: LogicalQuery) -> BuiltQuery {
    url.set_query(Some(&params.encode()));
    tracing::debug!(path = url.path(), ref_id = %query.ref_id, "built query url");
    BuiltQuery {
        query,
        url: url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::query::TimeRange;
    use chrono::{DateTime, Utc};

    const NOW: i64 = 1_700_000_000;

    fn builder() -> QueryUrlBuilder<IntervalTemplate, FixedClock> {
        QueryUrlBuilder::new().with_clock(FixedClock(at(NOW)))
    }

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    fn params_of(url: &str) -> QueryParams {
        QueryParams::from_url(&Url::parse(url).unwrap())
    }

    #[test]
    fn instant_defaults() {
        let built = builder()
            .instant_url("http://host/", "foo=bar", &LogicalQuery::new("error"))
            .unwrap();
        assert_eq!(
            built.url,
            format!(
                "http://host/select/logsql/query?end={}&foo=bar&limit=1000&query=error&start={}",
                NOW,
                NOW - 300
            )
        );
        assert_eq!(built.query.max_lines, 1000);
        assert_eq!(built.query.time_range.from, Some(at(NOW - 300)));
        assert_eq!(built.query.time_range.to, Some(at(NOW)));
    }

    #[test]
    fn instant_keeps_explicit_values() {
        let mut q = LogicalQuery::new("level:warn");
        q.max_lines = 25;
        q.time_range = TimeRange::new(Some(at(100)), Some(at(200)));
        let built = builder().instant_url("http://host", "", &q).unwrap();
        let p = params_of(&built.url);
        assert_eq!(p.get("limit"), Some("25"));
        assert_eq!(p.get("start"), Some("100"));
        assert_eq!(p.get("end"), Some("200"));
        assert_eq!(built.query, q);
    }

    #[test]
    fn instant_negative_max_lines() {
        let mut q = LogicalQuery::new("*");
        q.max_lines = -3;
        let built = builder().instant_url("http://host", "", &q).unwrap();
        assert_eq!(params_of(&built.url).get("limit"), Some("1000"));
    }

    #[test]
    fn instant_half_open_range() {
        let mut q = LogicalQuery::new("*");
        q.time_range = TimeRange::new(Some(at(NOW - 3600)), None);
        let built = builder().instant_url("http://host", "", &q).unwrap();
        let p = params_of(&built.url);
        assert_eq!(p.get("start"), Some((NOW - 3600).to_string().as_str()));
        assert_eq!(p.get("end"), Some(NOW.to_string().as_str()));

        q.time_range = TimeRange::new(None, Some(at(NOW - 60)));
        let built = builder().instant_url("http://host", "", &q).unwrap();
        let p = params_of(&built.url);
        assert_eq!(p.get("start"), Some((NOW - 300).to_string().as_str()));
        assert_eq!(p.get("end"), Some((NOW - 60).to_string().as_str()));
    }

    #[test]
    fn instant_zero_time_bounds_are_unset() {
        let zero = DateTime::from_timestamp(-62_135_596_800, 0).unwrap();
        let mut q = LogicalQuery::new("*");
        q.time_range = TimeRange {
            from: Some(zero),
            to: Some(zero),
        };
        let built = builder().instant_url("http://host", "", &q).unwrap();
        let p = params_of(&built.url);
        assert_eq!(p.get("start"), Some((NOW - 300).to_string().as_str()));
        assert_eq!(p.get("end"), Some(NOW.to_string().as_str()));
    }

    #[test]
    fn reserved_keys_overwrite_passthrough() {
        let built = builder()
            .instant_url(
                "http://host/?limit=1",
                "limit=2&query=old&start=1&end=2",
                &LogicalQuery::new("new"),
            )
            .unwrap();
        let p = params_of(&built.url);
        assert_eq!(p.get_all("limit"), ["1000"]);
        assert_eq!(p.get_all("query"), ["new"]);
        assert_eq!(p.get_all("start"), [(NOW - 300).to_string()]);
    }

    #[test]
    fn tail_has_no_window() {
        let mut q = LogicalQuery::new("error");
        q.max_lines = 10;
        q.time_range = TimeRange::new(Some(at(1)), Some(at(2)));
        let built = builder().tail_url("http://host/", "foo=bar", &q).unwrap();
        assert_eq!(built.url, "http://host/select/logsql/tail?foo=bar&query=error");
        assert_eq!(built.query, q);
    }

    #[test]
    fn substitutes_expression() {
        let mut q = LogicalQuery::new("_time:$__interval");
        q.interval_ms = 60_000;
        let built = builder().instant_url("http://host", "", &q).unwrap();
        assert_eq!(built.query.expr, "_time:1m");
        assert_eq!(params_of(&built.url).get("query"), Some("_time:1m"));

        let built = builder().tail_url("http://host", "", &q).unwrap();
        assert_eq!(built.query.expr, "_time:1m");
    }

    #[test]
    fn custom_substitutor() {
        let b = builder().with_substitutor(|expr: &str, ms: i64| format!("{expr} step={ms}"));
        let mut q = LogicalQuery::new("x");
        q.interval_ms = 5;
        let built = b.tail_url("http://host", "", &q).unwrap();
        assert_eq!(params_of(&built.url).get("query"), Some("x step=5"));
    }

    #[test]
    fn build_dispatches_on_mode() {
        let q = LogicalQuery::new("*");
        let instant = builder().build(QueryMode::Instant, "http://host", "", &q).unwrap();
        let tail = builder().build(QueryMode::Tail, "http://host", "", &q).unwrap();
        assert!(instant.url.starts_with("http://host/select/logsql/query?"));
        assert!(tail.url.starts_with("http://host/select/logsql/tail?"));
    }

    #[test]
    fn empty_base_url() {
        let err = builder()
            .instant_url("", "", &LogicalQuery::new("*"))
            .unwrap_err();
        assert!(matches!(err, QueryUrlError::InvalidBaseUrl { .. }));
        let err = builder().tail_url("", "", &LogicalQuery::new("*")).unwrap_err();
        assert!(matches!(err, QueryUrlError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn unparseable_base_url() {
        for bad in ["not a url", "/relative/path", "http://[::1", "mailto:ops@example.com"] {
            let err = builder()
                .instant_url(bad, "", &LogicalQuery::new("*"))
                .unwrap_err();
            assert!(
                matches!(err, QueryUrlError::InvalidBaseUrl { .. }),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn malformed_passthrough() {
        let err = builder()
            .instant_url("http://host", "a=%zz", &LogicalQuery::new("*"))
            .unwrap_err();
        assert!(matches!(err, QueryUrlError::InvalidParameterString { .. }));
        let err = builder()
            .tail_url("http://host", "a=1;b=2", &LogicalQuery::new("*"))
            .unwrap_err();
        assert!(matches!(err, QueryUrlError::InvalidParameterString { .. }));
    }
}
