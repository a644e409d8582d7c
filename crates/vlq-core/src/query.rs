//! Logical query model as sent by a dashboard panel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Line cap applied when a query asks for `max_lines <= 0`.
pub const DEFAULT_MAX_LINES: i64 = 1000;

/// Window length used when the start of an instant query is unset.
pub const DEFAULT_WINDOW_MINUTES: i64 = 5;

/// Which endpoint a query targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    /// Bounded window, finite result (`/select/logsql/query`).
    #[default]
    Instant,
    /// Streaming follow of new entries (`/select/logsql/tail`).
    Tail,
}

/// Unix seconds of `0001-01-01T00:00:00Z`, the zero time some dashboards send
/// for an unset bound.
const ZERO_INSTANT_SECS: i64 = -62_135_596_800;

/// True for the zero time, which counts as an unset bound.
pub fn is_zero_instant(ts: &DateTime<Utc>) -> bool {
    ts.timestamp() == ZERO_INSTANT_SECS && ts.timestamp_subsec_nanos() == 0
}

fn unset_if_zero<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let ts = Option::<DateTime<Utc>>::deserialize(deserializer)?;
    Ok(ts.filter(|ts| !is_zero_instant(ts)))
}

/// Query window. `None` on either end means "unset"; the zero time decodes as `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeRange {
    #[serde(default, alias = "From", deserialize_with = "unset_if_zero")]
    pub from: Option<DateTime<Utc>>,
    #[serde(default, alias = "To", deserialize_with = "unset_if_zero")]
    pub to: Option<DateTime<Utc>>,
}

impl TimeRange {
    pub fn new(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Self {
        Self { from, to }.normalized()
    }

    /// Same range with zero-time bounds turned into `None`.
    pub fn normalized(self) -> Self {
        Self {
            from: self.from.filter(|ts| !is_zero_instant(ts)),
            to: self.to.filter(|ts| !is_zero_instant(ts)),
        }
    }
}

/// A query to translate into a request URL.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogicalQuery {
    /// Caller-assigned identifier; not part of the URL.
    pub ref_id: String,
    /// LogsQL expression, possibly with template variables.
    pub expr: String,
    /// Presentation only; not part of the URL.
    pub legend_format: String,
    pub max_lines: i64,
    #[serde(alias = "TimeRange")]
    pub time_range: TimeRange,
    pub interval_ms: i64,
}

impl LogicalQuery {
    /// Query with only an expression set; everything else is left for defaults.
    pub fn new(expr: impl Into<String>) -> Self {
        Self {
            expr: expr.into(),
            ..Self::default()
        }
    }

    /// Decodes a query from its JSON model (`refId`, `expr`, `maxLines`, ...).
    pub fn from_json(data: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(data)
    }
}
