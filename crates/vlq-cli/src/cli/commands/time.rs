//! Time arguments: Unix seconds or RFC 3339.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};

pub fn parse_time(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(secs) = input.parse::<i64>() {
        return DateTime::from_timestamp(secs, 0)
            .ok_or_else(|| anyhow!("timestamp out of range: {}", input));
    }
    DateTime::parse_from_rfc3339(input)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|_| {
            anyhow!(
                "time must be either Unix timestamp or RFC3339 string, got {:?}",
                input
            )
        })
}
