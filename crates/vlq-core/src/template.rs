//! Template-variable substitution for query expressions.
//!
//! The URL builder only depends on the [`Substitute`] trait. [`IntervalTemplate`]
//! resolves the interval variables a dashboard attaches to every query; hosts
//! with a richer variable set plug in their own implementation.

/// Resolves template variables inside a raw expression.
///
/// Implementations must return the input unchanged when it contains no
/// placeholders they know about.
pub trait Substitute {
    fn substitute(&self, expr: &str, interval_ms: i64) -> String;
}

impl<F> Substitute for F
where
    F: Fn(&str, i64) -> String,
{
    fn substitute(&self, expr: &str, interval_ms: i64) -> String {
        self(expr, interval_ms)
    }
}

/// Placeholders replaced with the interval in milliseconds. Checked before the
/// duration forms since `$__interval` is a prefix of `$__interval_ms`.
const INTERVAL_MS_VARS: [&str; 2] = ["${__interval_ms}", "$__interval_ms"];
/// Placeholders replaced with the interval as a compact duration.
const INTERVAL_VARS: [&str; 2] = ["${__interval}", "$__interval"];

/// Replaces `$__interval_ms` and `$__interval` (and their `${...}` forms).
#[derive(Debug, Clone, Copy, Default)]
pub struct IntervalTemplate;

impl Substitute for IntervalTemplate {
    fn substitute(&self, expr: &str, interval_ms: i64) -> String {
        if interval_ms <= 0 || !expr.contains("__interval") {
            return expr.to_string();
        }

        let mut out = expr.to_string();
        let ms = interval_ms.to_string();
        for var in INTERVAL_MS_VARS {
            out = out.replace(var, &ms);
        }
        let duration = format_interval(interval_ms);
        for var in INTERVAL_VARS {
            out = out.replace(var, &duration);
        }
        out
    }
}

/// Formats milliseconds with the largest unit that divides it exactly.
///
/// - `300_000` → `"5m"`
/// - `1_500` → `"1500ms"`
pub fn format_interval(interval_ms: i64) -> String {
    const SECOND: i64 = 1_000;
    const MINUTE: i64 = 60 * SECOND;
    const HOUR: i64 = 60 * MINUTE;

    if interval_ms != 0 && interval_ms % HOUR == 0 {
        format!("{}h", interval_ms / HOUR)
    } else if interval_ms != 0 && interval_ms % MINUTE == 0 {
        format!("{}m", interval_ms / MINUTE)
    } else if interval_ms != 0 && interval_ms % SECOND == 0 {
        format!("{}s", interval_ms / SECOND)
    } else {
        format!("{}ms", interval_ms)
    }
}
