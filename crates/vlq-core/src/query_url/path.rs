//! Endpoint path joining.

/// Joins `suffix` onto `base` with exactly one `/` between non-empty segments.
///
/// The result is always absolute. Empty segments (doubled or trailing slashes)
/// are dropped from both sides.
pub fn join_path(base: &str, suffix: &str) -> String {
    let segments: Vec<&str> = base
        .split('/')
        .chain(suffix.split('/'))
        .filter(|s| !s.is_empty())
        .collect();
    format!("/{}", segments.join("/"))
}
