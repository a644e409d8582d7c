//! Error type for query URL construction.

use thiserror::Error;

/// Input validation failure. Nothing else in URL construction can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryUrlError {
    /// Base URL is empty, not absolute, or cannot carry a path.
    #[error("invalid datasource url {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    /// Pass-through query parameters are not a valid query string.
    #[error("failed to parse query params {params:?}: {reason}")]
    InvalidParameterString { params: String, reason: String },
}

impl QueryUrlError {
    pub(crate) fn base_url(url: &str, reason: impl Into<String>) -> Self {
        Self::InvalidBaseUrl {
            url: url.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn params(params: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParameterString {
            params: params.to_string(),
            reason: reason.into(),
        }
    }
}
