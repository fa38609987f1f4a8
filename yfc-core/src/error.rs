//! Structured error types for the query pipeline.
//!
//! Per-field parse failures never appear here; they degrade to defaults in
//! [`crate::parse`]. Every variant below is terminal for the current query.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("invalid symbol: symbol must not be empty")]
    InvalidSymbol,

    #[error("crumb not found in page {url}")]
    CrumbNotFound { url: String },

    #[error("network error for {url}: {reason}")]
    Network {
        url: String,
        status: Option<u16>,
        reason: String,
    },

    #[error("malformed response from {url}: {reason}")]
    MalformedResponse { url: String, reason: String },
}

impl QueryError {
    pub(crate) fn network(url: &str, reason: impl Into<String>) -> Self {
        QueryError::Network {
            url: url.to_string(),
            status: None,
            reason: reason.into(),
        }
    }

    /// True when the download endpoint rejected the session (HTTP 401/403).
    ///
    /// Callers should `renew_session()` and retry once.
    pub fn is_stale_session(&self) -> bool {
        matches!(
            self,
            QueryError::Network {
                status: Some(401 | 403),
                ..
            }
        )
    }
}
