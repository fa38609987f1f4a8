//! yfc core — daily price history download behind a scraped crumb session.
//!
//! The pipeline has three stages:
//! - Session acquisition: scrape the crumb token and cookies from the
//!   symbol's history page
//! - Date normalization and download URL construction
//! - Authenticated CSV download, decoded into [`Quote`] records
//!
//! [`HistoricalQuery`] ties them together and caches the session.

pub mod config;
pub mod dates;
pub mod domain;
pub mod error;
pub mod fetch;
pub mod historical;
pub mod http;
pub mod parse;
pub mod session;
pub mod url;

pub use config::{ClientConfig, ConfigError, CrumbStrategy};
pub use domain::Quote;
pub use error::QueryError;
pub use historical::HistoricalQuery;
pub use session::{Session, SessionProvider};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: the orchestrator and its parts can be shared across threads.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<HistoricalQuery>();
        require_sync::<HistoricalQuery>();
        require_send::<SessionProvider>();
        require_sync::<SessionProvider>();
        require_send::<fetch::QuoteFetcher>();
        require_sync::<fetch::QuoteFetcher>();
        require_send::<http::ReqwestTransport>();
        require_sync::<http::ReqwestTransport>();

        require_send::<Quote>();
        require_sync::<Quote>();
        require_send::<Session>();
        require_sync::<Session>();
        require_send::<QueryError>();
        require_sync::<QueryError>();
    }

    /// Architecture contract: crumb extraction is a pure function of the page body.
    ///
    /// A strategy sees only the body text, never the transport or the session,
    /// so it can be swapped without touching the rest of the pipeline.
    #[allow(dead_code)]
    fn crumb_extractor_sees_only_the_body(
        extractor: &dyn session::CrumbExtractor,
        body: &str,
    ) -> Option<String> {
        extractor.extract(body)
    }
}
