//! Crumb + cookie session acquisition.
//!
//! The download endpoint only answers requests that carry a crumb token in
//! the query string and the cookies set alongside it. Both come from one GET
//! of the symbol's history page.

pub mod crumb;

pub use crumb::{AppStateCrumb, CrumbExtractor, CrumbStorePattern, FirstMatch};

use crate::config::{ClientConfig, CrumbStrategy};
use crate::error::QueryError;
use crate::http::{Cookie, HttpRequest, Transport};
use crate::url::crumb_source_url;
use std::sync::Arc;
use tracing::{info, warn};

/// Authenticated context for the download endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Symbol whose history page produced this session.
    pub symbol: String,
    pub crumb_source_url: String,
    pub crumb: String,
    pub cookies: Vec<Cookie>,
}

impl Session {
    /// A session is usable once it carries a crumb. It never expires on its own.
    pub fn is_usable(&self) -> bool {
        !self.crumb.is_empty()
    }
}

/// Build the configured extractor chain.
pub fn extractor_for(strategy: CrumbStrategy) -> Box<dyn CrumbExtractor> {
    match strategy {
        CrumbStrategy::CrumbStore => Box::new(CrumbStorePattern),
        CrumbStrategy::AppState => Box::new(FirstMatch::new(vec![
            Box::new(AppStateCrumb),
            Box::new(CrumbStorePattern),
        ])),
    }
}

/// Scrapes sessions from the history page.
pub struct SessionProvider {
    transport: Arc<dyn Transport>,
    crumb_url_template: String,
    page_headers: Vec<(String, String)>,
    extractor: Box<dyn CrumbExtractor>,
}

impl SessionProvider {
    pub fn new(config: &ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            crumb_url_template: config.crumb_url_template.clone(),
            page_headers: config.page_headers(),
            extractor: extractor_for(config.crumb_strategy),
        }
    }

    /// Replace the crumb extraction strategy.
    pub fn with_extractor(mut self, extractor: Box<dyn CrumbExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Fetch the history page for `symbol` and scrape a fresh session.
    pub fn acquire(&self, symbol: &str) -> Result<Session, QueryError> {
        let url = crumb_source_url(&self.crumb_url_template, symbol)?;

        let request = HttpRequest::get(&url).with_headers(self.page_headers.clone());
        let resp = self.transport.get(&request)?;
        if !resp.is_success() {
            // Error pages sometimes still embed the store; scan anyway.
            warn!(url = %url, status = resp.status, "crumb page returned non-success status");
        }

        let crumb = self.extractor.extract(&resp.body).ok_or_else(|| {
            warn!(
                url = %url,
                strategy = self.extractor.name(),
                body_len = resp.body.len(),
                "crumb not found in page"
            );
            QueryError::CrumbNotFound { url: url.clone() }
        })?;

        info!(
            symbol,
            cookies = resp.cookies.len(),
            crumb_len = crumb.len(),
            "acquired session"
        );

        Ok(Session {
            symbol: symbol.to_string(),
            crumb_source_url: url,
            crumb,
            cookies: resp.cookies,
        })
    }

    /// Re-scrape `session` in place. On failure the old session is left untouched.
    pub fn refresh(&self, session: &mut Session) -> Result<(), QueryError> {
        *session = self.acquire(&session.symbol)?;
        Ok(())
    }
}
