//! Historical query orchestrator.
//!
//! Owns the date range configuration and the cached session, and runs the
//! pipeline: ensure session → normalize dates → build URL → download/decode.

use crate::config::ClientConfig;
use crate::dates::parse_dates;
use crate::domain::Quote;
use crate::error::QueryError;
use crate::fetch::{QuoteFetcher, RawRows};
use crate::http::{ReqwestTransport, Transport};
use crate::session::{Session, SessionProvider};
use crate::url::QueryUrlBuilder;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

/// Daily history client for one caller.
///
/// The session is created on the first query and reused by every later query
/// on this instance, whatever the symbol, until [`renew_session`] is called.
///
/// [`renew_session`]: HistoricalQuery::renew_session
pub struct HistoricalQuery {
    /// Inclusive start date, `yyyy-mm-dd`. Empty means from the first record.
    pub start_date: String,
    /// Inclusive end date, `yyyy-mm-dd`. Empty means up to now.
    pub end_date: String,
    sessions: SessionProvider,
    urls: QueryUrlBuilder,
    fetcher: QuoteFetcher,
    cached_session: Mutex<Option<Session>>,
}

impl HistoricalQuery {
    /// Client with default endpoints and the reqwest transport.
    pub fn new() -> Result<Self, QueryError> {
        Self::with_config(ClientConfig::default())
    }

    pub fn with_config(config: ClientConfig) -> Result<Self, QueryError> {
        let transport = Arc::new(ReqwestTransport::new(&config)?);
        Ok(Self::with_transport(config, transport))
    }

    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            start_date: String::new(),
            end_date: String::new(),
            sessions: SessionProvider::new(&config, transport.clone()),
            urls: QueryUrlBuilder::new(config.download_url_template.clone()),
            fetcher: QuoteFetcher::new(transport),
            cached_session: Mutex::new(None),
        }
    }

    /// Set both ends of the range. Order does not matter.
    pub fn set_dates(&mut self, start: impl Into<String>, end: impl Into<String>) {
        self.start_date = start.into();
        self.end_date = end.into();
    }

    /// Clear the range so the next query covers all available history.
    pub fn reset_dates(&mut self) {
        self.start_date.clear();
        self.end_date.clear();
    }

    /// Daily quotes for `symbol`, oldest first.
    pub fn query(&self, symbol: &str) -> Result<Vec<Quote>, QueryError> {
        let (url, session) = self.prepare(symbol)?;
        let quotes = self.fetcher.fetch(symbol, &url, &session.cookies)?;
        info!(symbol, quotes = quotes.len(), "history query complete");
        Ok(quotes)
    }

    /// Undecoded CSV rows for `symbol`, header row first.
    pub fn query_raw(&self, symbol: &str) -> Result<RawRows, QueryError> {
        let (url, session) = self.prepare(symbol)?;
        self.fetcher.fetch_raw(&url, &session.cookies)
    }

    /// Validate `symbol`, ensure a session and build the download URL.
    fn prepare(&self, symbol: &str) -> Result<(String, Session), QueryError> {
        if symbol.is_empty() {
            return Err(QueryError::InvalidSymbol);
        }

        let session = self.ensure_session(symbol)?;
        let (start, end) = parse_dates(&self.start_date, &self.end_date);
        let url = self.urls.build(symbol, &start, &end, &session.crumb)?;
        debug!(symbol, period1 = %start, period2 = %end, "requesting history");
        Ok((url, session))
    }

    /// Re-scrape the cached session, if there is one.
    ///
    /// Call after a [`QueryError::is_stale_session`] failure, then retry once.
    /// Without a cached session this is a no-op; the next query acquires one.
    pub fn renew_session(&self) -> Result<(), QueryError> {
        let mut cached = self.lock_session();
        match cached.as_mut() {
            Some(session) => {
                info!(symbol = %session.symbol, "renewing session");
                self.sessions.refresh(session)
            }
            None => Ok(()),
        }
    }

    /// Drop the cached session without contacting the network.
    pub fn clear_session(&self) {
        *self.lock_session() = None;
    }

    /// Snapshot of the cached session.
    pub fn session(&self) -> Option<Session> {
        self.lock_session().clone()
    }

    /// Return the cached session, acquiring one first if absent or unusable.
    ///
    /// The lock is held across acquisition so the crumb and cookies in the
    /// cache always come from the same scrape.
    fn ensure_session(&self, symbol: &str) -> Result<Session, QueryError> {
        let mut cached = self.lock_session();
        if let Some(session) = cached.as_ref().filter(|s| s.is_usable()) {
            return Ok(session.clone());
        }
        let session = self.sessions.acquire(symbol)?;
        *cached = Some(session.clone());
        Ok(session)
    }

    fn lock_session(&self) -> MutexGuard<'_, Option<Session>> {
        self.cached_session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
