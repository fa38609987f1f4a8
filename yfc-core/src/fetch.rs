//! Authenticated CSV download and decoding into [`Quote`]s.
//!
//! Decoding is column-name driven: the header row is mapped name → index, so
//! the endpoint may reorder columns freely. A bad field degrades to its zero
//! value and a bad row still yields a quote in its original position.

use crate::domain::Quote;
use crate::error::QueryError;
use crate::http::{Cookie, HttpRequest, Transport};
use crate::parse::{date_or_default, parse_or_default, Parsed};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Undecoded CSV rows, header first.
pub type RawRows = Vec<Vec<String>>;

pub const COL_DATE: &str = "Date";
pub const COL_OPEN: &str = "Open";
pub const COL_HIGH: &str = "High";
pub const COL_LOW: &str = "Low";
pub const COL_CLOSE: &str = "Close";
pub const COL_ADJ_CLOSE: &str = "Adj Close";
pub const COL_VOLUME: &str = "Volume";

/// Issues the download request and decodes its body.
pub struct QuoteFetcher {
    transport: Arc<dyn Transport>,
}

impl QuoteFetcher {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// GET `url` with `cookies` attached and split the body into CSV rows.
    pub fn fetch_raw(&self, url: &str, cookies: &[Cookie]) -> Result<RawRows, QueryError> {
        let request = HttpRequest::get(url).with_cookies(cookies.to_vec());
        let resp = self.transport.get(&request)?;

        if !resp.is_success() {
            return Err(QueryError::Network {
                url: url.to_string(),
                status: Some(resp.status),
                reason: format!("HTTP {}", resp.status),
            });
        }

        let rows = read_rows(&resp.body).map_err(|e| QueryError::MalformedResponse {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        if let Some(header) = rows.first() {
            if !header.iter().any(|name| name.trim() == COL_DATE) {
                return Err(QueryError::MalformedResponse {
                    url: url.to_string(),
                    reason: format!("missing {COL_DATE} column"),
                });
            }
        }
        debug!(url, rows = rows.len(), "downloaded history CSV");
        Ok(rows)
    }

    /// GET `url` and decode the rows into quotes stamped with `symbol`.
    pub fn fetch(
        &self,
        symbol: &str,
        url: &str,
        cookies: &[Cookie],
    ) -> Result<Vec<Quote>, QueryError> {
        let rows = self.fetch_raw(url, cookies)?;
        Ok(decode_quotes(symbol, &rows))
    }
}

/// Parse a CSV body into rows of fields. Every row must have the header's width.
pub fn read_rows(body: &str) -> Result<RawRows, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(body.as_bytes());

    reader
        .records()
        .map(|record| record.map(|r| r.iter().map(str::to_string).collect()))
        .collect()
}

/// Column positions keyed by header name.
struct HeaderIndex(HashMap<String, usize>);

impl HeaderIndex {
    fn new(header: &[String]) -> Self {
        Self(
            header
                .iter()
                .enumerate()
                .map(|(i, name)| (name.trim().to_string(), i))
                .collect(),
        )
    }

    fn field<'a>(&self, row: &'a [String], name: &str) -> &'a str {
        self.0
            .get(name)
            .and_then(|&i| row.get(i))
            .map(String::as_str)
            .unwrap_or("")
    }
}

fn take<T>(parsed: Parsed<T>, defaulted: &mut usize) -> T {
    if parsed.is_defaulted() {
        *defaulted += 1;
    }
    parsed.value()
}

/// Map rows (header first) to quotes. Never fails; see the module docs.
pub fn decode_quotes(symbol: &str, rows: &[Vec<String>]) -> Vec<Quote> {
    let Some((header, data)) = rows.split_first() else {
        return Vec::new();
    };
    let index = HeaderIndex::new(header);
    let symbol = symbol.to_uppercase();

    let mut defaulted = 0usize;
    let mut quotes = Vec::with_capacity(data.len());
    for row in data {
        let field = |name| index.field(row, name);
        quotes.push(Quote {
            date: take(date_or_default(field(COL_DATE)), &mut defaulted),
            symbol: symbol.clone(),
            open: take(parse_or_default(field(COL_OPEN)), &mut defaulted),
            high: take(parse_or_default(field(COL_HIGH)), &mut defaulted),
            low: take(parse_or_default(field(COL_LOW)), &mut defaulted),
            close: take(parse_or_default(field(COL_CLOSE)), &mut defaulted),
            adj_close: take(parse_or_default(field(COL_ADJ_CLOSE)), &mut defaulted),
            volume: take(parse_or_default(field(COL_VOLUME)), &mut defaulted),
        });
    }

    if defaulted > 0 {
        debug!(symbol = %symbol, defaulted, rows = quotes.len(), "fields fell back to zero values");
    }
    quotes
}
