//! URL construction for the crumb page and the CSV download.
//!
//! Plain placeholder substitution, no escaping: symbols are short
//! alphanumeric-plus-dot tokens and the crumb is replayed as scraped.

use crate::config::DEFAULT_DOWNLOAD_URL_TEMPLATE;
use crate::error::QueryError;

/// Builds download URLs from a template with `{symbol}`, `{start}`, `{end}`
/// and `{crumb}` placeholders.
#[derive(Debug, Clone)]
pub struct QueryUrlBuilder {
    template: String,
}

impl Default for QueryUrlBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_DOWNLOAD_URL_TEMPLATE)
    }
}

impl QueryUrlBuilder {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Download URL for `symbol` between two epoch-second bounds.
    pub fn build(
        &self,
        symbol: &str,
        start_unix: &str,
        end_unix: &str,
        crumb: &str,
    ) -> Result<String, QueryError> {
        if symbol.is_empty() {
            return Err(QueryError::InvalidSymbol);
        }
        Ok(self
            .template
            .replace("{symbol}", symbol)
            .replace("{start}", start_unix)
            .replace("{end}", end_unix)
            .replace("{crumb}", crumb))
    }
}

/// History page URL scraped for the crumb.
pub fn crumb_source_url(template: &str, symbol: &str) -> Result<String, QueryError> {
    if symbol.is_empty() {
        return Err(QueryError::InvalidSymbol);
    }
    Ok(template.replace("{symbol}", symbol))
}
