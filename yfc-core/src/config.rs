//! Client configuration.
//!
//! Defaults reproduce the public endpoints and browser-like headers the
//! history page expects. A TOML file may override any subset of fields.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_CRUMB_URL_TEMPLATE: &str =
    "https://finance.yahoo.com/quote/{symbol}/history?p={symbol}";

pub const DEFAULT_DOWNLOAD_URL_TEMPLATE: &str = "https://query1.finance.yahoo.com/v7/finance/download/{symbol}\
     ?period1={start}&period2={end}&interval=1d&events=history&crumb={crumb}";

pub const DEFAULT_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Which markup scraping strategy pulls the crumb out of the history page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrumbStrategy {
    /// Regex scan for the `"CrumbStore":{"crumb":"..."}` fragment.
    #[default]
    CrumbStore,
    /// JSON walk of the `root.App.main` state object, then the regex scan.
    AppState,
}

/// Endpoint templates, request headers and timeouts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// History page scraped for the crumb. `{symbol}` is substituted.
    pub crumb_url_template: String,
    /// CSV download URL. `{symbol}`, `{start}`, `{end}` and `{crumb}` are substituted.
    pub download_url_template: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    pub accept: String,
    pub accept_language: String,
    /// Sent on every request when set; reqwest's default otherwise.
    pub user_agent: Option<String>,
    pub crumb_strategy: CrumbStrategy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            crumb_url_template: DEFAULT_CRUMB_URL_TEMPLATE.to_string(),
            download_url_template: DEFAULT_DOWNLOAD_URL_TEMPLATE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            accept: DEFAULT_ACCEPT.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
            user_agent: None,
            crumb_strategy: CrumbStrategy::default(),
        }
    }
}

impl ClientConfig {
    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse a config from a TOML string. Missing fields keep their defaults.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Headers sent with the crumb page request.
    pub fn page_headers(&self) -> Vec<(String, String)> {
        vec![
            ("Accept".to_string(), self.accept.clone()),
            ("Accept-Language".to_string(), self.accept_language.clone()),
        ]
    }
}
