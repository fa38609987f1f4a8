//! HTTP transport seam.
//!
//! The pipeline issues exactly two kinds of GET (crumb page, CSV download)
//! through the [`Transport`] trait so the production reqwest client can be
//! swapped for an in-memory one in tests. Cookies are handled explicitly:
//! whatever the crumb page sets is replayed verbatim on the download.

use crate::config::ClientConfig;
use crate::error::QueryError;
use reqwest::header::COOKIE;

/// A `name=value` cookie pair as received in `Set-Cookie`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
}

impl Cookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Render cookies as a single `Cookie` request header value.
pub fn cookie_header(cookies: &[Cookie]) -> String {
    cookies
        .iter()
        .map(|c| format!("{}={}", c.name, c.value))
        .collect::<Vec<_>>()
        .join("; ")
}

/// An outgoing GET.
#[derive(Debug, Clone, Default)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub cookies: Vec<Cookie>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_cookies(mut self, cookies: Vec<Cookie>) -> Self {
        self.cookies = cookies;
        self
    }
}

/// A fully read response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub cookies: Vec<Cookie>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Blocking GET transport.
///
/// Implementations report connection failures and timeouts as
/// [`QueryError::Network`]; any HTTP status is returned as a response.
pub trait Transport: Send + Sync {
    fn get(&self, request: &HttpRequest) -> Result<HttpResponse, QueryError>;
}

/// Production transport backed by `reqwest::blocking`.
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, QueryError> {
        let mut builder = reqwest::blocking::Client::builder().timeout(config.timeout());
        if let Some(agent) = &config.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        let client = builder
            .build()
            .map_err(|e| QueryError::network("<client>", format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    fn get(&self, request: &HttpRequest) -> Result<HttpResponse, QueryError> {
        let mut builder = self.client.get(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !request.cookies.is_empty() {
            builder = builder.header(COOKIE, cookie_header(&request.cookies));
        }

        let resp = builder.send().map_err(|e| {
            let reason = if e.is_timeout() {
                format!("request timed out: {e}")
            } else {
                e.to_string()
            };
            QueryError::network(&request.url, reason)
        })?;

        let status = resp.status().as_u16();
        let cookies = resp
            .cookies()
            .map(|c| Cookie::new(c.name(), c.value()))
            .collect();

        let body = resp
            .text()
            .map_err(|e| QueryError::network(&request.url, format!("failed to read body: {e}")))?;

        Ok(HttpResponse {
            status,
            cookies,
            body,
        })
    }
}
