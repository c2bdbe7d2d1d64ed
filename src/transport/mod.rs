//! Transport adapter
//!
//! The crawler talks to the portal only through the [`Transport`] trait, so the
//! state machine can be driven by a real HTTP client or by a scripted one in
//! tests. Responses are normalized to status, body and headers; a non-200
//! status is returned as-is and never retried here.

mod http;

pub use http::{build_http_client, HttpTransport, DEFAULT_HEADERS};

use crate::form::FieldSet;
use crate::session::CrawlSession;
use crate::Result;
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use url::Url;

/// A normalized HTTP response
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code
    pub status: u16,
    /// Decoded response body
    pub body: String,
    /// Response headers, including every `Set-Cookie`
    pub headers: HeaderMap,
}

impl Response {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Request/response exchange with the portal
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issues a GET, forwarding the session's cookies when it holds any
    async fn get(&self, url: &Url, session: &CrawlSession) -> Result<Response>;

    /// Submits `fields` as a multipart form with the session's cookies
    async fn post_form(&self, url: &Url, fields: &FieldSet, session: &CrawlSession)
        -> Result<Response>;
}
