//! reqwest-backed transport
//!
//! Every request carries a fixed browser-like header set. Cookies are not
//! kept by the client: they belong to the [`CrawlSession`] and are attached
//! per request, so two crawls never see each other's session.

use crate::config::HttpConfig;
use crate::form::FieldSet;
use crate::session::CrawlSession;
use crate::transport::{Response, Transport};
use crate::{Result, TrackerError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, COOKIE};
use reqwest::multipart::Form;
use reqwest::{redirect::Policy, Client, RequestBuilder};
use std::time::Duration;
use url::Url;

/// Headers mimicking Chrome on Linux
pub const DEFAULT_HEADERS: &[(&str, &str)] = &[
    ("accept-language", "pt-BR,pt;q=0.9"),
    (
        "sec-ch-ua",
        "\"Not/A)Brand\";v=\"8\", \"Chromium\";v=\"126\", \"Google Chrome\";v=\"126\"",
    ),
    ("sec-ch-ua-mobile", "?0"),
    ("sec-ch-ua-platform", "\"Linux\""),
    ("sec-fetch-dest", "empty"),
    ("sec-fetch-mode", "cors"),
    ("sec-fetch-site", "same-origin"),
    ("sec-gpc", "1"),
    ("upgrade-insecure-requests", "1"),
    (
        "user-agent",
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36",
    ),
];

/// Builds an HTTP client with the browser header set and configured limits
///
/// # Example
///
/// ```no_run
/// use lawsuit_tracker::config::HttpConfig;
/// use lawsuit_tracker::transport::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> std::result::Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    for &(name, value) in DEFAULT_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }

    Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .redirect(Policy::limited(config.max_redirects))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Transport over a shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    fn with_cookies(request: RequestBuilder, session: &CrawlSession) -> RequestBuilder {
        match session.cookie_header() {
            Some(cookies) => request.header(COOKIE, cookies),
            None => request,
        }
    }

    async fn execute(&self, url: &Url, request: RequestBuilder) -> Result<Response> {
        let http_error = |source| TrackerError::Http {
            url: url.to_string(),
            source,
        };

        let response = request.send().await.map_err(http_error)?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.text().await.map_err(http_error)?;

        tracing::debug!(%url, status, bytes = body.len(), "Response received");

        Ok(Response {
            status,
            body,
            headers,
        })
    }
}

fn multipart(fields: &FieldSet) -> Form {
    fields.iter().fold(Form::new(), |form, (name, value)| {
        form.text(name.to_string(), value.to_string())
    })
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &Url, session: &CrawlSession) -> Result<Response> {
        tracing::debug!(%url, "GET");
        let request = Self::with_cookies(self.client.get(url.clone()), session);
        self.execute(url, request).await
    }

    async fn post_form(
        &self,
        url: &Url,
        fields: &FieldSet,
        session: &CrawlSession,
    ) -> Result<Response> {
        tracing::debug!(%url, fields = fields.len(), "POST multipart form");
        let request = Self::with_cookies(self.client.post(url.clone()), session)
            .multipart(multipart(fields));
        self.execute(url, request).await
    }
}
