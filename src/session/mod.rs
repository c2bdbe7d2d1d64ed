//! Crawl session state and session extraction
//!
//! A [`CrawlSession`] holds the server-assigned state of one lawsuit crawl:
//! the cookies handed out by the landing page and the JSF view-state token
//! issued by the lawsuit page. It is owned by a single crawl and never shared
//! between lawsuit codes.

mod extract;

pub use extract::{extract_max_page, extract_view_state, MAX_PAGE_CLASS, VIEW_STATE_ID};

use reqwest::header::{HeaderMap, SET_COOKIE};
use std::fmt;

/// A cookie reduced to its `name=value` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
}

impl Cookie {
    /// Parses a `Set-Cookie` header value, dropping every attribute after the first `;`
    pub fn from_set_cookie(header: &str) -> Option<Self> {
        let pair = header.split(';').next()?.trim();
        let (name, value) = pair.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        Some(Self {
            name: name.to_string(),
            value: value.trim().to_string(),
        })
    }
}

impl fmt::Display for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// Per-crawl server state
#[derive(Debug, Clone, Default)]
pub struct CrawlSession {
    cookies: Vec<Cookie>,
    view_state: Option<String>,
}

impl CrawlSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Captures cookies from a response's `Set-Cookie` headers
    ///
    /// Only the first capture counts: once the session holds cookies they are
    /// never overwritten. Returns true if cookies were captured by this call.
    pub fn capture_cookies(&mut self, headers: &HeaderMap) -> bool {
        if !self.cookies.is_empty() {
            return false;
        }

        for value in headers.get_all(SET_COOKIE) {
            let Ok(raw) = value.to_str() else {
                continue;
            };
            let Some(cookie) = Cookie::from_set_cookie(raw) else {
                continue;
            };

            // Same name twice in one response: last value wins, first position kept
            match self.cookies.iter_mut().find(|c| c.name == cookie.name) {
                Some(existing) => existing.value = cookie.value,
                None => self.cookies.push(cookie),
            }
        }

        !self.cookies.is_empty()
    }

    pub fn cookies(&self) -> &[Cookie] {
        &self.cookies
    }

    /// The `Cookie` request header value: `name=value` pairs joined by `"; "`
    pub fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }

        Some(
            self.cookies
                .iter()
                .map(Cookie::to_string)
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    pub fn view_state(&self) -> Option<&str> {
        self.view_state.as_deref()
    }

    /// Stores the view-state token, returning true if it changed the held value
    pub fn set_view_state(&mut self, token: impl Into<String>) -> bool {
        let token = token.into();
        if self.view_state.as_deref() == Some(token.as_str()) {
            return false;
        }
        self.view_state = Some(token);
        true
    }
}
